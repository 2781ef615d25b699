//! Key-value cache backend
//!
//! The presence store only needs a handful of list and scalar operations.
//! Each operation is atomic on its own key; nothing spans keys.

mod memory;

use async_trait::async_trait;

use crate::error::PresenceResult;

pub use memory::InMemoryCache;

/// List and scalar operations offered by the backing cache
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// All elements of the list at `key`, head first (empty if absent)
    async fn list_range(&self, key: &str) -> PresenceResult<Vec<String>>;

    /// Append `value` to the tail of the list at `key`
    async fn list_push(&self, key: &str, value: String) -> PresenceResult<()>;

    /// Remove the occurrence of `value` nearest the tail; returns how many were removed
    async fn list_remove_last(&self, key: &str, value: &str) -> PresenceResult<usize>;

    /// Overwrite the occurrence of `old` nearest the tail with `new`, keeping
    /// its position; returns whether one was found
    async fn list_replace_last(&self, key: &str, old: &str, new: String) -> PresenceResult<bool>;

    /// Scalar value at `key`
    async fn get(&self, key: &str) -> PresenceResult<Option<String>>;

    /// Overwrite the scalar at `key`
    async fn set(&self, key: &str, value: String) -> PresenceResult<()>;

    /// Delete the scalar at `key`; returns whether it existed
    async fn delete(&self, key: &str) -> PresenceResult<bool>;
}
