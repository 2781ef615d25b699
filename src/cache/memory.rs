//! In-process cache backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CacheBackend;
use crate::error::{PresenceError, PresenceResult};

/// Cache held in process memory.
///
/// Lists and scalars live in separate maps; an emptied list is dropped so
/// idle tables do not accumulate keys.
pub struct InMemoryCache {
    lists: Mutex<HashMap<String, Vec<String>>>,
    scalars: Mutex<HashMap<String, String>>,
    available: AtomicBool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
            scalars: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backing service going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of keys currently held (lists and scalars)
    pub fn key_count(&self) -> usize {
        self.lists.lock().len() + self.scalars.lock().len()
    }

    fn ensure_available(&self) -> PresenceResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PresenceError::StoreUnavailable(
                "cache backend is not reachable".to_string(),
            ))
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn list_range(&self, key: &str) -> PresenceResult<Vec<String>> {
        self.ensure_available()?;
        Ok(self.lists.lock().get(key).cloned().unwrap_or_default())
    }

    async fn list_push(&self, key: &str, value: String) -> PresenceResult<()> {
        self.ensure_available()?;
        self.lists.lock().entry(key.to_string()).or_default().push(value);
        Ok(())
    }

    async fn list_remove_last(&self, key: &str, value: &str) -> PresenceResult<usize> {
        self.ensure_available()?;
        let mut lists = self.lists.lock();
        let Some(list) = lists.get_mut(key) else {
            return Ok(0);
        };
        let Some(pos) = list.iter().rposition(|v| v == value) else {
            return Ok(0);
        };
        list.remove(pos);
        if list.is_empty() {
            lists.remove(key);
        }
        Ok(1)
    }

    async fn list_replace_last(&self, key: &str, old: &str, new: String) -> PresenceResult<bool> {
        self.ensure_available()?;
        let mut lists = self.lists.lock();
        let Some(slot) = lists
            .get_mut(key)
            .and_then(|list| list.iter_mut().rev().find(|v| v.as_str() == old))
        else {
            return Ok(false);
        };
        *slot = new;
        Ok(true)
    }

    async fn get(&self, key: &str) -> PresenceResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.scalars.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> PresenceResult<()> {
        self.ensure_available()?;
        self.scalars.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> PresenceResult<bool> {
        self.ensure_available()?;
        Ok(self.scalars.lock().remove(key).is_some())
    }
}
