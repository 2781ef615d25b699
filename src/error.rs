//! Error types for presence, relay and hosting operations

use thiserror::Error;

/// Result type used throughout the crate
pub type PresenceResult<T> = Result<T, PresenceError>;

/// Errors surfaced to callers of the client-facing operations
#[derive(Debug, Error)]
pub enum PresenceError {
    /// A referenced event, table, user, survey or question does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// The actor may not perform a host-only action
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The event already holds the maximum number of tables
    #[error("you've reached the maximum limit of {limit} tables for your event")]
    CapacityExceeded { limit: usize },

    /// Backing cache or durable store is unreachable; the caller may retry
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A record could not be encoded for the cache
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PresenceError {
    /// Shorthand for a missing entity
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        PresenceError::NotFound { entity, id }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            PresenceError::NotFound { .. } => "NOT_FOUND",
            PresenceError::PermissionDenied(_) => "PERMISSION_DENIED",
            PresenceError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            PresenceError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            PresenceError::Serialization(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying the whole operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PresenceError::StoreUnavailable(_))
    }
}
