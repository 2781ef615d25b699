//! Utility helpers
//!
//! Per-key serialization used by the coordinator and the survey relay.

pub mod keyed_lock;

pub use keyed_lock::{KeyedGuard, KeyedLocks};
