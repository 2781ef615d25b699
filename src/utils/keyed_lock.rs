//! Per-key async mutual exclusion
//!
//! Operations on the same key run one at a time in arrival order (tokio's
//! mutex is fair); different keys never contend. Each entry counts its
//! holder and waiters and is dropped from the map when that count reaches
//! zero, including when a waiter is cancelled before it gets the lock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

struct Slot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

type LockMap<K> = Mutex<HashMap<K, Slot>>;

/// A set of independent locks addressed by key
pub struct KeyedLocks<K> {
    slots: Arc<LockMap<K>>,
}

impl<K> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: K) -> KeyedGuard<K> {
        let lock = {
            let mut slots = self.slots.lock();
            let slot = slots.entry(key.clone()).or_insert_with(|| Slot {
                lock: Arc::new(AsyncMutex::new(())),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.lock)
        };
        // Registered before waiting so a cancelled wait still releases its count.
        let mut keyed = KeyedGuard {
            key,
            guard: None,
            slots: Arc::clone(&self.slots),
        };
        keyed.guard = Some(lock.lock_owned().await);
        keyed
    }

    /// Keys currently held or waited on
    pub fn active_keys(&self) -> usize {
        self.slots.lock().len()
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to one key, released on drop
pub struct KeyedGuard<K: Eq + Hash> {
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
    slots: Arc<LockMap<K>>,
}

impl<K: Eq + Hash> Drop for KeyedGuard<K> {
    fn drop(&mut self) {
        self.guard.take();
        let mut slots = self.slots.lock();
        let idle = match slots.get_mut(&self.key) {
            Some(slot) => {
                slot.users -= 1;
                slot.users == 0
            }
            None => false,
        };
        if idle {
            slots.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized_in_order() {
        let locks: KeyedLocks<u64> = KeyedLocks::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = locks.lock(1).await;
        let mut handles = Vec::new();
        for i in 0..3 {
            let locks = locks.clone();
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                let _g = locks.lock(1).await;
                log.lock().push(i);
            }));
            // Let each task queue up before spawning the next
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(log.lock().is_empty());
        drop(first);
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks: KeyedLocks<u64> = KeyedLocks::new();
        let _a = locks.lock(1).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.lock(2)).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_keys_are_removed() {
        let locks: KeyedLocks<u64> = KeyedLocks::new();
        for key in 0..5 {
            let _g = locks.lock(key).await;
            assert_eq!(locks.active_keys(), 1);
        }
        assert_eq!(locks.active_keys(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_slot() {
        let locks: KeyedLocks<u64> = KeyedLocks::new();
        let held = locks.lock(1).await;

        let waited = tokio::time::timeout(Duration::from_millis(10), locks.lock(1)).await;
        assert!(waited.is_err());
        assert_eq!(locks.active_keys(), 1);

        drop(held);
        assert_eq!(locks.active_keys(), 0);
    }

    #[tokio::test]
    async fn test_waiter_cancelled_after_release_does_not_leak_slot() {
        let locks: KeyedLocks<u64> = KeyedLocks::new();
        let held = locks.lock(1).await;

        let locks2 = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.lock(1).await;
            std::future::pending::<()>().await;
        });
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Release, then cancel the waiter whether or not it was woken
        drop(held);
        waiter.abort();
        let _ = waiter.await;

        assert_eq!(locks.active_keys(), 0);
    }
}
