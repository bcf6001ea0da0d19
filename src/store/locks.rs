//! Per-key critical sections.
//!
//! Writers for the same cache key are serialized; writers for different keys
//! never wait on each other. Idle mutexes are dropped from the map when the
//! last holder releases them.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

use super::CacheKey;

#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

/// Held for the duration of one keyed transaction.
pub struct KeyGuard<'a> {
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
    key: CacheKey,
    locks: &'a KeyLocks,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `key` is free, then hold it until the guard is dropped.
    pub fn lock(&self, key: &CacheKey) -> KeyGuard<'_> {
        let mutex = self.locks.entry(key.clone()).or_default().clone();
        let guard = mutex.lock_arc();
        KeyGuard {
            guard: Some(guard),
            key: key.clone(),
            locks: self,
        }
    }

    /// Number of keys currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LanguageId, MountContext, PageId, RootId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn key(page: u32) -> CacheKey {
        CacheKey::new(PageId(page), LanguageId(0), RootId(1), MountContext::empty())
    }

    #[test]
    fn test_guard_releases_entry() {
        let locks = KeyLocks::new();
        {
            let _guard = locks.lock(&key(1));
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[test]
    fn test_different_keys_do_not_block() {
        let locks = KeyLocks::new();
        let _a = locks.lock(&key(1));
        let _b = locks.lock(&key(2));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_same_key_is_serialized() {
        let locks = Arc::new(KeyLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let _guard = locks.lock(&key(7));
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }
}
