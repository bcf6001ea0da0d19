//! Cache write protocol run after every computed path.
//!
//! Per tuple `(page, language, root, mount)`:
//!
//! 1. sweep long-expired rows (throttled)
//! 2. soft-expire live rows carrying another path
//! 3. keep a live row already carrying the path, else revive the most
//!    recently expired one, else insert a new live row
//!
//! Steps run inside the store's keyed transaction, so concurrent builders of
//! the same tuple cannot both insert.

use crate::config::CacheConfig;
use crate::core::{CacheId, Clock, PagePath, expiry_after_days};
use crate::error::StoreError;
use crate::store::{CacheKey, PathCacheStore};

/// What the reconciler did with a computed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Cache disabled or privileged request.
    Skipped,
    /// The previous live path is the new path.
    Unchanged,
    /// A live row already carried the path.
    Kept,
    /// A soft-expired row carrying the path became live again.
    Revived,
    /// A new live row was written.
    Inserted(CacheId),
}

impl ReconcileOutcome {
    /// Whether the store was written.
    pub const fn wrote(&self) -> bool {
        matches!(self, Self::Revived | Self::Inserted(_))
    }
}

/// Applies the write protocol against a store.
pub struct Reconciler<'a, S: PathCacheStore> {
    store: &'a S,
    config: &'a CacheConfig,
    clock: &'a dyn Clock,
}

impl<'a, S: PathCacheStore> Reconciler<'a, S> {
    pub fn new(store: &'a S, config: &'a CacheConfig, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Record `path` as the current path of `key`.
    ///
    /// `previous` is the live path the caller already saw for `key`, if any.
    pub fn reconcile(
        &self,
        key: &CacheKey,
        path: &PagePath,
        previous: Option<&PagePath>,
        privileged: bool,
    ) -> Result<ReconcileOutcome, StoreError> {
        if self.config.disabled || privileged {
            return Ok(ReconcileOutcome::Skipped);
        }
        if previous == Some(path) {
            return Ok(ReconcileOutcome::Unchanged);
        }

        self.store.transaction(key, || {
            let now = self.clock.now();
            self.store.sweep_expired(
                now,
                self.config.sweep_min_age(),
                self.config.sweep_interval(),
            )?;

            let expire_at = expiry_after_days(now, self.config.expire_days);
            let expired = self.store.expire_live_except(key, path, expire_at)?;
            if expired > 0 {
                crate::debug!(
                    "cache";
                    "page {} moved to `{}`, {} old path(s) expire at {}",
                    key.page, path, expired, expire_at
                );
            }

            if self
                .store
                .find_live(key)?
                .is_some_and(|row| row.path == *path)
            {
                return Ok(ReconcileOutcome::Kept);
            }
            if self.store.revive(key, path)? {
                crate::debug!("cache"; "revived `{}` for page {}", path, key.page);
                return Ok(ReconcileOutcome::Revived);
            }

            let others = self.store.count_live_with_path(path.as_str(), key.root)?;
            if others > 0 {
                crate::debug!(
                    "cache";
                    "`{}` is also the live path of {} other row(s) under root {}",
                    path, others, key.root
                );
            }
            self.store
                .insert(key.clone(), path.clone())
                .map(ReconcileOutcome::Inserted)
        })
    }
}
