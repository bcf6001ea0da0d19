//! Path cache store interface.

use crate::core::{CacheId, LanguageId, PageId, PagePath, RootId};
use crate::error::StoreError;

use super::{CacheKey, PathCacheEntry};

/// CRUD and expiry operations over path cache rows.
///
/// Lookups never block on writers of other keys. Writes that must keep the
/// single-live-row rule run inside [`transaction`](Self::transaction).
pub trait PathCacheStore: Send + Sync {
    /// Live row for an exact key.
    fn find_live(&self, key: &CacheKey) -> Result<Option<PathCacheEntry>, StoreError>;

    /// All rows carrying `path` under `root`, live rows first, then by expiry.
    fn find_any_for_path(&self, path: &str, root: RootId)
    -> Result<Vec<PathCacheEntry>, StoreError>;

    /// All rows of a page in one language under `root`, ordered like
    /// [`find_any_for_path`](Self::find_any_for_path).
    fn find_for_page(
        &self,
        page: PageId,
        language: LanguageId,
        root: RootId,
    ) -> Result<Vec<PathCacheEntry>, StoreError>;

    fn get(&self, id: CacheId) -> Result<Option<PathCacheEntry>, StoreError>;

    /// Every row, ordered by id.
    fn entries(&self) -> Result<Vec<PathCacheEntry>, StoreError>;

    fn count_live_with_path(&self, path: &str, root: RootId) -> Result<usize, StoreError> {
        Ok(self
            .find_any_for_path(path, root)?
            .iter()
            .filter(|row| row.is_live())
            .count())
    }

    fn count_expired_with_path(&self, path: &str, root: RootId) -> Result<usize, StoreError> {
        Ok(self
            .find_any_for_path(path, root)?
            .iter()
            .filter(|row| row.is_expired())
            .count())
    }

    /// Insert a live row.
    fn insert(&self, key: CacheKey, path: PagePath) -> Result<CacheId, StoreError>;

    /// Soft-expire live rows of `key` whose path differs from `keep`.
    fn expire_live_except(
        &self,
        key: &CacheKey,
        keep: &PagePath,
        expire_at: u64,
    ) -> Result<usize, StoreError>;

    /// Make the most recently expired row of `key` carrying `path` live again.
    ///
    /// Returns `false` when no such row exists.
    fn revive(&self, key: &CacheKey, path: &PagePath) -> Result<bool, StoreError>;

    /// Replace a row's path (administrative override).
    fn update_path(&self, id: CacheId, path: PagePath) -> Result<bool, StoreError>;

    fn delete(&self, id: CacheId) -> Result<bool, StoreError>;

    /// Soft-expire live rows of `pages`, optionally only one language.
    fn expire_pages(
        &self,
        pages: &[PageId],
        language: Option<LanguageId>,
        expire_at: u64,
    ) -> Result<usize, StoreError>;

    /// Delete every row of `pages`.
    fn delete_pages(&self, pages: &[PageId]) -> Result<usize, StoreError>;

    /// Delete rows of `pages` whose expiry is already past `now`.
    fn delete_expired_for_pages(&self, pages: &[PageId], now: u64) -> Result<usize, StoreError>;

    /// Delete expired rows older than `min_age` before today's midnight.
    ///
    /// Runs at most once per `interval` seconds; returns `None` when skipped.
    /// Live rows and rows whose expiry lies ahead are never touched.
    fn sweep_expired(
        &self,
        now: u64,
        min_age: u64,
        interval: u64,
    ) -> Result<Option<usize>, StoreError>;

    /// Run `body` as one transaction, serialized against other writers of `key`.
    fn transaction<R>(
        &self,
        key: &CacheKey,
        body: impl FnOnce() -> Result<R, StoreError>,
    ) -> Result<R, StoreError>
    where
        Self: Sized;

    /// Run page-level writes (invalidation) as one unit and make them
    /// durable. On failure the rows of `pages` are left as they were.
    fn write_pages<R>(
        &self,
        _pages: &[PageId],
        body: impl FnOnce() -> Result<R, StoreError>,
    ) -> Result<R, StoreError>
    where
        Self: Sized,
    {
        let result = body()?;
        self.commit()?;
        Ok(result)
    }

    /// Make writes done outside a transaction durable.
    fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
