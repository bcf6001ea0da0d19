//! In-memory path cache with optional snapshot persistence.
//!
//! Rows live in an id-ordered map with three secondary indexes:
//! by cache key, by `(root, path)` and by page. Readers take a shared lock,
//! writers an exclusive one for the duration of a single operation; the
//! keyed transaction lock sits above that and only serializes writers of
//! the same key.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::core::{CacheId, LanguageId, PageId, PagePath, RootId, day_floor};
use crate::error::StoreError;

use super::entry::sort_by_expiry;
use super::locks::KeyLocks;
use super::snapshot::{Snapshot, SnapshotFiles};
use super::{CacheKey, PathCacheEntry, PathCacheStore};

// ============================================================================
// Table
// ============================================================================

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<CacheId, PathCacheEntry>,
    by_key: FxHashMap<CacheKey, Vec<CacheId>>,
    by_path: FxHashMap<(RootId, PagePath), Vec<CacheId>>,
    by_page: FxHashMap<PageId, Vec<CacheId>>,
}

impl Table {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut table = Self::default();
        for entry in snapshot.entries {
            table.next_id = table.next_id.max(entry.id.0 + 1);
            table.link(entry);
        }
        table.next_id = table.next_id.max(snapshot.next_id);
        table
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(self.next_id, self.rows.values().cloned().collect())
    }

    fn link(&mut self, entry: PathCacheEntry) {
        let id = entry.id;
        self.by_key.entry(entry.key.clone()).or_default().push(id);
        self.by_path
            .entry((entry.key.root, entry.path.clone()))
            .or_default()
            .push(id);
        self.by_page.entry(entry.key.page).or_default().push(id);
        self.rows.insert(id, entry);
    }

    fn unlink(&mut self, id: CacheId) -> Option<PathCacheEntry> {
        let entry = self.rows.remove(&id)?;
        remove_id(&mut self.by_key, &entry.key, id);
        remove_id(&mut self.by_path, &(entry.key.root, entry.path.clone()), id);
        remove_id(&mut self.by_page, &entry.key.page, id);
        Some(entry)
    }

    fn insert(&mut self, key: CacheKey, path: PagePath) -> CacheId {
        self.next_id = self.next_id.max(1);
        let id = CacheId(self.next_id);
        self.next_id += 1;
        self.link(PathCacheEntry {
            id,
            key,
            path,
            expire_at: 0,
        });
        id
    }

    fn ids<K: std::hash::Hash + Eq>(index: &FxHashMap<K, Vec<CacheId>>, key: &K) -> Vec<CacheId> {
        index.get(key).cloned().unwrap_or_default()
    }

    fn collect(&self, ids: &[CacheId]) -> Vec<PathCacheEntry> {
        let mut rows: Vec<_> = ids.iter().filter_map(|id| self.rows.get(id)).cloned().collect();
        sort_by_expiry(&mut rows);
        rows
    }

    /// Set `expire_at` on every row selected by `ids` and `filter`.
    fn set_expiry(
        &mut self,
        ids: &[CacheId],
        expire_at: u64,
        filter: impl Fn(&PathCacheEntry) -> bool,
    ) -> usize {
        let mut count = 0;
        for id in ids {
            if let Some(row) = self.rows.get_mut(id)
                && filter(row)
            {
                row.expire_at = expire_at;
                count += 1;
            }
        }
        count
    }

    fn remove_where(&mut self, ids: &[CacheId], filter: impl Fn(&PathCacheEntry) -> bool) -> usize {
        let doomed: Vec<CacheId> = ids
            .iter()
            .filter(|id| self.rows.get(*id).is_some_and(&filter))
            .copied()
            .collect();
        doomed.iter().filter_map(|id| self.unlink(*id)).count()
    }

    fn rows_of(&self, ids: &[CacheId]) -> Vec<PathCacheEntry> {
        ids.iter().filter_map(|id| self.rows.get(id)).cloned().collect()
    }

    /// Put `saved` back in place of the rows selected by `current`.
    fn restore(&mut self, current: &[CacheId], saved: Vec<PathCacheEntry>) {
        for id in current {
            self.unlink(*id);
        }
        for entry in saved {
            self.unlink(entry.id);
            self.link(entry);
        }
    }

    fn page_ids(&self, pages: &[PageId]) -> Vec<CacheId> {
        pages
            .iter()
            .flat_map(|page| Self::ids(&self.by_page, page))
            .collect()
    }
}

fn remove_id<K: std::hash::Hash + Eq>(index: &mut FxHashMap<K, Vec<CacheId>>, key: &K, id: CacheId) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|other| *other != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Process-local [`PathCacheStore`].
///
/// Opened on a directory, every committed transaction rewrites the snapshot
/// and the sweep marker survives restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
    locks: KeyLocks,
    dirty: AtomicBool,
    files: Option<SnapshotFiles>,
    /// Serializes snapshot writes.
    persist: Mutex<()>,
    last_sweep: Mutex<Option<u64>>,
}

impl MemoryStore {
    /// Memory-only store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store persisted in `dir`, restoring any previous snapshot.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let files = SnapshotFiles::new(dir)?;
        let table = files
            .load()?
            .map(Table::from_snapshot)
            .unwrap_or_default();
        let last_sweep = files.load_marker()?;
        Ok(Self {
            table: RwLock::new(table),
            last_sweep: Mutex::new(last_sweep),
            files: Some(files),
            ..Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().rows.is_empty()
    }

    /// Timestamp of the last sweep that ran.
    pub fn last_sweep(&self) -> Option<u64> {
        *self.last_sweep.lock()
    }

    fn touched(&self, count: usize) -> usize {
        if count > 0 {
            self.dirty.store(true, Ordering::Release);
        }
        count
    }

    /// Run `body` and persist; on failure the rows chosen by `select` are
    /// restored to what they were before `body` ran.
    ///
    /// Rows outside the selection (rows removed by a sweep inside `body`)
    /// keep their new state and are written by the next successful persist.
    fn rolled_back<R>(
        &self,
        select: impl Fn(&Table) -> Vec<CacheId>,
        body: impl FnOnce() -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let saved = {
            let table = self.table.read();
            table.rows_of(&select(&table))
        };
        let result = body().and_then(|value| self.persist().map(|()| value));
        if result.is_err() {
            let mut table = self.table.write();
            let current = select(&table);
            crate::debug!("cache"; "write failed, restoring {} row(s)", saved.len());
            table.restore(&current, saved);
        }
        result
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(files) = &self.files else {
            self.dirty.store(false, Ordering::Release);
            return Ok(());
        };
        let _writer = self.persist.lock();
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        let snapshot = self.table.read().to_snapshot();
        files.save(&snapshot).inspect_err(|_| {
            self.dirty.store(true, Ordering::Release);
        })
    }
}

impl PathCacheStore for MemoryStore {
    fn find_live(&self, key: &CacheKey) -> Result<Option<PathCacheEntry>, StoreError> {
        let table = self.table.read();
        Ok(Table::ids(&table.by_key, key)
            .iter()
            .filter_map(|id| table.rows.get(id))
            .find(|row| row.is_live())
            .cloned())
    }

    fn find_any_for_path(
        &self,
        path: &str,
        root: RootId,
    ) -> Result<Vec<PathCacheEntry>, StoreError> {
        let table = self.table.read();
        let ids = Table::ids(&table.by_path, &(root, PagePath::new(path)));
        Ok(table.collect(&ids))
    }

    fn find_for_page(
        &self,
        page: PageId,
        language: LanguageId,
        root: RootId,
    ) -> Result<Vec<PathCacheEntry>, StoreError> {
        let table = self.table.read();
        let ids = Table::ids(&table.by_page, &page);
        let mut rows = table.collect(&ids);
        rows.retain(|row| row.key.language == language && row.key.root == root);
        Ok(rows)
    }

    fn get(&self, id: CacheId) -> Result<Option<PathCacheEntry>, StoreError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    fn entries(&self) -> Result<Vec<PathCacheEntry>, StoreError> {
        Ok(self.table.read().rows.values().cloned().collect())
    }

    fn insert(&self, key: CacheKey, path: PagePath) -> Result<CacheId, StoreError> {
        let id = self.table.write().insert(key, path);
        self.touched(1);
        Ok(id)
    }

    fn expire_live_except(
        &self,
        key: &CacheKey,
        keep: &PagePath,
        expire_at: u64,
    ) -> Result<usize, StoreError> {
        let mut table = self.table.write();
        let ids = Table::ids(&table.by_key, key);
        let count = table.set_expiry(&ids, expire_at, |row| row.is_live() && row.path != *keep);
        Ok(self.touched(count))
    }

    fn revive(&self, key: &CacheKey, path: &PagePath) -> Result<bool, StoreError> {
        let mut table = self.table.write();
        let ids = Table::ids(&table.by_key, key);
        let latest = table
            .collect(&ids)
            .into_iter()
            .filter(|row| row.is_expired() && row.path == *path)
            .max_by_key(|row| (row.expire_at, row.id))
            .map(|row| row.id);
        let count = latest.map_or(0, |id| table.set_expiry(&[id], 0, |_| true));
        Ok(self.touched(count) > 0)
    }

    fn update_path(&self, id: CacheId, path: PagePath) -> Result<bool, StoreError> {
        let mut table = self.table.write();
        let Some(mut entry) = table.unlink(id) else {
            return Ok(false);
        };
        entry.path = path;
        table.link(entry);
        Ok(self.touched(1) > 0)
    }

    fn delete(&self, id: CacheId) -> Result<bool, StoreError> {
        let removed = self.table.write().unlink(id).is_some();
        Ok(self.touched(usize::from(removed)) > 0)
    }

    fn expire_pages(
        &self,
        pages: &[PageId],
        language: Option<LanguageId>,
        expire_at: u64,
    ) -> Result<usize, StoreError> {
        let mut table = self.table.write();
        let ids = table.page_ids(pages);
        let count = table.set_expiry(&ids, expire_at, |row| {
            row.is_live() && language.is_none_or(|lang| row.key.language == lang)
        });
        Ok(self.touched(count))
    }

    fn delete_pages(&self, pages: &[PageId]) -> Result<usize, StoreError> {
        let mut table = self.table.write();
        let ids = table.page_ids(pages);
        let count = table.remove_where(&ids, |_| true);
        Ok(self.touched(count))
    }

    fn delete_expired_for_pages(&self, pages: &[PageId], now: u64) -> Result<usize, StoreError> {
        let mut table = self.table.write();
        let ids = table.page_ids(pages);
        let count = table.remove_where(&ids, |row| row.is_expired() && row.expire_at < now);
        Ok(self.touched(count))
    }

    fn sweep_expired(
        &self,
        now: u64,
        min_age: u64,
        interval: u64,
    ) -> Result<Option<usize>, StoreError> {
        {
            let mut last = self.last_sweep.lock();
            if let Some(previous) = *last
                && now.saturating_sub(previous) < interval
            {
                return Ok(None);
            }
            *last = Some(now);
            if let Some(files) = &self.files {
                files.save_marker(now)?;
            }
        }

        let cutoff = day_floor(now).saturating_sub(min_age);
        let mut table = self.table.write();
        let ids: Vec<CacheId> = table.rows.keys().copied().collect();
        let count = table.remove_where(&ids, |row| row.is_expired() && row.expire_at < cutoff);
        drop(table);

        crate::debug!("sweep"; "removed {} expired rows (cutoff {})", count, cutoff);
        Ok(Some(self.touched(count)))
    }

    fn transaction<R>(
        &self,
        key: &CacheKey,
        body: impl FnOnce() -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let _guard = self.locks.lock(key);
        self.rolled_back(|table| Table::ids(&table.by_key, key), body)
    }

    fn write_pages<R>(
        &self,
        pages: &[PageId],
        body: impl FnOnce() -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        self.rolled_back(|table| table.page_ids(pages), body)
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.persist()
    }
}
