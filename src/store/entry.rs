//! Path cache rows.

use serde::{Deserialize, Serialize};

use crate::core::{CacheId, LanguageId, MountContext, PageId, PagePath, RootId};

/// Identity of a cached mapping; at most one live row exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub page: PageId,
    pub language: LanguageId,
    pub root: RootId,
    #[serde(default)]
    pub mount: MountContext,
}

impl CacheKey {
    pub fn new(page: PageId, language: LanguageId, root: RootId, mount: MountContext) -> Self {
        Self {
            page,
            language,
            root,
            mount,
        }
    }
}

/// One row of the path cache.
///
/// `expire_at == 0` marks the live row; any other value is a day-aligned
/// timestamp after which the row may be swept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCacheEntry {
    pub id: CacheId,
    #[serde(flatten)]
    pub key: CacheKey,
    pub path: PagePath,
    pub expire_at: u64,
}

impl PathCacheEntry {
    #[inline]
    pub const fn is_live(&self) -> bool {
        self.expire_at == 0
    }

    /// Soft-expired rows keep redirecting until swept.
    #[inline]
    pub const fn is_expired(&self) -> bool {
        self.expire_at != 0
    }
}

/// Sort rows the way lookups return them: live rows first, then by expiry.
pub(crate) fn sort_by_expiry(rows: &mut [PathCacheEntry]) {
    rows.sort_by_key(|row| (row.expire_at, row.id));
}
