//! Cache invalidation on hierarchy mutations.
//!
//! | Change                               | Rows of page + descendants      |
//! |--------------------------------------|---------------------------------|
//! | `Deleted`                            | deleted                         |
//! | `Moved`, `Renamed`, `Unpublished`, `AliasChanged` | live rows soft-expired, all languages |
//! | `TranslationChanged(lang)`           | live rows of `lang` soft-expired |
//! | `ClearExpired`                       | already expired rows deleted (page only) |

use crate::config::PathConfig;
use crate::core::{Clock, LanguageId, PageId, expiry_after_days};
use crate::error::StoreError;
use crate::store::PathCacheStore;
use crate::tree::PageTree;

/// A mutation reported by the hierarchy collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Deleted,
    Moved,
    Renamed,
    Unpublished,
    AliasChanged,
    /// A translated title changed; other languages keep their paths.
    TranslationChanged(LanguageId),
    /// Drop rows whose grace period already ended.
    ClearExpired,
}

impl ChangeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Moved => "moved",
            Self::Renamed => "renamed",
            Self::Unpublished => "unpublished",
            Self::AliasChanged => "alias changed",
            Self::TranslationChanged(_) => "translation changed",
            Self::ClearExpired => "clear expired",
        }
    }
}

/// Result of an invalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// Pages whose request-level caches must be dropped.
    pub pages: Vec<PageId>,
    /// Cache rows expired or deleted.
    pub rows: usize,
}

/// Apply `kind` for `page` to the path cache.
pub fn invalidate<T: PageTree + ?Sized, S: PathCacheStore>(
    tree: &T,
    store: &S,
    config: &PathConfig,
    clock: &dyn Clock,
    page: PageId,
    kind: ChangeKind,
) -> Result<Invalidation, StoreError> {
    let now = clock.now();
    let pages = match kind {
        ChangeKind::ClearExpired => vec![page],
        _ => tree.descendants(page, config.tree.max_depth),
    };
    let expire_at = expiry_after_days(now, config.cache.expire_days);

    let rows = store.write_pages(&pages, || match kind {
        ChangeKind::Deleted => store.delete_pages(&pages),
        ChangeKind::Moved
        | ChangeKind::Renamed
        | ChangeKind::Unpublished
        | ChangeKind::AliasChanged => store.expire_pages(&pages, None, expire_at),
        ChangeKind::TranslationChanged(language) => {
            store.expire_pages(&pages, Some(language), expire_at)
        }
        ChangeKind::ClearExpired => store.delete_expired_for_pages(&pages, now),
    })?;

    crate::debug!(
        "cache";
        "page {} {}: {} row(s) across {} page(s)",
        page, kind.as_str(), rows, pages.len()
    );
    Ok(Invalidation { pages, rows })
}
