//! Per-request resolution state.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{LanguageId, MountContext, PageId, PagePath, RootId};

/// A computed page path together with the tuple it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    pub path: PagePath,
    /// Language the path was built for, after language exceptions.
    pub language: LanguageId,
    /// Root the path is cached under. Differs from the request root for
    /// pages inside an inner site with its own domain.
    pub root: RootId,
}

type MemoKey = (PageId, MountContext, LanguageId);

/// State passed explicitly through one encode or decode request.
///
/// Holds the memo of rootline-derived paths, so it must not outlive the
/// request: the memo is never invalidated by tree edits.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub language: LanguageId,
    pub mount: MountContext,
    /// Configured root the request runs under.
    pub root: RootId,
    /// Pages to refuse on top of the configured exclusion list.
    pub excluded: FxHashSet<PageId>,
    /// Preview or backend request; never writes the cache.
    pub privileged: bool,
    memo: FxHashMap<MemoKey, PathRecord>,
}

impl ResolutionContext {
    pub fn new(language: LanguageId, root: RootId) -> Self {
        Self {
            language,
            mount: MountContext::empty(),
            root,
            excluded: FxHashSet::default(),
            privileged: false,
            memo: FxHashMap::default(),
        }
    }

    pub fn with_mount(mut self, mount: MountContext) -> Self {
        self.mount = mount;
        self
    }

    pub fn with_excluded(mut self, pages: impl IntoIterator<Item = PageId>) -> Self {
        self.excluded.extend(pages);
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    #[inline]
    pub fn is_excluded(&self, page: PageId) -> bool {
        self.excluded.contains(&page)
    }

    pub(crate) fn remembered(
        &self,
        page: PageId,
        mount: &MountContext,
        language: LanguageId,
    ) -> Option<&PathRecord> {
        self.memo.get(&(page, mount.clone(), language))
    }

    pub(crate) fn remember(
        &mut self,
        page: PageId,
        mount: &MountContext,
        language: LanguageId,
        record: PathRecord,
    ) {
        self.memo.insert((page, mount.clone(), language), record);
    }
}
