//! Rootline to path conversion.
//!
//! The first rootline entry is the site root, which the domain already
//! addresses, so it never contributes a segment. Every further entry either
//! reuses its own cached path as the new prefix, or appends its encoded
//! title.

use rustc_hash::FxHashSet;

use crate::core::{LanguageId, PageId, PagePath, RootId};
use crate::encode::SegmentEncoder;
use crate::error::StoreError;
use crate::store::{CacheKey, PathCacheStore};
use crate::tree::{PageNode, PageTree, RootlineEntry, TitleField};

/// Whether cached ancestor paths may still be used for this walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTrust {
    Trusted,
    /// A cached prefix disagreed with the path built so far (usually a row
    /// written through a parallel mount); derive the rest from titles.
    Stopped,
}

/// One pass over a rootline.
pub struct RootlineWalk<'a, T: PageTree + ?Sized, S: PathCacheStore> {
    pub tree: &'a T,
    /// `None` when the path cache is disabled.
    pub store: Option<&'a S>,
    pub encoder: &'a SegmentEncoder,
    pub fields: &'a [TitleField],
    pub excluded: &'a FxHashSet<PageId>,
    pub language: LanguageId,
    /// Root the ancestor lookups run under.
    pub root: RootId,
}

impl<T: PageTree + ?Sized, S: PathCacheStore> RootlineWalk<'_, T, S> {
    /// Build the path for the last entry of `rootline`.
    pub fn walk(&self, rootline: &[RootlineEntry]) -> Result<PagePath, StoreError> {
        let mut parts: Vec<String> = Vec::new();
        let mut trust = CacheTrust::Trusted;
        let Some((_, pages)) = rootline.split_first() else {
            return Ok(PagePath::new(""));
        };

        for (i, entry) in pages.iter().enumerate() {
            let node = &entry.node;
            let is_last = i + 1 == pages.len();
            let excluded = node.exclude_from_path || self.excluded.contains(&node.id);

            if let Some(path) = self.override_of(node) {
                parts = vec![path];
                continue;
            }
            if excluded && !is_last {
                continue;
            }

            if !excluded
                && trust == CacheTrust::Trusted
                && let Some(store) = self.store
            {
                let key = CacheKey::new(node.id, self.language, self.root, entry.mount.clone());
                if let Some(row) = store.find_live(&key)? {
                    let so_far = PagePath::from_segments(&parts);
                    if row.path.starts_with(so_far.as_str()) {
                        parts = vec![row.path.as_str().to_owned()];
                        continue;
                    }
                    crate::debug!(
                        "cache";
                        "cached path `{}` of page {} does not extend `{}`, ignoring cache for the rest of the walk",
                        row.path, node.id, so_far
                    );
                    trust = CacheTrust::Stopped;
                }
            }

            let title = self
                .tree
                .first_title_in(node, self.language, self.fields)
                .unwrap_or_default();
            parts.push(self.encoder.encode(&title));
        }

        Ok(PagePath::from_segments(&parts))
    }

    /// Whole-path override of a rootline page, translated where possible.
    fn override_of(&self, node: &PageNode) -> Option<String> {
        if !node.path_override {
            return None;
        }
        let path = self
            .tree
            .title_in(node, self.language, TitleField::PathSegment)?
            .trim()
            .trim_matches('/')
            .to_owned();
        (!path.is_empty()).then_some(path)
    }
}
