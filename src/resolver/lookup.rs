//! Cache side of decoding: longest cached prefix, then redirect detection.

use crate::core::{PagePath, RootId};
use crate::error::StoreError;
use crate::store::{PathCacheEntry, PathCacheStore};
use crate::tree::PageTree;

use super::{PathResolver, Resolution};

/// Cache row matching the longest prefix of a request.
#[derive(Debug, Clone)]
pub(super) struct CacheHit {
    pub row: PathCacheEntry,
    /// Request segments covered by the row's path.
    pub consumed: usize,
}

impl<T: PageTree + ?Sized, S: PathCacheStore> PathResolver<'_, T, S> {
    /// Find the row whose path is the longest prefix of `normalized`.
    ///
    /// A prefix only counts when the segment right after it is a
    /// post-variable keyword of the matched page; otherwise the tree decides.
    pub(super) fn cache_lookup(
        &self,
        root: RootId,
        normalized: &[String],
    ) -> Result<Option<CacheHit>, StoreError> {
        for consumed in (1..=normalized.len()).rev() {
            let prefix = normalized[..consumed].join("/");
            let Some(row) = self
                .store
                .find_any_for_path(&prefix, root)?
                .into_iter()
                .find(|row| self.tree.node(row.key.page).is_some())
            else {
                continue;
            };

            if let Some(next) = normalized.get(consumed)
                && !self.config.post_vars.accepts(row.key.page, next)
            {
                crate::debug!(
                    "resolve";
                    "`{}` follows cached `{}` but is no parameter of page {}",
                    next, prefix, row.key.page
                );
                return Ok(None);
            }
            return Ok(Some(CacheHit { row, consumed }));
        }
        Ok(None)
    }

    /// Newer row for the page of an expired `row`, if one exists.
    ///
    /// Prefers the live row, then the expired row that expires first.
    pub(super) fn replacement(
        &self,
        row: &PathCacheEntry,
    ) -> Result<Option<PathCacheEntry>, StoreError> {
        Ok(self
            .store
            .find_for_page(row.key.page, row.key.language, row.key.root)?
            .into_iter()
            // a redirect to the same path would loop
            .find(|other| {
                other.id != row.id
                    && other.path != row.path
                    && (other.is_live() || other.expire_at < row.expire_at)
            }))
    }

    /// Turn a cache hit into the outcome for the full request.
    pub(super) fn resolve_hit(
        &self,
        hit: CacheHit,
        leading: &[String],
        raw: &[&str],
    ) -> Result<Resolution, StoreError> {
        let rest = &raw[hit.consumed..];
        if hit.row.is_live() {
            return Ok(Resolution::found(hit.row.key.page, hit.row.key.mount, hit.consumed, rest));
        }

        if let Some(newer) = self.replacement(&hit.row)? {
            let target = PagePath::from_segments(
                leading
                    .iter()
                    .map(String::as_str)
                    .chain(newer.path.segments())
                    .chain(rest.iter().copied()),
            );
            crate::debug!(
                "resolve";
                "`{}` of page {} moved, redirecting to `{}`",
                hit.row.path, hit.row.key.page, target
            );
            return Ok(Resolution::Redirect(target));
        }

        Ok(Resolution::Found {
            page: hit.row.key.page,
            mount: hit.row.key.mount,
            consumed: hit.consumed,
            remaining: rest.iter().map(|s| (*s).to_owned()).collect(),
            stale: true,
        })
    }
}
