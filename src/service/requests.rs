//! Request-level caches in front of the builder and resolver.
//!
//! Both maps only save repeated work inside a process; the path cache store
//! stays authoritative. Entries are dropped per page on every mutation.

use dashmap::DashMap;
use rustc_hash::FxHashSet;

use crate::core::{LanguageId, MountContext, PageId, PagePath, RootId};
use crate::resolver::Resolution;

/// `(page, language, mount, root)` of a built path.
pub type EncodeKey = (PageId, LanguageId, MountContext, RootId);

/// `(root, language, normalized request path)` of a resolved request.
pub type DecodeKey = (RootId, LanguageId, String);

#[derive(Debug, Default)]
pub struct RequestCaches {
    encoded: DashMap<EncodeKey, PagePath>,
    decoded: DashMap<DecodeKey, Resolution>,
}

impl RequestCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoded(&self, key: &EncodeKey) -> Option<PagePath> {
        self.encoded.get(key).map(|path| path.clone())
    }

    pub fn remember_encoded(&self, key: EncodeKey, path: PagePath) {
        self.encoded.insert(key, path);
    }

    pub fn decoded(&self, key: &DecodeKey) -> Option<Resolution> {
        self.decoded.get(key).map(|resolution| resolution.clone())
    }

    /// Keep `resolution` if it is an exact, fresh match.
    pub fn remember_decoded(&self, key: DecodeKey, resolution: &Resolution) {
        if resolution.is_cacheable() {
            self.decoded.insert(key, resolution.clone());
        }
    }

    /// Drop every entry that belongs to one of `pages`.
    ///
    /// Returns the number of entries removed.
    pub fn forget_pages(&self, pages: &[PageId]) -> usize {
        let pages: FxHashSet<PageId> = pages.iter().copied().collect();
        let before = self.len();
        self.encoded.retain(|(page, ..), _| !pages.contains(page));
        self.decoded
            .retain(|_, resolution| resolution.page().is_none_or(|page| !pages.contains(&page)));
        before - self.len()
    }

    /// Drop decoded requests for `path` and for every path below it.
    ///
    /// Returns the number of entries removed.
    pub fn forget_paths_under(&self, path: &PagePath) -> usize {
        let before = self.decoded.len();
        let prefix = format!("{path}/");
        self.decoded.retain(|(_, _, request), _| {
            request != path.as_str() && !(path.is_empty() || request.starts_with(&prefix))
        });
        before - self.decoded.len()
    }

    /// Drop every decoded request.
    pub fn clear_decoded(&self) {
        self.decoded.clear();
    }

    pub fn clear(&self) {
        self.encoded.clear();
        self.decoded.clear();
    }

    pub fn len(&self) -> usize {
        self.encoded.len() + self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_key(page: u32) -> EncodeKey {
        (PageId(page), LanguageId::DEFAULT, MountContext::empty(), RootId(1))
    }

    fn decode_key(path: &str) -> DecodeKey {
        (RootId(1), LanguageId::DEFAULT, path.to_owned())
    }

    #[test]
    fn test_redirects_are_not_remembered() {
        let caches = RequestCaches::new();
        caches.remember_decoded(
            decode_key("products"),
            &Resolution::Redirect(PagePath::new("our_products")),
        );
        assert!(caches.is_empty());

        let found = Resolution::found(PageId(10), MountContext::empty(), 1, &[]);
        caches.remember_decoded(decode_key("products"), &found);
        assert_eq!(caches.decoded(&decode_key("products")), Some(found));
    }

    #[test]
    fn test_forget_pages() {
        let caches = RequestCaches::new();
        caches.remember_encoded(encode_key(10), PagePath::new("products"));
        caches.remember_encoded(encode_key(11), PagePath::new("products/shoes"));
        caches.remember_decoded(
            decode_key("products"),
            &Resolution::found(PageId(10), MountContext::empty(), 1, &[]),
        );

        assert_eq!(caches.forget_pages(&[PageId(10)]), 2);
        assert_eq!(caches.len(), 1);
        assert_eq!(
            caches.encoded(&encode_key(11)).unwrap(),
            "products/shoes"
        );

        caches.clear();
        assert!(caches.is_empty());
    }

    #[test]
    fn test_partial_matches_are_not_remembered() {
        let caches = RequestCaches::new();
        caches.remember_decoded(
            decode_key("news"),
            &Resolution::found(PageId(1), MountContext::empty(), 0, &["news"]),
        );
        assert!(caches.is_empty());
    }

    #[test]
    fn test_forget_paths_under() {
        let caches = RequestCaches::new();
        for (page, path) in [(10, "products"), (11, "products/shoes"), (30, "productsale")] {
            caches.remember_decoded(
                decode_key(path),
                &Resolution::found(PageId(page), MountContext::empty(), 1, &[]),
            );
        }

        assert_eq!(caches.forget_paths_under(&PagePath::new("products")), 2);
        assert!(caches.decoded(&decode_key("productsale")).is_some());
        assert!(caches.decoded(&decode_key("products")).is_none());
    }
}
