//! `[tree]` section configuration.
//!
//! How the page hierarchy is entered and which pages take part in paths.
//!
//! # Example
//!
//! ```toml
//! [tree]
//! root_page = 1                 # template root of the site
//! excluded_pages = [17, 18]     # never get a speaking path
//! resolve_shortcuts = true
//! max_shortcut_hops = 20
//! language_exceptions = [4]     # built as the default language
//! max_depth = 99
//! ```

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::core::{LanguageId, PageId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// Template root page; fallback root when no inner site root is found.
    pub root_page: PageId,
    /// Pages that never get a speaking path.
    pub excluded_pages: Vec<PageId>,
    /// Follow shortcut pages to their destination when building paths.
    pub resolve_shortcuts: bool,
    /// Upper bound for chained shortcuts.
    pub max_shortcut_hops: u32,
    /// Languages encoded as the default language.
    pub language_exceptions: Vec<LanguageId>,
    /// Bound for recursive walks and descendant collection.
    pub max_depth: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_page: PageId(1),
            excluded_pages: Vec::new(),
            resolve_shortcuts: true,
            max_shortcut_hops: 20,
            language_exceptions: Vec::new(),
            max_depth: 99,
        }
    }
}

impl TreeConfig {
    const FIELD_MAX_SHORTCUT_HOPS: FieldPath = FieldPath::new("tree.max_shortcut_hops");
    const FIELD_MAX_DEPTH: FieldPath = FieldPath::new("tree.max_depth");
    const FIELD_EXCLUDED_PAGES: FieldPath = FieldPath::new("tree.excluded_pages");

    #[inline]
    pub fn is_excluded(&self, page: PageId) -> bool {
        self.excluded_pages.contains(&page)
    }

    /// Language used for encoding, after applying exceptions.
    pub fn effective_language(&self, language: LanguageId) -> LanguageId {
        if self.language_exceptions.contains(&language) {
            LanguageId::DEFAULT
        } else {
            language
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_shortcut_hops == 0 {
            diag.error(
                Self::FIELD_MAX_SHORTCUT_HOPS,
                "must be at least 1 (use `resolve_shortcuts = false` to disable)",
            );
        }
        if self.max_depth == 0 {
            diag.error(Self::FIELD_MAX_DEPTH, "must be at least 1");
        }
        if self.is_excluded(self.root_page) {
            diag.error_with_hint(
                Self::FIELD_EXCLUDED_PAGES,
                format!("root page {} cannot be excluded", self.root_page),
                "exclude individual pages below the root instead",
            );
        }
    }
}
