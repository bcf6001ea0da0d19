//! `[post_vars]` section configuration.
//!
//! Trailing segments that carry parameters rather than pages. A cached path
//! followed by one of these names is still a valid match when decoding.
//!
//! # Example
//!
//! ```toml
//! [post_vars]
//! sets = ["article", "page"]     # valid after any page
//!
//! [[post_vars.fixed]]
//! page = 12                      # only valid after page 12
//! names = ["year", "month"]
//! ```

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::core::PageId;

/// Post-variable names bound to a single page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixedPostVars {
    pub page: PageId,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PostVarsConfig {
    /// Names accepted after any page.
    pub sets: Vec<String>,
    /// Names accepted only after a specific page.
    pub fixed: Vec<FixedPostVars>,
}

impl PostVarsConfig {
    const FIELD_FIXED: FieldPath = FieldPath::new("post_vars.fixed");

    /// Whether `segment` is a known post-variable for `page`.
    ///
    /// Names match regardless of case and percent-encoding.
    pub fn accepts(&self, page: PageId, segment: &str) -> bool {
        let segment = percent_decode_str(segment).decode_utf8_lossy().to_lowercase();
        let named = |name: &String| name.to_lowercase() == segment;
        self.sets.iter().any(named)
            || self
                .fixed
                .iter()
                .filter(|fixed| fixed.page == page)
                .any(|fixed| fixed.names.iter().any(named))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut pages = FxHashSet::default();
        for fixed in &self.fixed {
            if !pages.insert(fixed.page) {
                diag.error_with_hint(
                    Self::FIELD_FIXED,
                    format!("page {} is configured more than once", fixed.page),
                    "merge the `names` lists into one entry",
                );
            }
            if fixed.names.iter().any(|name| name.is_empty() || name.contains('/')) {
                diag.error(
                    Self::FIELD_FIXED,
                    format!("page {} has an empty or slash-containing name", fixed.page),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_post_vars_accepts() {
        let config = test_parse_config(
            r#"
[post_vars]
sets = ["article"]

[[post_vars.fixed]]
page = 12
names = ["year"]
"#,
        );
        let post_vars = &config.post_vars;
        assert!(post_vars.accepts(PageId(3), "article"));
        assert!(post_vars.accepts(PageId(12), "year"));
        assert!(!post_vars.accepts(PageId(3), "year"));
        assert!(!post_vars.accepts(PageId(12), "month"));
    }

    #[test]
    fn test_post_vars_ignore_case_and_encoding() {
        let config = test_parse_config(
            r#"
[post_vars]
sets = ["Page", "Größe"]
"#,
        );
        let post_vars = &config.post_vars;
        assert!(post_vars.accepts(PageId(3), "page"));
        assert!(post_vars.accepts(PageId(3), "PAGE"));
        assert!(post_vars.accepts(PageId(3), "gr%C3%B6%C3%9Fe"));
    }

    #[test]
    fn test_validate_duplicate_page() {
        let post_vars = PostVarsConfig {
            sets: vec![],
            fixed: vec![
                FixedPostVars { page: PageId(1), names: vec!["a".into()] },
                FixedPostVars { page: PageId(1), names: vec!["b".into()] },
            ],
        };
        let mut diag = ConfigDiagnostics::new();
        post_vars.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
