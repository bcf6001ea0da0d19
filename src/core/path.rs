//! Page path type for speaking paths.
//!
//! - Segments are already encoded (output of the segment encoder)
//! - No leading or trailing slash: `products/shoes`
//! - The empty path addresses the root page itself

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Encoded speaking path, segments joined with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PagePath(Arc<str>);

impl PagePath {
    /// Create from a path string. Surrounding slashes are trimmed.
    pub fn new(path: &str) -> Self {
        Self(Arc::from(path.trim().trim_matches('/')))
    }

    /// Join segments, omitting empty ones.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Self(Arc::from(joined))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Plain string prefix check, used to detect cached paths that were
    /// produced through a different (parallel) mount.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

/// Split a request path into its encoded segments.
///
/// Query string and fragment are dropped, empty segments are skipped. The
/// rest is kept as requested: a leading `//` names no host, `:` is no
/// scheme separator and `.` or `..` are ordinary segments.
///
/// ```
/// use speaking_url::core::split_request_path;
/// assert_eq!(split_request_path("/products/shoes/?page=2"), vec!["products", "shoes"]);
/// ```
pub fn split_request_path(request: &str) -> Vec<String> {
    let path = request.trim();
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for PagePath {
    fn default() -> Self {
        Self(Arc::from(""))
    }
}

impl AsRef<str> for PagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PagePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PagePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PagePath {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl PartialEq<str> for PagePath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for PagePath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for PagePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PagePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_slashes() {
        assert_eq!(PagePath::new("/products/shoes/"), "products/shoes");
        assert_eq!(PagePath::new("/"), "");
        assert!(PagePath::new("").is_empty());
    }

    #[test]
    fn test_from_segments_omits_empty() {
        let path = PagePath::from_segments(["products", "", "shoes"]);
        assert_eq!(path, "products/shoes");
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn test_starts_with_is_plain_prefix() {
        let path = PagePath::new("products/shoes");
        assert!(path.starts_with(""));
        assert!(path.starts_with("products"));
        assert!(!path.starts_with("shop"));
    }

    #[test]
    fn test_split_request_path() {
        assert_eq!(split_request_path("/a/b/"), vec!["a", "b"]);
        assert_eq!(split_request_path("a//b#top"), vec!["a", "b"]);
        assert_eq!(split_request_path("/a/b?x=1&y=2"), vec!["a", "b"]);
        assert!(split_request_path("/").is_empty());
    }

    #[test]
    fn test_split_request_path_keeps_segments_verbatim() {
        assert_eq!(split_request_path("//products/shoes"), vec!["products", "shoes"]);
        assert_eq!(split_request_path("/products/../shoes"), vec!["products", "..", "shoes"]);
        assert_eq!(split_request_path("news:2024/archive"), vec!["news:2024", "archive"]);
    }

    #[test]
    fn test_serde_roundtrip_normalizes() {
        let path: PagePath = serde_json::from_str("\"/a/b/\"").unwrap();
        assert_eq!(path, "a/b");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"a/b\"");
    }
}
