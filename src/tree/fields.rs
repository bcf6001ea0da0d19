//! Title-like page fields that can produce a path segment.

use serde::{Deserialize, Serialize};

/// A page field that may carry the text for its path segment.
///
/// The configured list is evaluated in order and the first non-empty value
/// wins when building a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleField {
    /// Explicit segment (or whole path when the override flag is set).
    PathSegment,
    /// Page alias, also used for alias lookups.
    Alias,
    /// Navigation title.
    NavTitle,
    /// Page title.
    Title,
    Subtitle,
}

impl TitleField {
    pub const DEFAULT_PRIORITY: [Self; 4] =
        [Self::PathSegment, Self::Alias, Self::NavTitle, Self::Title];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PathSegment => "path_segment",
            Self::Alias => "alias",
            Self::NavTitle => "nav_title",
            Self::Title => "title",
            Self::Subtitle => "subtitle",
        }
    }
}
