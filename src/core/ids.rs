//! Identifier newtypes.
//!
//! Pages, languages, roots and cache rows are all plain integers in the
//! collaborator stores. Wrapping them keeps a page id from being passed where a
//! language id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page (resource) identifier in the hierarchy. `0` is the virtual top.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PageId(pub u32);

impl PageId {
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Language identifier. `0` is the default language.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LanguageId(pub u32);

impl LanguageId {
    pub const DEFAULT: Self = Self(0);

    /// Check if this is the default language (no overlay lookups needed).
    #[inline]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LanguageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identifies which hierarchy root (site/domain) a cached path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootId(pub u32);

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PageId> for RootId {
    fn from(page: PageId) -> Self {
        Self(page.0)
    }
}

impl From<RootId> for PageId {
    fn from(root: RootId) -> Self {
        Self(root.0)
    }
}

/// Opaque identity of a path cache row, generated on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheId(pub u64);

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
