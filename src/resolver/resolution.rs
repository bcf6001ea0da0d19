//! Resolution outcomes.

use crate::core::{MountContext, PageId, PagePath};

/// Result of mapping a request path to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The request addresses `page`.
    Found {
        page: PageId,
        /// Mount context to render the page in.
        mount: MountContext,
        /// Request segments that identified the page.
        consumed: usize,
        /// Trailing segments left for parameter decoding.
        remaining: Vec<String>,
        /// Matched through a soft-expired row that has no replacement yet;
        /// the result must not be memoized.
        stale: bool,
    },
    /// The path moved; send the client to this one.
    Redirect(PagePath),
}

impl Resolution {
    pub(crate) fn found(page: PageId, mount: MountContext, consumed: usize, rest: &[&str]) -> Self {
        Self::Found {
            page,
            mount,
            consumed,
            remaining: rest.iter().map(|s| (*s).to_owned()).collect(),
            stale: false,
        }
    }

    /// The resolved page, unless this is a redirect.
    pub fn page(&self) -> Option<PageId> {
        match self {
            Self::Found { page, .. } => Some(*page),
            Self::Redirect(_) => None,
        }
    }

    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    /// Whether the outcome may be kept in a request-level cache.
    ///
    /// Only exact matches qualify: a partial match depends on which pages
    /// exist below the matched one, and that changes without the matched
    /// page changing.
    pub fn is_cacheable(&self) -> bool {
        match self {
            Self::Found {
                remaining, stale, ..
            } => !*stale && remaining.is_empty(),
            Self::Redirect(_) => false,
        }
    }
}
