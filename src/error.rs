//! Error types for building, resolving and storing paths.
//!
//! A redirect is not an error: it is [`Resolution::Redirect`]. Cache
//! disagreement found while building is recovered internally and never
//! surfaces here.
//!
//! [`Resolution::Redirect`]: crate::resolver::Resolution::Redirect

use std::path::PathBuf;

use thiserror::Error;

use crate::core::PageId;

/// Path cache store failures. Never retried by this crate.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed cache snapshot `{0}`")]
    Snapshot(PathBuf, #[source] serde_json::Error),

    #[error("unsupported cache snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Why a page has no speaking path.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The page is excluded from path generation; suppress the link.
    #[error("page {0} is excluded from speaking paths")]
    Excluded(PageId),

    /// The page or its root chain could not be resolved.
    #[error("page {0} or its root could not be resolved")]
    NotFound(PageId),

    #[error("no page carries the alias `{0}`")]
    UnknownAlias(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why an incoming path could not be mapped to a page.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Several sibling pages encode to the same segment.
    #[error("segment `{segment}` is ambiguous between pages {}", join_ids(.candidates))]
    AmbiguousSegment {
        segment: String,
        candidates: Vec<PageId>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn join_ids(ids: &[PageId]) -> String {
    ids.iter()
        .map(PageId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
