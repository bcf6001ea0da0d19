//! Speaking URLs for hierarchical pages.
//!
//! Builds human-readable paths like `products/winter_boots` from page titles
//! and resolves them back to page ids. Every built path is recorded in a path
//! cache; when a page moves or is renamed the old path is soft-expired
//! instead of deleted, so old links keep working as redirects until the
//! grace period ends.
//!
//! # Module Structure
//!
//! | Module      | Purpose                                              |
//! |-------------|------------------------------------------------------|
//! | `core`      | Ids, `MountContext`, `PagePath`, clocks              |
//! | `config`    | `speaking-url.toml` loading, validation, hot reload  |
//! | `logger`    | `log!` / `debug!` with colored prefixes              |
//! | `encode`    | Title to path segment encoding                       |
//! | `tree`      | `PageTree` hierarchy interface and `MemoryTree`      |
//! | `store`     | `PathCacheStore` interface and `MemoryStore`         |
//! | `builder`   | Page to path                                         |
//! | `resolver`  | Path to page, redirects for moved paths              |
//! | `reconcile` | Cache write protocol and invalidation                |
//! | `service`   | `PathService` facade with request-level caches       |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use speaking_url::config::PathConfig;
//! use speaking_url::core::{LanguageId, MountContext, PageId, SystemClock};
//! use speaking_url::service::PathService;
//! use speaking_url::store::MemoryStore;
//! use speaking_url::tree::{MemoryTree, PageNode};
//!
//! let tree = MemoryTree::from_pages([
//!     PageNode::new(1, None, "Home"),
//!     PageNode::new(10, Some(PageId(1)), "Products"),
//! ]);
//! let service = PathService::new(
//!     Arc::new(tree),
//!     Arc::new(MemoryStore::new()),
//!     PathConfig::default(),
//!     Arc::new(SystemClock),
//! );
//!
//! let path = service.build_path(PageId(10), LanguageId::DEFAULT, &MountContext::empty());
//! assert_eq!(path.unwrap().as_str(), "products");
//!
//! let found = service.resolve_path("/products/", LanguageId::DEFAULT).unwrap();
//! assert_eq!(found.page(), Some(PageId(10)));
//! ```

#[macro_use]
pub mod logger;
pub mod core;
pub mod builder;
pub mod config;
pub mod encode;
pub mod error;
pub mod reconcile;
pub mod resolver;
pub mod service;
pub mod store;
pub mod tree;

mod utils;

#[cfg(test)]
mod testing;

pub use builder::{PageRef, ResolutionContext};
pub use error::{EncodeError, ResolveError, StoreError};
pub use reconcile::ChangeKind;
pub use resolver::Resolution;
pub use service::PathService;
