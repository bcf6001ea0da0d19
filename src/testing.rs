//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::config::PathConfig;
use crate::core::{DAY, ManualClock, PageId};
use crate::service::PathService;
use crate::store::MemoryStore;
use crate::tree::{MemoryTree, PageNode, TitleField};

/// Start of day 100, well past any sweep marker.
pub const NOW: u64 = 100 * DAY;

/// A small site:
///
/// ```text
/// 1 Home
/// ├── 10 Products
/// │   ├── 11 Shoes
/// │   └── 12 Boots (nav: Winter Boots)
/// └── 20 Books (excluded from paths)
///     └── 21 TYPO3
/// ```
pub fn tree() -> MemoryTree {
    MemoryTree::from_pages([
        PageNode::new(1, None, "Home"),
        PageNode::new(10, Some(PageId(1)), "Products"),
        PageNode::new(11, Some(PageId(10)), "Shoes"),
        PageNode::new(12, Some(PageId(10)), "Boots")
            .with_title(TitleField::NavTitle, "Winter Boots"),
        PageNode::new(20, Some(PageId(1)), "Books").excluded(),
        PageNode::new(21, Some(PageId(20)), "TYPO3"),
    ])
}

pub fn service() -> PathService<MemoryTree, MemoryStore> {
    PathService::new(
        Arc::new(tree()),
        Arc::new(MemoryStore::new()),
        PathConfig::default(),
        Arc::new(ManualClock::new(NOW)),
    )
}
