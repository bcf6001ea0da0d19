//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use speaking_url::config::PathConfig;
use speaking_url::core::{DAY, LanguageId, ManualClock, MountContext, PageId, PagePath};
use speaking_url::service::PathService;
use speaking_url::store::MemoryStore;
use speaking_url::tree::{DocType, MemoryTree, MountPoint, PageNode, Shortcut, TitleField};

pub type Service = PathService<MemoryTree, MemoryStore>;

pub const NOW: u64 = 100 * DAY;

/// ```text
/// 1 Home
/// ├── 10 Products
/// │   ├── 11 Shoes
/// │   └── 12 Boots (nav: Winter Boots)
/// ├── 20 Books (excluded from paths)
/// │   └── 21 TYPO3
/// ├── 30 Go (shortcut to 11)
/// ├── 40 Über uns
/// ├── 60 Shared (mounts 70 with overlay)
/// └── 61 Archive (mounts 70)
/// 2 Storage
/// └── 70 Library
///     └── 71 Manuals
/// ```
pub fn site() -> MemoryTree {
    let tree = MemoryTree::from_pages([
        PageNode::new(1, None, "Home"),
        PageNode::new(10, Some(PageId(1)), "Products"),
        PageNode::new(11, Some(PageId(10)), "Shoes"),
        PageNode::new(12, Some(PageId(10)), "Boots").with_title(TitleField::NavTitle, "Winter Boots"),
        PageNode::new(20, Some(PageId(1)), "Books").excluded(),
        PageNode::new(21, Some(PageId(20)), "TYPO3"),
        PageNode::new(30, Some(PageId(1)), "Go")
            .with_doc_type(DocType::Shortcut(Shortcut::Page(PageId(11)))),
        PageNode::new(40, Some(PageId(1)), "Über uns"),
        PageNode::new(60, Some(PageId(1)), "Shared").with_doc_type(DocType::Mount(MountPoint {
            target: PageId(70),
            overlay: true,
        })),
        PageNode::new(61, Some(PageId(1)), "Archive").with_doc_type(DocType::Mount(MountPoint {
            target: PageId(70),
            overlay: false,
        })),
        PageNode::new(2, None, "Storage"),
        PageNode::new(70, Some(PageId(2)), "Library"),
        PageNode::new(71, Some(PageId(70)), "Manuals"),
    ]);
    tree.set_overlay(PageId(10), LanguageId(1), TitleField::Title, "Produkte");
    tree
}

pub fn service_with(config: PathConfig) -> (Service, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW));
    let service = PathService::new(
        Arc::new(site()),
        Arc::new(MemoryStore::new()),
        config,
        clock.clone(),
    );
    (service, clock)
}

pub fn service() -> (Service, Arc<ManualClock>) {
    service_with(PathConfig::default())
}

pub fn uncached() -> Service {
    let mut config = PathConfig::default();
    config.cache.disabled = true;
    service_with(config).0
}

pub fn build(service: &Service, page: u32) -> PagePath {
    service
        .build_path(PageId(page), LanguageId::DEFAULT, &MountContext::empty())
        .unwrap()
}
