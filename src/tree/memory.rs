//! Arena-backed page tree.
//!
//! Pages are addressed by id, children are kept as ordered id lists, so the
//! structure has no reference cycles even when mount points and shortcuts
//! point back up the tree.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::core::{LanguageId, PageId};

use super::{PageNode, PageTree, TitleField};

#[derive(Debug, Default)]
struct Arena {
    nodes: FxHashMap<PageId, Arc<PageNode>>,
    children: FxHashMap<PageId, Vec<PageId>>,
    overlays: FxHashMap<(PageId, LanguageId, TitleField), String>,
}

impl Arena {
    fn detach(&mut self, id: PageId, parent: Option<PageId>) {
        if let Some(parent) = parent
            && let Some(siblings) = self.children.get_mut(&parent)
        {
            siblings.retain(|child| *child != id);
        }
    }

    fn attach(&mut self, id: PageId, parent: Option<PageId>) {
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().push(id);
        }
    }
}

/// In-memory [`PageTree`] with interior mutability for edits.
#[derive(Debug, Default)]
pub struct MemoryTree {
    arena: RwLock<Arena>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from pages given in display order.
    pub fn from_pages(pages: impl IntoIterator<Item = PageNode>) -> Self {
        let tree = Self::new();
        for page in pages {
            tree.insert(page);
        }
        tree
    }

    /// Insert or replace a page. A new page is appended to its parent's children.
    pub fn insert(&self, node: PageNode) {
        let mut arena = self.arena.write();
        let id = node.id;
        let parent = node.parent;
        match arena.nodes.insert(id, Arc::new(node)) {
            Some(old) if old.parent == parent => {}
            Some(old) => {
                arena.detach(id, old.parent);
                arena.attach(id, parent);
            }
            None => arena.attach(id, parent),
        }
    }

    /// Edit a page in place. Returns `false` if the page does not exist.
    ///
    /// Changing `parent` moves the page to the end of its new siblings.
    pub fn update(&self, id: PageId, edit: impl FnOnce(&mut PageNode)) -> bool {
        let Some(current) = self.arena.read().nodes.get(&id).cloned() else {
            return false;
        };
        let mut node = (*current).clone();
        edit(&mut node);
        node.id = id;
        self.insert(node);
        true
    }

    /// Remove a page and detach it from its parent. Children are kept.
    pub fn remove(&self, id: PageId) -> Option<Arc<PageNode>> {
        let mut arena = self.arena.write();
        let node = arena.nodes.remove(&id)?;
        arena.detach(id, node.parent);
        Some(node)
    }

    /// Set a translated field value.
    pub fn set_overlay(&self, id: PageId, language: LanguageId, field: TitleField, value: &str) {
        self.arena
            .write()
            .overlays
            .insert((id, language, field), value.to_owned());
    }

    pub fn len(&self) -> usize {
        self.arena.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.read().nodes.is_empty()
    }
}

impl PageTree for MemoryTree {
    fn node(&self, id: PageId) -> Option<Arc<PageNode>> {
        self.arena.read().nodes.get(&id).cloned()
    }

    fn children(&self, id: PageId) -> Vec<Arc<PageNode>> {
        let arena = self.arena.read();
        arena
            .children
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|child| arena.nodes.get(child).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn localized_title(
        &self,
        id: PageId,
        language: LanguageId,
        field: TitleField,
    ) -> Option<String> {
        self.arena
            .read()
            .overlays
            .get(&(id, language, field))
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }

    fn find_by_alias(&self, alias: &str) -> Option<PageId> {
        let arena = self.arena.read();
        arena
            .nodes
            .values()
            .filter(|node| node.alias() == Some(alias))
            .map(|node| node.id)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MountContext;
    use crate::tree::{DocType, MountPoint};

    fn sample() -> MemoryTree {
        MemoryTree::from_pages([
            PageNode::new(1, None, "Home"),
            PageNode::new(2, Some(PageId(1)), "About"),
            PageNode::new(3, Some(PageId(1)), "Products"),
            PageNode::new(4, Some(PageId(3)), "Shoes").with_title(TitleField::Alias, "shoes"),
        ])
    }

    fn ids(chain: &[crate::tree::RootlineEntry]) -> Vec<u32> {
        chain.iter().map(|entry| entry.node.id.get()).collect()
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let tree = sample();
        let children: Vec<u32> = tree.children(PageId(1)).iter().map(|c| c.id.get()).collect();
        assert_eq!(children, vec![2, 3]);
        assert!(tree.children(PageId(4)).is_empty());
    }

    #[test]
    fn test_update_moves_page() {
        let tree = sample();
        assert!(tree.update(PageId(4), |node| node.parent = Some(PageId(2))));
        assert!(tree.children(PageId(3)).is_empty());
        assert_eq!(tree.children(PageId(2))[0].id, PageId(4));
        assert!(!tree.update(PageId(99), |_| {}));
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let tree = sample();
        tree.update(PageId(2), |node| {
            node.titles.insert(TitleField::Title, "About us".into());
        });
        let children = tree.children(PageId(1));
        assert_eq!(children[0].id, PageId(2));
        assert_eq!(children[0].title(TitleField::Title), Some("About us"));
    }

    #[test]
    fn test_remove_detaches() {
        let tree = sample();
        assert!(tree.remove(PageId(2)).is_some());
        assert_eq!(tree.children(PageId(1)).len(), 1);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_alias_and_overlay() {
        let tree = sample();
        assert_eq!(tree.find_by_alias("shoes"), Some(PageId(4)));
        assert_eq!(tree.find_by_alias("boots"), None);

        tree.set_overlay(PageId(3), LanguageId(1), TitleField::Title, "Produkte");
        assert_eq!(
            tree.localized_title(PageId(3), LanguageId(1), TitleField::Title),
            Some("Produkte".into())
        );
        assert_eq!(
            tree.localized_title(PageId(3), LanguageId(2), TitleField::Title),
            None
        );
    }

    #[test]
    fn test_ancestor_chain_plain() {
        let tree = sample();
        let chain = tree.ancestor_chain(PageId(4), &MountContext::empty());
        assert_eq!(ids(&chain), vec![1, 3, 4]);
        assert!(chain.iter().all(|entry| entry.mount.is_empty()));
    }

    #[test]
    fn test_ancestor_chain_through_mount_point() {
        // 1 ── 2 (mounts 10) ; 1 ── 9 ── 10 ── 11
        let tree = MemoryTree::from_pages([
            PageNode::new(1, None, "Home"),
            PageNode::new(2, Some(PageId(1)), "Shared").with_doc_type(DocType::Mount(MountPoint {
                target: PageId(10),
                overlay: false,
            })),
            PageNode::new(9, Some(PageId(1)), "Storage"),
            PageNode::new(10, Some(PageId(9)), "Library"),
            PageNode::new(11, Some(PageId(10)), "Books"),
        ]);

        let mount = MountContext::from("10-2");
        let chain = tree.ancestor_chain(PageId(11), &mount);
        assert_eq!(ids(&chain), vec![1, 2, 10, 11]);
        assert!(chain[1].mount.is_empty());
        assert_eq!(chain[2].mount.as_str(), "10-2");
        assert_eq!(chain[3].mount.as_str(), "10-2");
    }

    #[test]
    fn test_ancestor_chain_overlay_mount_replaces_mount_point() {
        let tree = MemoryTree::from_pages([
            PageNode::new(1, None, "Home"),
            PageNode::new(2, Some(PageId(1)), "Shared").with_doc_type(DocType::Mount(MountPoint {
                target: PageId(10),
                overlay: true,
            })),
            PageNode::new(9, Some(PageId(1)), "Storage"),
            PageNode::new(10, Some(PageId(9)), "Library"),
        ]);
        let chain = tree.ancestor_chain(PageId(10), &MountContext::from("10-2"));
        assert_eq!(ids(&chain), vec![1, 10]);
    }

    #[test]
    fn test_ancestor_chain_stops_on_parent_cycle() {
        let tree = MemoryTree::from_pages([
            PageNode::new(1, Some(PageId(2)), "A"),
            PageNode::new(2, Some(PageId(1)), "B"),
        ]);
        let chain = tree.ancestor_chain(PageId(1), &MountContext::empty());
        assert_eq!(chain.len(), crate::tree::MAX_ROOTLINE);
    }

    #[test]
    fn test_pages_with_override() {
        let tree = MemoryTree::from_pages([
            PageNode::new(1, None, "Home"),
            PageNode::new(2, Some(PageId(1)), "Deals").with_override("/sale/now/"),
            PageNode::new(3, Some(PageId(2)), "Deep").with_override("deep"),
        ]);
        assert_eq!(
            tree.pages_with_override(PageId(1), "sale/now", LanguageId::DEFAULT, 99),
            vec![PageId(2)]
        );
        assert_eq!(
            tree.pages_with_override(PageId(1), "deep", LanguageId::DEFAULT, 1),
            Vec::<PageId>::new()
        );

        tree.set_overlay(PageId(2), LanguageId(1), TitleField::PathSegment, "angebote");
        assert_eq!(
            tree.pages_with_override(PageId(1), "angebote", LanguageId(1), 99),
            vec![PageId(2)]
        );
    }

    #[test]
    fn test_menu_applies_mount_points_and_skips_recyclers() {
        let tree = MemoryTree::from_pages([
            PageNode::new(1, None, "Home"),
            PageNode::new(2, Some(PageId(1)), "Overlay").with_doc_type(DocType::Mount(MountPoint {
                target: PageId(10),
                overlay: true,
            })),
            PageNode::new(3, Some(PageId(1)), "Plain").with_doc_type(DocType::Mount(MountPoint {
                target: PageId(10),
                overlay: false,
            })),
            PageNode::new(4, Some(PageId(1)), "Dangling").with_doc_type(DocType::Mount(MountPoint {
                target: PageId(99),
                overlay: true,
            })),
            PageNode::new(5, Some(PageId(1)), "Trash").with_doc_type(DocType::Recycler),
            PageNode::new(10, None, "Library"),
        ]);

        let menu = tree.menu(PageId(1));
        assert_eq!(menu.len(), 3);
        assert_eq!(menu[0].node.id, PageId(10));
        assert_eq!(menu[0].mount.as_ref().map(|m| m.param()), Some("10-2".to_string()));
        assert_eq!(menu[1].node.id, PageId(3));
        assert!(menu[1].mount.as_ref().is_some_and(|m| !m.overlay));
        assert_eq!(menu[2].node.id, PageId(4));
        assert!(menu[2].mount.is_none());
    }

    #[test]
    fn test_first_title_in_prefers_translation() {
        let tree = sample();
        tree.set_overlay(PageId(3), LanguageId(1), TitleField::Title, "Produkte");
        let node = tree.node(PageId(3)).unwrap();
        let fields = TitleField::DEFAULT_PRIORITY;
        assert_eq!(
            tree.first_title_in(&node, LanguageId(1), &fields).as_deref(),
            Some("Produkte")
        );
        assert_eq!(
            tree.first_title_in(&node, LanguageId(2), &fields).as_deref(),
            Some("Products")
        );
        assert_eq!(
            tree.first_title_in(&node, LanguageId::DEFAULT, &fields).as_deref(),
            Some("Products")
        );
    }

    #[test]
    fn test_descendants() {
        let tree = sample();
        let mut pages = tree.descendants(PageId(1), 99);
        pages.sort();
        assert_eq!(pages, vec![PageId(1), PageId(2), PageId(3), PageId(4)]);
        assert_eq!(tree.descendants(PageId(1), 1).len(), 3);
    }
}
