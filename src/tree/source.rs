//! Hierarchy collaborator interface.
//!
//! The resolver never owns pages. It asks a [`PageTree`] for single records,
//! ordered children and localized titles, and derives everything else
//! (rootlines, override lookups) from those calls unless the implementation
//! offers something faster.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::{LanguageId, MountContext, PageId};

use super::{PageNode, TitleField};

/// Upper bound for parent walks, guards against corrupt parent links.
pub const MAX_ROOTLINE: usize = 100;

/// One rootline element with the mount context that applies to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootlineEntry {
    pub node: Arc<PageNode>,
    /// Mount pairs of the mount points above this page.
    pub mount: MountContext,
}

/// A child as it appears in a menu, with mount points already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Record used for titles and flags. For overlay mounts this is the
    /// mounted page, otherwise the child itself.
    pub node: Arc<PageNode>,
    pub mount: Option<MenuMount>,
}

/// Mount information of a menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuMount {
    /// The mount point page.
    pub mount_point: PageId,
    /// Root of the mounted subtree.
    pub target: PageId,
    pub overlay: bool,
}

impl MenuMount {
    /// `<target>-<mountpoint>` parameter for the mount context.
    pub fn param(&self) -> String {
        MountContext::param(self.target, self.mount_point)
    }
}

/// Read access to the page hierarchy.
///
/// Permission filtering is the implementor's concern: pages a visitor may
/// not see should simply not be returned.
pub trait PageTree: Send + Sync {
    /// Fetch a single page.
    fn node(&self, id: PageId) -> Option<Arc<PageNode>>;

    /// Children of `id` in display order.
    fn children(&self, id: PageId) -> Vec<Arc<PageNode>>;

    /// Translated value of a title field, if an overlay exists.
    fn localized_title(
        &self,
        id: PageId,
        language: LanguageId,
        field: TitleField,
    ) -> Option<String>;

    /// Find a page by its alias.
    fn find_by_alias(&self, _alias: &str) -> Option<PageId> {
        None
    }

    /// Chain from the top of the hierarchy down to `id`.
    ///
    /// Mount pairs in `mount` redirect the walk: when the mounted page is
    /// reached, the walk continues above its mount point. In overlay mode the
    /// mounted page takes the mount point's place, otherwise both appear.
    fn ancestor_chain(&self, id: PageId, mount: &MountContext) -> Vec<RootlineEntry> {
        let pairs: Vec<(PageId, PageId)> = mount.pairs().collect();
        let context_of = |active: usize| {
            pairs[..active]
                .iter()
                .fold(MountContext::empty(), |ctx, (target, mount_point)| {
                    ctx.with(&MountContext::param(*target, *mount_point))
                })
        };

        let mut chain = Vec::new();
        let mut active = pairs.len();
        let mut current = Some(id);

        while let Some(page_id) = current
            && chain.len() < MAX_ROOTLINE
        {
            let Some(node) = self.node(page_id) else {
                break;
            };
            let ctx = context_of(active);
            current = node.parent;

            if active > 0 && pairs[active - 1].0 == page_id {
                let mount_point_id = pairs[active - 1].1;
                active -= 1;
                chain.push(RootlineEntry { node, mount: ctx });
                if let Some(mount_point) = self.node(mount_point_id) {
                    let overlay = mount_point.mount().is_some_and(|m| m.overlay);
                    current = mount_point.parent;
                    if !overlay {
                        chain.push(RootlineEntry {
                            node: mount_point,
                            mount: context_of(active),
                        });
                    }
                }
                continue;
            }

            chain.push(RootlineEntry { node, mount: ctx });
        }

        chain.reverse();
        chain
    }

    /// Children of `id` in display order, without recyclers.
    ///
    /// A mount point whose target exists carries [`MenuMount`]; in overlay
    /// mode its record is replaced by the target's.
    fn menu(&self, id: PageId) -> Vec<MenuEntry> {
        self.children(id)
            .into_iter()
            .filter(|child| !child.is_recycler())
            .map(|child| {
                let Some(mount) = child.mount() else {
                    return MenuEntry { node: child, mount: None };
                };
                let Some(target) = self.node(mount.target).filter(|t| !t.is_recycler()) else {
                    return MenuEntry { node: child, mount: None };
                };
                let info = MenuMount {
                    mount_point: child.id,
                    target: target.id,
                    overlay: mount.overlay,
                };
                let node = if mount.overlay { target } else { child };
                MenuEntry {
                    node,
                    mount: Some(info),
                }
            })
            .collect()
    }

    /// Field value in `language`, falling back to the default record.
    fn title_in(&self, node: &PageNode, language: LanguageId, field: TitleField) -> Option<String> {
        if !language.is_default()
            && let Some(value) = self.localized_title(node.id, language, field)
        {
            return Some(value);
        }
        node.title(field).map(str::to_owned)
    }

    /// First non-empty field in priority order, translated where possible.
    fn first_title_in(
        &self,
        node: &PageNode,
        language: LanguageId,
        fields: &[TitleField],
    ) -> Option<String> {
        fields
            .iter()
            .find_map(|field| self.title_in(node, language, *field))
    }

    /// Pages below `root` whose override path equals `path`, ignoring ASCII case.
    ///
    /// For non-default languages the localized override segment is compared.
    fn pages_with_override(
        &self,
        root: PageId,
        path: &str,
        language: LanguageId,
        max_depth: u32,
    ) -> Vec<PageId> {
        let mut found = Vec::new();
        let mut queue: VecDeque<(PageId, u32)> = VecDeque::from([(root, 0)]);

        while let Some((parent, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for child in self.children(parent) {
                if child.is_recycler() {
                    continue;
                }
                let localized = (!language.is_default())
                    .then(|| self.localized_title(child.id, language, TitleField::PathSegment))
                    .flatten();
                let candidate = match localized.as_deref() {
                    Some(segment) if child.path_override => Some(segment.trim_matches('/')),
                    _ => child.override_path(),
                };
                if candidate.is_some_and(|c| c.eq_ignore_ascii_case(path)) {
                    found.push(child.id);
                }
                queue.push_back((child.id, depth + 1));
            }
        }
        found
    }

    /// `id` and all pages below it, up to `max_depth` levels.
    fn descendants(&self, id: PageId, max_depth: u32) -> Vec<PageId> {
        let mut seen = FxHashSet::from_iter([id]);
        let mut pages = vec![id];
        let mut level = vec![id];
        for _ in 0..max_depth {
            let next: Vec<PageId> = level
                .iter()
                .flat_map(|parent| self.children(*parent))
                .map(|child| child.id)
                .filter(|child| seen.insert(*child))
                .collect();
            if next.is_empty() {
                break;
            }
            pages.extend(&next);
            level = next;
        }
        pages
    }
}
