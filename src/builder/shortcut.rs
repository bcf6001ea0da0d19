//! Shortcut chain resolution.
//!
//! Shortcuts form a directed graph that may contain cycles. Following stops
//! at the first non-shortcut page, after `max_hops` hops, or when a page is
//! reached twice; in the last two cases the page reached so far is the
//! answer.

use rustc_hash::FxHashSet;

use crate::core::{MountContext, PageId};
use crate::tree::{PageTree, Shortcut};

/// Where a shortcut chain ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutTarget {
    pub page: PageId,
    pub mount: MountContext,
}

/// Follow shortcuts starting at `page`.
///
/// Returns `None` if a page on the chain does not exist.
pub fn resolve_shortcuts<T: PageTree + ?Sized>(
    tree: &T,
    page: PageId,
    mount: &MountContext,
    max_hops: u32,
) -> Option<ShortcutTarget> {
    let mut visited = FxHashSet::default();
    let mut current = page;
    let mut mount = mount.clone();

    for _ in 0..max_hops {
        let node = tree.node(current)?;
        let Some(shortcut) = node.shortcut() else {
            return Some(ShortcutTarget {
                page: current,
                mount,
            });
        };
        if !visited.insert(current) {
            crate::debug!("build"; "shortcut cycle at page {}", current);
            break;
        }

        match shortcut {
            Shortcut::Page(target) => {
                mount = MountContext::empty();
                current = target;
            }
            Shortcut::FirstChild => {
                let Some(entry) = tree.menu(current).into_iter().next() else {
                    break;
                };
                if let Some(info) = &entry.mount
                    && info.overlay
                {
                    mount = mount.with(&info.param());
                }
                current = entry.node.id;
            }
            Shortcut::Parent => current = node.parent?,
        }
    }

    tree.node(current)?;
    Some(ShortcutTarget {
        page: current,
        mount,
    })
}
