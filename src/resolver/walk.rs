//! Tree side of decoding: override paths first, then segment by segment.
//!
//! At every level the segment is compared with the encoded titles of the
//! menu children. Pages excluded from paths are transparent: their children
//! are tried with the same segment before the excluded page itself is taken
//! as a match.

use rustc_hash::FxHashMap;

use crate::builder::ResolutionContext;
use crate::core::{LanguageId, MountContext, PageId};
use crate::error::ResolveError;
use crate::store::PathCacheStore;
use crate::tree::{MenuEntry, PageNode, PageTree};

use super::{PathResolver, Resolution};

/// Where the walk stands.
#[derive(Debug, Clone)]
struct Position {
    page: PageId,
    mount: MountContext,
    /// A non-transparent page matched somewhere on the way here.
    matched: bool,
}

/// Pages a segment is compared with.
#[derive(Debug, Clone, Copy)]
enum Level {
    /// Menu children of a page.
    Children(PageId),
    /// The page mounted by a plain mount point, which keeps its own segment.
    Mounted(PageId),
}

/// Children of one page compared against one segment.
#[derive(Debug, Default)]
struct LevelMatch {
    found: Option<MenuEntry>,
    /// Excluded page whose own title matched.
    possible: Option<MenuEntry>,
    excluded: Vec<MenuEntry>,
}

impl<T: PageTree + ?Sized, S: PathCacheStore> PathResolver<'_, T, S> {
    /// Resolve `raw` by walking the hierarchy below `root`.
    pub(super) fn resolve_in_tree(
        &self,
        ctx: &ResolutionContext,
        raw: &[&str],
    ) -> Result<Resolution, ResolveError> {
        let root = PageId::from(ctx.root);
        let (start, skipped) = self.override_match(ctx, root, raw)?.unwrap_or((root, 0));

        let position = Position {
            page: start,
            mount: MountContext::empty(),
            matched: false,
        };
        let (position, used) = self.find_by_segment(
            ctx,
            Level::Children(start),
            &MountContext::empty(),
            &raw[skipped..],
            position,
            0,
        )?;

        let consumed = skipped + used;
        Ok(Resolution::found(
            position.page,
            position.mount,
            consumed,
            &raw[consumed..],
        ))
    }

    /// Longest request prefix equal to a page's override path.
    fn override_match(
        &self,
        ctx: &ResolutionContext,
        root: PageId,
        raw: &[&str],
    ) -> Result<Option<(PageId, usize)>, ResolveError> {
        for len in (1..=raw.len()).rev() {
            let path = raw[..len].join("/");
            let pages = self.tree.pages_with_override(
                root,
                &path,
                self.language(ctx),
                self.config.tree.max_depth,
            );
            match pages.as_slice() {
                [] => continue,
                [page] => return Ok(Some((*page, len))),
                _ => {
                    crate::debug!("resolve"; "override path `{}` is set on {} pages", path, pages.len());
                    return Err(ResolveError::AmbiguousSegment {
                        segment: path,
                        candidates: pages,
                    });
                }
            }
        }
        Ok(None)
    }

    /// Consume as many of `segments` as possible from `level` downwards.
    ///
    /// Returns the deepest position reached and the number of segments used.
    fn find_by_segment(
        &self,
        ctx: &ResolutionContext,
        level: Level,
        mount: &MountContext,
        segments: &[&str],
        current: Position,
        depth: u32,
    ) -> Result<(Position, usize), ResolveError> {
        let Some((segment, rest)) = segments.split_first() else {
            return Ok((current, 0));
        };
        if depth >= self.config.tree.max_depth {
            crate::debug!("resolve"; "walk at {:?} exceeds the depth limit", level);
            return Ok((current, 0));
        }

        let hits = self.match_level(ctx, level, segment)?;

        if let Some(entry) = hits.found {
            let (position, used) = self.descend(ctx, &entry, mount, rest, true, depth)?;
            return Ok((position, used + 1));
        }
        for entry in &hits.excluded {
            let (position, used) = self.descend(ctx, entry, mount, segments, false, depth)?;
            if position.matched {
                return Ok((position, used));
            }
        }
        if let Some(entry) = hits.possible {
            let (position, used) = self.descend(ctx, &entry, mount, rest, true, depth)?;
            return Ok((position, used + 1));
        }
        Ok((current, 0))
    }

    /// Step onto `entry` and continue below it.
    ///
    /// A plain mount point is reported as itself and the next segment must
    /// name the mounted page; an overlay mount is reported with the new
    /// context and the walk continues below the mounted page.
    fn descend(
        &self,
        ctx: &ResolutionContext,
        entry: &MenuEntry,
        mount: &MountContext,
        segments: &[&str],
        matched: bool,
        depth: u32,
    ) -> Result<(Position, usize), ResolveError> {
        let mut next = Level::Children(entry.node.id);
        let mut position = Position {
            page: entry.node.id,
            mount: mount.clone(),
            matched,
        };
        let mut inner = mount.clone();

        if let Some(info) = &entry.mount {
            inner = mount.with(&info.param());
            if info.overlay {
                position.mount = inner.clone();
            } else {
                next = Level::Mounted(info.target);
            }
        }
        self.find_by_segment(ctx, next, &inner, segments, position, depth + 1)
    }

    /// Compare `segment` with the pages of `level`.
    fn match_level(
        &self,
        ctx: &ResolutionContext,
        level: Level,
        segment: &str,
    ) -> Result<LevelMatch, ResolveError> {
        let language = self.language(ctx);
        let menu = match level {
            Level::Children(parent) => self.tree.menu(parent),
            Level::Mounted(target) => self
                .tree
                .node(target)
                .map(|node| MenuEntry { node, mount: None })
                .into_iter()
                .collect(),
        };
        let wanted = self.encoder.encode_request_segment(segment);
        let mut hits = LevelMatch {
            excluded: menu
                .iter()
                .filter(|entry| is_transparent(ctx, &entry.node))
                .cloned()
                .collect(),
            ..LevelMatch::default()
        };
        if wanted.is_empty() {
            return Ok(hits);
        }

        // Pages that would build exactly this segment
        let mut built: Vec<usize> = Vec::new();
        for (i, entry) in menu.iter().enumerate() {
            let segment = self
                .tree
                .first_title_in(&entry.node, language, &self.config.encode.title_fields)
                .map(|title| self.encoder.encode(&title));
            if segment.as_deref() == Some(wanted.as_str())
                && !built.iter().any(|&j| menu[j].node.id == entry.node.id)
            {
                built.push(i);
            }
        }

        let candidates: Vec<PageId> = built
            .iter()
            .map(|&i| &menu[i].node)
            .filter(|node| !is_transparent(ctx, node))
            .map(|node| node.id)
            .collect();
        if candidates.len() > 1 {
            crate::debug!("resolve"; "`{}` at {:?} matches pages {:?}", wanted, level, candidates);
            return Err(ResolveError::AmbiguousSegment {
                segment: wanted,
                candidates,
            });
        }

        let hit = built
            .iter()
            .copied()
            .find(|&i| !is_transparent(ctx, &menu[i].node))
            .or_else(|| built.first().copied())
            .or_else(|| self.any_field_match(language, &menu, &wanted));

        if let Some(i) = hit {
            let entry = menu[i].clone();
            if is_transparent(ctx, &entry.node) {
                hits.possible = Some(entry);
            } else {
                hits.found = Some(entry);
            }
        }
        Ok(hits)
    }

    /// Match against every title field, not only the one paths are built
    /// from. Higher priority fields win; within a field the first page in
    /// menu order wins.
    fn any_field_match(
        &self,
        language: LanguageId,
        menu: &[MenuEntry],
        wanted: &str,
    ) -> Option<usize> {
        let fields = &self.config.encode.title_fields;
        let mut by_field: Vec<FxHashMap<String, usize>> = vec![FxHashMap::default(); fields.len()];

        for (i, entry) in menu.iter().enumerate() {
            for (f, field) in fields.iter().enumerate() {
                if let Some(title) = entry.node.title(*field) {
                    by_field[f].entry(self.encoder.encode(title)).or_insert(i);
                }
            }
        }
        if !language.is_default() {
            for (i, entry) in menu.iter().enumerate() {
                for (f, field) in fields.iter().enumerate() {
                    if let Some(title) = self.tree.localized_title(entry.node.id, language, *field) {
                        by_field[f].entry(self.encoder.encode(&title)).or_insert(i);
                    }
                }
            }
        }

        by_field.iter().find_map(|titles| titles.get(wanted).copied())
    }
}

/// Pages left out of built paths, which the walk steps through.
fn is_transparent(ctx: &ResolutionContext, node: &PageNode) -> bool {
    node.exclude_from_path || ctx.is_excluded(node.id)
}
