//! Path Builder: page reference to speaking path.

use crate::config::PathConfig;
use crate::core::{Clock, LanguageId, MountContext, PageId, PagePath, RootId};
use crate::encode::SegmentEncoder;
use crate::error::EncodeError;
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::store::{CacheKey, PathCacheStore};
use crate::tree::{PageNode, PageTree, TitleField};

use super::rootline::RootlineWalk;
use super::shortcut::resolve_shortcuts;
use super::{PathRecord, ResolutionContext};

/// How the page to link is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    Id(PageId),
    Alias(String),
}

impl From<PageId> for PageRef {
    fn from(id: PageId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for PageRef {
    fn from(alias: &str) -> Self {
        Self::Alias(alias.to_owned())
    }
}

/// Builds paths for one request against a fixed config snapshot.
pub struct PathBuilder<'a, T: PageTree + ?Sized, S: PathCacheStore> {
    tree: &'a T,
    store: &'a S,
    config: &'a PathConfig,
    clock: &'a dyn Clock,
    encoder: SegmentEncoder,
}

impl<'a, T: PageTree + ?Sized, S: PathCacheStore> PathBuilder<'a, T, S> {
    pub fn new(tree: &'a T, store: &'a S, config: &'a PathConfig, clock: &'a dyn Clock) -> Self {
        Self {
            tree,
            store,
            config,
            clock,
            encoder: SegmentEncoder::new(&config.encode),
        }
    }

    /// Build the speaking path of `page` and record it in the cache.
    pub fn build(
        &self,
        ctx: &mut ResolutionContext,
        page: impl Into<PageRef>,
    ) -> Result<PagePath, EncodeError> {
        self.build_with_outcome(ctx, page).map(|(path, _)| path)
    }

    /// Like [`build`](Self::build), also reporting what happened to the
    /// cache. A path served from a live row reports `Unchanged`.
    pub fn build_with_outcome(
        &self,
        ctx: &mut ResolutionContext,
        page: impl Into<PageRef>,
    ) -> Result<(PagePath, ReconcileOutcome), EncodeError> {
        let (page, mount) = self.target(ctx, page.into())?;
        if self.config.tree.is_excluded(page) || ctx.is_excluded(page) {
            return Err(EncodeError::Excluded(page));
        }

        let language = self.config.tree.effective_language(ctx.language);
        let cache_enabled = !self.config.cache.disabled;
        if cache_enabled {
            let key = CacheKey::new(page, language, ctx.root, mount.clone());
            if let Some(row) = self.store.find_live(&key)? {
                return Ok((row.path, ReconcileOutcome::Unchanged));
            }
        }

        let record = self.path_record(ctx, page, &mount, language)?;
        let key = CacheKey::new(page, record.language, record.root, mount);
        let previous = if cache_enabled && record.root != ctx.root {
            self.store.find_live(&key)?.map(|row| row.path)
        } else {
            None
        };

        let outcome = Reconciler::new(self.store, &self.config.cache, self.clock).reconcile(
            &key,
            &record.path,
            previous.as_ref(),
            ctx.privileged,
        )?;
        Ok((record.path, outcome))
    }

    /// Resolve aliases and shortcuts to the page that gets the path.
    fn target(
        &self,
        ctx: &ResolutionContext,
        page: PageRef,
    ) -> Result<(PageId, MountContext), EncodeError> {
        let id = match page {
            PageRef::Id(id) => id,
            PageRef::Alias(alias) => self
                .tree
                .find_by_alias(&alias)
                .ok_or(EncodeError::UnknownAlias(alias))?,
        };

        let settings = &self.config.tree;
        if !settings.resolve_shortcuts {
            self.tree.node(id).ok_or(EncodeError::NotFound(id))?;
            return Ok((id, ctx.mount.clone()));
        }
        resolve_shortcuts(self.tree, id, &ctx.mount, settings.max_shortcut_hops)
            .map(|target| (target.page, target.mount))
            .ok_or(EncodeError::NotFound(id))
    }

    /// Compute the path of `page` from the hierarchy, memoized per request.
    pub fn path_record(
        &self,
        ctx: &mut ResolutionContext,
        page: PageId,
        mount: &MountContext,
        language: LanguageId,
    ) -> Result<PathRecord, EncodeError> {
        if let Some(record) = ctx.remembered(page, mount, language) {
            return Ok(record.clone());
        }

        let node = self.tree.node(page).ok_or(EncodeError::NotFound(page))?;
        let record = match self.override_record(&node, language, ctx.root) {
            Some(record) => record,
            None => self.rootline_record(ctx, page, mount, language)?,
        };
        ctx.remember(page, mount, language, record.clone());
        Ok(record)
    }

    fn override_record(
        &self,
        node: &PageNode,
        language: LanguageId,
        root: RootId,
    ) -> Option<PathRecord> {
        if !node.path_override {
            return None;
        }
        let segment = self
            .tree
            .title_in(node, language, TitleField::PathSegment)
            .unwrap_or_default();
        let path = PagePath::new(&segment);
        if path.is_empty() {
            crate::log!(
                "warning";
                "path override is set for page {} (language {}) but no segment is defined",
                node.id, language
            );
            return None;
        }
        Some(PathRecord {
            path,
            language,
            root,
        })
    }

    fn rootline_record(
        &self,
        ctx: &ResolutionContext,
        page: PageId,
        mount: &MountContext,
        language: LanguageId,
    ) -> Result<PathRecord, EncodeError> {
        let chain = self.tree.ancestor_chain(page, mount);
        let configured_root = PageId::from(ctx.root);

        // Inner site roots win over the configured root
        let (start, inner_site) = match chain.iter().rposition(|entry| entry.node.is_site_root) {
            Some(start) => (start, true),
            None => chain
                .iter()
                .position(|entry| entry.node.id == configured_root)
                .map(|start| (start, false))
                .ok_or(EncodeError::NotFound(page))?,
        };
        let rootline = &chain[start..];

        let walk = RootlineWalk {
            tree: self.tree,
            store: (!self.config.cache.disabled).then_some(self.store),
            encoder: &self.encoder,
            fields: &self.config.encode.title_fields,
            excluded: &ctx.excluded,
            language,
            root: ctx.root,
        };
        let path = walk.walk(rootline)?;

        let root = if inner_site {
            rootline
                .iter()
                .rev()
                .find(|entry| entry.node.domain.is_some())
                .map_or(ctx.root, |entry| RootId::from(entry.node.id))
        } else {
            ctx.root
        };
        Ok(PathRecord {
            path,
            language,
            root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DAY, ManualClock};
    use crate::store::MemoryStore;
    use crate::tree::{DocType, MemoryTree, MountPoint, Shortcut};

    struct Fixture {
        tree: MemoryTree,
        store: MemoryStore,
        config: PathConfig,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            let tree = MemoryTree::from_pages([
                PageNode::new(1, None, "Home"),
                PageNode::new(10, Some(PageId(1)), "Products"),
                PageNode::new(11, Some(PageId(10)), "Shoes").with_title(TitleField::Alias, "shoes"),
                PageNode::new(12, Some(PageId(10)), "Boots")
                    .with_title(TitleField::NavTitle, "Winter Boots"),
                PageNode::new(20, Some(PageId(1)), "Books").excluded(),
                PageNode::new(21, Some(PageId(20)), "TYPO3"),
                PageNode::new(30, Some(PageId(1)), "Go")
                    .with_doc_type(DocType::Shortcut(Shortcut::Page(PageId(11)))),
                PageNode::new(40, Some(PageId(1)), "Deals").with_override("/sale/now/"),
                PageNode::new(50, Some(PageId(1)), "Shop").site_root(),
                PageNode::new(51, Some(PageId(50)), "Cart").with_domain("shop.example.org"),
                PageNode::new(52, Some(PageId(51)), "Checkout"),
                PageNode::new(60, Some(PageId(1)), "Shared").with_doc_type(DocType::Mount(
                    MountPoint {
                        target: PageId(70),
                        overlay: false,
                    },
                )),
                PageNode::new(70, Some(PageId(2)), "Library"),
                PageNode::new(71, Some(PageId(70)), "Manuals"),
                PageNode::new(2, None, "Storage"),
            ]);
            Self {
                tree,
                store: MemoryStore::new(),
                config: PathConfig::default(),
                clock: ManualClock::new(100 * DAY),
            }
        }

        fn builder(&self) -> PathBuilder<'_, MemoryTree, MemoryStore> {
            PathBuilder::new(&self.tree, &self.store, &self.config, &self.clock)
        }

        fn ctx(&self) -> ResolutionContext {
            ResolutionContext::new(LanguageId::DEFAULT, RootId(1))
        }

        fn build(&self, page: impl Into<PageRef>) -> Result<PagePath, EncodeError> {
            self.builder().build(&mut self.ctx(), page)
        }
    }

    #[test]
    fn test_build_simple_page_and_cache_it() {
        let fx = Fixture::new();
        assert_eq!(fx.build(PageId(10)).unwrap(), "products");
        assert_eq!(fx.build(PageId(12)).unwrap(), "products/winter_boots");

        let key = CacheKey::new(PageId(10), LanguageId::DEFAULT, RootId(1), MountContext::empty());
        assert_eq!(fx.store.find_live(&key).unwrap().unwrap().path, "products");
    }

    #[test]
    fn test_build_returns_cached_path_without_walking() {
        let fx = Fixture::new();
        let key = CacheKey::new(PageId(10), LanguageId::DEFAULT, RootId(1), MountContext::empty());
        fx.store.insert(key, PagePath::new("catalog")).unwrap();
        assert_eq!(fx.build(PageId(10)).unwrap(), "catalog");
        assert_eq!(fx.build(PageId(11)).unwrap(), "catalog/shoes");
    }

    #[test]
    fn test_alias_and_shortcut() {
        let fx = Fixture::new();
        assert_eq!(fx.build("shoes").unwrap(), "products/shoes");
        assert_eq!(fx.build(PageId(30)).unwrap(), "products/shoes");
        assert!(matches!(fx.build("nope"), Err(EncodeError::UnknownAlias(_))));
    }

    #[test]
    fn test_shortcuts_can_be_disabled() {
        let mut fx = Fixture::new();
        fx.config.tree.resolve_shortcuts = false;
        assert_eq!(fx.build(PageId(30)).unwrap(), "go");
    }

    #[test]
    fn test_excluded_pages() {
        let mut fx = Fixture::new();
        fx.config.tree.excluded_pages = vec![PageId(12)];
        assert!(matches!(fx.build(PageId(12)), Err(EncodeError::Excluded(PageId(12)))));

        let mut ctx = fx.ctx().with_excluded([PageId(11)]);
        let err = fx.builder().build(&mut ctx, PageId(11)).unwrap_err();
        assert!(matches!(err, EncodeError::Excluded(PageId(11))));

        // Exclude-from-path pages still have a path of their own
        assert_eq!(fx.build(PageId(21)).unwrap(), "typo3");
    }

    #[test]
    fn test_not_found() {
        let fx = Fixture::new();
        assert!(matches!(fx.build(PageId(999)), Err(EncodeError::NotFound(_))));
        // Page outside the configured root
        assert!(matches!(fx.build(PageId(2)), Err(EncodeError::NotFound(_))));
    }

    #[test]
    fn test_override_is_used_verbatim() {
        let fx = Fixture::new();
        assert_eq!(fx.build(PageId(40)).unwrap(), "sale/now");
    }

    #[test]
    fn test_override_flag_without_segment_falls_back() {
        let fx = Fixture::new();
        fx.tree.update(PageId(10), |node| node.path_override = true);
        assert_eq!(fx.build(PageId(10)).unwrap(), "products");
    }

    #[test]
    fn test_inner_site_uses_domain_root() {
        let fx = Fixture::new();
        assert_eq!(fx.build(PageId(52)).unwrap(), "cart/checkout");

        let key = CacheKey::new(PageId(52), LanguageId::DEFAULT, RootId(51), MountContext::empty());
        assert!(fx.store.find_live(&key).unwrap().is_some());
        assert_eq!(fx.store.len(), 1);

        // Second build recomputes (lookup runs under the configured root) but
        // does not add rows
        assert_eq!(fx.build(PageId(52)).unwrap(), "cart/checkout");
        assert_eq!(fx.store.len(), 1);
    }

    #[test]
    fn test_mount_context_path() {
        let fx = Fixture::new();
        let mut ctx = fx.ctx().with_mount(MountContext::from("70-60"));
        let path = fx.builder().build(&mut ctx, PageId(71)).unwrap();
        assert_eq!(path, "shared/library/manuals");

        let key = CacheKey::new(PageId(71), LanguageId::DEFAULT, RootId(1), MountContext::from("70-60"));
        assert!(fx.store.find_live(&key).unwrap().is_some());
    }

    #[test]
    fn test_language_overlay_and_exceptions() {
        let mut fx = Fixture::new();
        fx.tree.set_overlay(PageId(10), LanguageId(1), TitleField::Title, "Produkte");
        let mut ctx = ResolutionContext::new(LanguageId(1), RootId(1));
        assert_eq!(fx.builder().build(&mut ctx, PageId(11)).unwrap(), "produkte/shoes");

        fx.config.tree.language_exceptions = vec![LanguageId(1)];
        let mut ctx = ResolutionContext::new(LanguageId(1), RootId(1));
        assert_eq!(fx.builder().build(&mut ctx, PageId(11)).unwrap(), "products/shoes");
        let key = CacheKey::new(PageId(11), LanguageId::DEFAULT, RootId(1), MountContext::empty());
        assert!(fx.store.find_live(&key).unwrap().is_some());
    }

    #[test]
    fn test_privileged_and_disabled_do_not_write() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx().privileged();
        assert_eq!(fx.builder().build(&mut ctx, PageId(10)).unwrap(), "products");
        assert!(fx.store.is_empty());

        fx.config.cache.disabled = true;
        assert_eq!(fx.build(PageId(11)).unwrap(), "products/shoes");
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_path_record_is_memoized_per_request() {
        let fx = Fixture::new();
        let mut ctx = fx.ctx();
        let builder = fx.builder();
        let first = builder
            .path_record(&mut ctx, PageId(10), &MountContext::empty(), LanguageId::DEFAULT)
            .unwrap();
        fx.tree.update(PageId(10), |node| {
            node.titles.insert(TitleField::Title, "Catalog".into());
        });
        let again = builder
            .path_record(&mut ctx, PageId(10), &MountContext::empty(), LanguageId::DEFAULT)
            .unwrap();
        assert_eq!(first, again);

        let fresh = builder
            .path_record(&mut fx.ctx(), PageId(10), &MountContext::empty(), LanguageId::DEFAULT)
            .unwrap();
        assert_eq!(fresh.path, "catalog");
    }

    #[test]
    fn test_build_reports_cache_outcome() {
        let fx = Fixture::new();
        let builder = fx.builder();
        let (path, outcome) = builder.build_with_outcome(&mut fx.ctx(), PageId(10)).unwrap();
        assert_eq!(path, "products");
        assert!(matches!(outcome, ReconcileOutcome::Inserted(_)));

        let (_, outcome) = builder.build_with_outcome(&mut fx.ctx(), PageId(10)).unwrap();
        assert_eq!(outcome, ReconcileOutcome::Unchanged);
    }
}
