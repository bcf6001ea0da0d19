//! `PathService`: the entry point an embedding server talks to.
//!
//! | Module     | Purpose                                  |
//! |------------|------------------------------------------|
//! | `requests` | Request-level encode and decode caches   |
//!
//! The service owns the config handle, the store and the clock, and builds a
//! short-lived [`PathBuilder`] or [`PathResolver`] per call from the config
//! snapshot current at that moment.

mod requests;

pub use requests::{DecodeKey, EncodeKey, RequestCaches};

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::builder::{PageRef, PathBuilder, ResolutionContext};
use crate::config::{ConfigError, ConfigHandle, PathConfig};
use crate::core::{
    CacheId, Clock, LanguageId, MountContext, PageId, PagePath, RootId, SystemClock,
    split_request_path,
};
use crate::encode::SegmentEncoder;
use crate::error::{EncodeError, ResolveError, StoreError};
use crate::reconcile::{ChangeKind, Invalidation, invalidate};
use crate::resolver::{PathResolver, Resolution};
use crate::store::{MemoryStore, PathCacheStore};
use crate::tree::PageTree;

/// Bidirectional page path service over a hierarchy and a path cache.
pub struct PathService<T: PageTree, S: PathCacheStore> {
    tree: Arc<T>,
    store: Arc<S>,
    config: ConfigHandle,
    clock: Arc<dyn Clock>,
    requests: RequestCaches,
}

impl<T: PageTree> PathService<T, MemoryStore> {
    /// Load `config_path` and open the memory store it points at.
    ///
    /// Without `cache.directory` the store lives in memory only.
    pub fn open(config_path: &Path, tree: Arc<T>) -> anyhow::Result<Self> {
        let config = PathConfig::load(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;
        let store = match config.cache.directory.as_deref() {
            Some(dir) => MemoryStore::open(dir)
                .with_context(|| format!("failed to open path cache in {}", dir.display()))?,
            None => MemoryStore::new(),
        };
        crate::log!(
            "service";
            "root page {}, {} cached row(s)",
            config.tree.root_page, store.len()
        );
        Ok(Self::new(tree, Arc::new(store), config, Arc::new(SystemClock)))
    }
}

impl<T: PageTree, S: PathCacheStore> PathService<T, S> {
    pub fn new(tree: Arc<T>, store: Arc<S>, config: PathConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            tree,
            store,
            config: ConfigHandle::new(config),
            clock,
            requests: RequestCaches::new(),
        }
    }

    #[inline]
    pub fn tree(&self) -> &T {
        &self.tree
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current configuration snapshot.
    #[inline]
    pub fn config(&self) -> Arc<PathConfig> {
        self.config.load()
    }

    /// Fresh request context under the configured root.
    pub fn context(&self, language: LanguageId) -> ResolutionContext {
        let root = RootId::from(self.config().tree.root_page);
        ResolutionContext::new(language, root)
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Speaking path of `page` in `language`, seen through `mount`.
    pub fn build_path(
        &self,
        page: PageId,
        language: LanguageId,
        mount: &MountContext,
    ) -> Result<PagePath, EncodeError> {
        let mut ctx = self.context(language).with_mount(mount.clone());
        self.build_path_with(&mut ctx, page)
    }

    /// Speaking path of a page named by id or alias, within an existing
    /// request context.
    pub fn build_path_with(
        &self,
        ctx: &mut ResolutionContext,
        page: impl Into<PageRef>,
    ) -> Result<PagePath, EncodeError> {
        let page = page.into();
        // Extra exclusions change the result, so only plain requests are shared
        let key = match &page {
            PageRef::Id(id) if ctx.excluded.is_empty() => {
                Some((*id, ctx.language, ctx.mount.clone(), ctx.root))
            }
            _ => None,
        };
        if let Some(path) = key.as_ref().and_then(|key| self.requests.encoded(key)) {
            return Ok(path);
        }

        let config = self.config();
        let builder = PathBuilder::new(&*self.tree, &*self.store, &config, &*self.clock);
        let (path, outcome) = builder.build_with_outcome(ctx, page)?;

        if outcome.wrote() {
            // Requests that resolved elsewhere before the row claimed its path
            self.requests.forget_paths_under(&path);
        }
        if let Some(key) = key {
            if outcome.wrote() {
                // An older path of this page may sit in the decode cache
                self.requests.forget_pages(&[key.0]);
            }
            self.requests.remember_encoded(key, path.clone());
        }
        Ok(path)
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    /// Resolve a raw request path such as `/products/shoes/?page=2`.
    pub fn resolve_path(
        &self,
        request: &str,
        language: LanguageId,
    ) -> Result<Resolution, ResolveError> {
        let ctx = self.context(language);
        self.resolve_segments(&ctx, &[], &split_request_path(request))
    }

    /// Resolve already split `segments`; `leading` segments are kept in
    /// front of redirect targets.
    pub fn resolve_segments(
        &self,
        ctx: &ResolutionContext,
        leading: &[String],
        segments: &[String],
    ) -> Result<Resolution, ResolveError> {
        let config = self.config();
        let key = ctx.excluded.is_empty().then(|| {
            let encoder = SegmentEncoder::new(&config.encode);
            let normalized: Vec<String> = segments
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| encoder.normalize(s))
                .collect();
            (ctx.root, ctx.language, normalized.join("/"))
        });
        if let Some(resolution) = key.as_ref().and_then(|key| self.requests.decoded(key)) {
            return Ok(resolution);
        }

        let resolver = PathResolver::new(&*self.tree, &*self.store, &config);
        let resolution = resolver.resolve_after(ctx, leading, segments)?;
        if let Some(key) = key {
            self.requests.remember_decoded(key, &resolution);
        }
        Ok(resolution)
    }

    // ========================================================================
    // Mutations and administration
    // ========================================================================

    /// Hook for the hierarchy collaborator: `page` changed by `kind`.
    pub fn on_resource_changed(
        &self,
        page: PageId,
        kind: ChangeKind,
    ) -> Result<Invalidation, StoreError> {
        let config = self.config();
        let result = invalidate(&*self.tree, &*self.store, &config, &*self.clock, page, kind)?;
        self.requests.forget_pages(&result.pages);
        // A changed page can take over or shadow segments of other requests
        self.requests.clear_decoded();
        Ok(result)
    }

    /// Drop all request-level caches.
    pub fn flush_request_caches(&self) {
        let dropped = self.requests.len();
        self.requests.clear();
        crate::debug!("service"; "flushed {} request cache entries", dropped);
    }

    /// Overwrite the path of a cache row.
    pub fn update_entry(&self, id: CacheId, path: &str) -> Result<bool, StoreError> {
        let Some(row) = self.store.get(id)? else {
            return Ok(false);
        };
        let updated = self.store.update_path(id, PagePath::new(path))?;
        self.store.commit()?;
        // Other pages may have used the row as a cached prefix
        self.flush_request_caches();
        crate::log!("cache"; "row {} of page {} now reads `{}`", id, row.key.page, path);
        Ok(updated)
    }

    /// Delete a cache row.
    pub fn delete_entry(&self, id: CacheId) -> Result<bool, StoreError> {
        let Some(row) = self.store.get(id)? else {
            return Ok(false);
        };
        let deleted = self.store.delete(id)?;
        self.store.commit()?;
        self.requests.forget_pages(&[row.key.page]);
        Ok(deleted)
    }

    /// Run the throttled sweep now; `None` when the last run is too recent.
    pub fn sweep(&self) -> Result<Option<usize>, StoreError> {
        let config = self.config();
        let swept = self.store.sweep_expired(
            self.clock.now(),
            config.cache.sweep_min_age(),
            config.cache.sweep_interval(),
        )?;
        self.store.commit()?;
        Ok(swept)
    }

    /// Re-read the config file if it changed; request caches are dropped
    /// when it did.
    pub fn reload_config(&self) -> Result<bool, ConfigError> {
        let reloaded = self.config.reload()?;
        if reloaded {
            self.flush_request_caches();
        }
        Ok(reloaded)
    }

    /// Validate `config` and replace the current one with it.
    pub fn replace_config(&self, config: PathConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config.store(config);
        self.flush_request_caches();
        Ok(())
    }

    /// Number of request cache entries currently held.
    pub fn request_cache_len(&self) -> usize {
        self.requests.len()
    }
}
