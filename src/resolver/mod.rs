//! Path Resolver: speaking path to page.
//!
//! | Module       | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `lookup`     | Longest cached prefix, redirects for moved paths |
//! | `resolution` | [`Resolution`] outcome                           |
//! | `walk`       | Override paths and segment-by-segment tree walk  |
//!
//! The cache is consulted first. Only when no cached prefix fits does the
//! resolver walk the hierarchy, which never writes the cache.

mod lookup;
mod resolution;
mod walk;

pub use resolution::Resolution;

use crate::builder::ResolutionContext;
use crate::config::PathConfig;
use crate::core::LanguageId;
use crate::encode::SegmentEncoder;
use crate::error::ResolveError;
use crate::store::PathCacheStore;
use crate::tree::PageTree;

/// Resolves request paths for one request against a fixed config snapshot.
pub struct PathResolver<'a, T: PageTree + ?Sized, S: PathCacheStore> {
    tree: &'a T,
    store: &'a S,
    config: &'a PathConfig,
    encoder: SegmentEncoder,
}

impl<'a, T: PageTree + ?Sized, S: PathCacheStore> PathResolver<'a, T, S> {
    pub fn new(tree: &'a T, store: &'a S, config: &'a PathConfig) -> Self {
        Self {
            tree,
            store,
            config,
            encoder: SegmentEncoder::new(&config.encode),
        }
    }

    /// Map request `segments` (still percent-encoded) to a page.
    ///
    /// An empty request resolves to the root page.
    pub fn resolve(
        &self,
        ctx: &ResolutionContext,
        segments: &[String],
    ) -> Result<Resolution, ResolveError> {
        self.resolve_after(ctx, &[], segments)
    }

    /// Like [`resolve`](Self::resolve), for requests whose `leading`
    /// segments (language or other pre-variables) were already decoded.
    /// They are kept in front of redirect targets.
    pub fn resolve_after(
        &self,
        ctx: &ResolutionContext,
        leading: &[String],
        segments: &[String],
    ) -> Result<Resolution, ResolveError> {
        let raw: Vec<&str> = segments
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();

        if !self.config.cache.disabled {
            let normalized: Vec<String> = raw.iter().map(|s| self.encoder.normalize(s)).collect();
            if let Some(hit) = self.cache_lookup(ctx.root, &normalized)? {
                return Ok(self.resolve_hit(hit, leading, &raw)?);
            }
        }
        self.resolve_in_tree(ctx, &raw)
    }

    /// Language paths were built in, after language exceptions.
    fn language(&self, ctx: &ResolutionContext) -> LanguageId {
        self.config.tree.effective_language(ctx.language)
    }
}
