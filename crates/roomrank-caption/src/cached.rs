use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use roomrank_core::cache::{CacheStats, MemoryCache};
use roomrank_core::traits::Captioner;
use roomrank_core::types::CaptionOutcome;

/// Memoizes successful captions per image path.
///
/// Failures are returned as [`CaptionOutcome::Failed`] and never stored, so
/// the next call for the same image asks the collaborator again.
pub struct CachedCaptioner<C> {
    inner: C,
    cache: MemoryCache<PathBuf, CaptionOutcome>,
}

impl<C: Captioner> CachedCaptioner<C> {
    pub fn new(inner: C, cache: MemoryCache<PathBuf, CaptionOutcome>) -> Self {
        Self { inner, cache }
    }

    pub fn describe(&mut self, image: &Path) -> CaptionOutcome {
        let key = image.to_path_buf();
        if let Some(hit) = self.cache.get(&key) {
            debug!(image = %image.display(), "caption served from cache");
            return hit;
        }
        match self.inner.caption(image) {
            Ok(text) => {
                let outcome = CaptionOutcome::Described(text);
                self.cache.set(key, outcome.clone());
                outcome
            }
            Err(e) => {
                warn!(image = %image.display(), error = %format!("{e:#}"), "captioning failed");
                CaptionOutcome::Failed(format!("{e:#}"))
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}
