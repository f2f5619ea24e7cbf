//! roomrank-hybrid
//!
//! Hybrid ranking over one loaded catalog: semantic similarity fused with
//! an additive keyword boost, plus the ad hoc top-k semantic and keyword-OR
//! searches. Results are memoized per catalog version in a cache owned by
//! the engine.
pub mod fusion;
pub mod queries;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use roomrank_core::cache::{CacheStats, MemoryCache};
use roomrank_core::catalog_io::read_records;
use roomrank_core::error::{Error, Result};
use roomrank_core::types::{CatalogRecord, CatalogVersion, KeywordGroups, KeywordHit, RankedResult};
use roomrank_text::keywords::canonical_keywords;
use roomrank_text::{filter, keyword_or_search, normalize};
use roomrank_vector::{semantic_scores, top_k, Catalog, EmbedProvider};

pub use fusion::{fuse, FusionParams};
pub use queries::NamedQuery;

/// Cache identity of one search. Every variant carries the catalog version,
/// so results from a previous load are never served after a reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchKey {
    Ranking { catalog: CatalogVersion, query: String, keyword_groups: KeywordGroups, boost_bits: u32, threshold_bits: u32 },
    Semantic { catalog: CatalogVersion, query: String, k: usize },
    Keywords { catalog: CatalogVersion, keywords: Vec<String>, k: usize },
}

#[derive(Debug, Clone)]
pub enum CachedHits {
    Ranked(Arc<Vec<RankedResult>>),
    Keywords(Arc<Vec<KeywordHit>>),
}

pub type ResultCache = MemoryCache<SearchKey, CachedHits>;

pub struct HybridSearchEngine {
    provider: Box<dyn EmbedProvider>,
    cache: ResultCache,
    params: FusionParams,
    catalog: Option<Catalog>,
}

impl HybridSearchEngine {
    pub fn new(provider: Box<dyn EmbedProvider>, cache: ResultCache) -> Self {
        Self { provider, cache, params: FusionParams::default(), catalog: None }
    }

    pub fn with_params(mut self, params: FusionParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> FusionParams {
        self.params
    }

    pub fn provider(&self) -> &dyn EmbedProvider {
        self.provider.as_ref()
    }

    /// Read the catalog CSV, embed it and make it the active catalog.
    pub fn load(&mut self, csv_path: &Path) -> Result<&Catalog> {
        let records = read_records(csv_path)?;
        self.load_records(&records)
    }

    pub fn load_records(&mut self, records: &[CatalogRecord]) -> Result<&Catalog> {
        let catalog = Catalog::build(records, self.provider.as_ref())?;
        self.set_catalog(catalog)
    }

    /// Replace the active catalog. The catalog must come from this engine's
    /// embedding model.
    pub fn set_catalog(&mut self, catalog: Catalog) -> Result<&Catalog> {
        if catalog.embedder_id() != self.provider.embedder_id() {
            return Err(Error::EmbedderMismatch {
                catalog: catalog.embedder_id().to_string(),
                provider: self.provider.embedder_id().to_string(),
            });
        }
        info!(items = catalog.len(), version = %catalog.version(), "catalog loaded");
        Ok(self.catalog.insert(catalog))
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Rank one of the canned queries, looked up by label, short id or slug.
    pub fn rank_named(&mut self, name: &str) -> Result<Arc<Vec<RankedResult>>> {
        let query: NamedQuery = name.parse()?;
        self.rank_query(query)
    }

    pub fn rank_query(&mut self, query: NamedQuery) -> Result<Arc<Vec<RankedResult>>> {
        let groups = query.keyword_groups();
        self.rank(query.semantic_query(), &groups)
    }

    pub fn rank(&mut self, semantic_query: &str, keyword_groups: &KeywordGroups) -> Result<Arc<Vec<RankedResult>>> {
        let params = self.params;
        self.rank_with(semantic_query, keyword_groups, params)
    }

    /// Fused ranking: items passing the threshold, best first, no size cap.
    pub fn rank_with(
        &mut self,
        semantic_query: &str,
        keyword_groups: &KeywordGroups,
        params: FusionParams,
    ) -> Result<Arc<Vec<RankedResult>>> {
        let catalog = self.catalog.as_ref().ok_or(Error::CatalogNotLoaded)?;
        let query = normalize(semantic_query);
        let key = SearchKey::Ranking {
            catalog: catalog.version().clone(),
            query: query.clone(),
            keyword_groups: keyword_groups.clone(),
            boost_bits: params.boost.to_bits(),
            threshold_bits: params.threshold.to_bits(),
        };
        if let Some(CachedHits::Ranked(hit)) = self.cache.get(&key) {
            debug!(query = %semantic_query, "ranking served from cache");
            return Ok(hit);
        }
        let query_vec = self.provider.embed_one(&query).map_err(Error::Provider)?;
        let scores = semantic_scores(catalog, &query_vec, self.provider.as_ref());
        let keyword_set = filter(catalog.items(), keyword_groups);
        let ranked = Arc::new(fuse(catalog.items(), &scores, &keyword_set, params));
        info!(query = %semantic_query, keyword_matches = keyword_set.len(), results = ranked.len(), "ranked");
        self.cache.set(key, CachedHits::Ranked(Arc::clone(&ranked)));
        Ok(ranked)
    }

    /// Plain top-k by cosine similarity; no boost, no threshold.
    pub fn search(&mut self, query: &str, k: usize) -> Result<Arc<Vec<RankedResult>>> {
        let catalog = self.catalog.as_ref().ok_or(Error::CatalogNotLoaded)?;
        let normalized = normalize(query);
        let key = SearchKey::Semantic { catalog: catalog.version().clone(), query: normalized.clone(), k };
        if let Some(CachedHits::Ranked(hit)) = self.cache.get(&key) {
            debug!(query = %query, k, "semantic search served from cache");
            return Ok(hit);
        }
        let results = if k == 0 || catalog.is_empty() {
            Vec::new()
        } else {
            let query_vec = self.provider.embed_one(&normalized).map_err(Error::Provider)?;
            let scores = semantic_scores(catalog, &query_vec, self.provider.as_ref());
            top_k(catalog, &scores, k)
        };
        let results = Arc::new(results);
        debug!(query = %query, k, results = results.len(), "semantic search");
        self.cache.set(key, CachedHits::Ranked(Arc::clone(&results)));
        Ok(results)
    }

    /// OR search over raw keywords, ordered by how many distinct keywords matched.
    pub fn search_by_keywords<S: AsRef<str>>(&mut self, keywords: &[S], k: usize) -> Result<Arc<Vec<KeywordHit>>> {
        let catalog = self.catalog.as_ref().ok_or(Error::CatalogNotLoaded)?;
        let key = SearchKey::Keywords { catalog: catalog.version().clone(), keywords: canonical_keywords(keywords), k };
        if let Some(CachedHits::Keywords(hit)) = self.cache.get(&key) {
            debug!(k, "keyword search served from cache");
            return Ok(hit);
        }
        let hits = Arc::new(keyword_or_search(catalog.items(), keywords, k));
        debug!(k, results = hits.len(), "keyword search");
        self.cache.set(key, CachedHits::Keywords(Arc::clone(&hits)));
        Ok(hits)
    }
}
