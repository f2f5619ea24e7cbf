//! Embedding provider abstraction consumed by catalog loading and search.
//!
//! Implementations may call a local model (see `local.rs`) or a remote API.
//! Providers must return vectors of one dimensionality per `embedder_id`;
//! catalogs remember the id so queries are never scored across models.
use anyhow::{anyhow, Result};

use crate::similarity::cos_sim_batch;

pub trait EmbedProvider: Send + Sync {
    /// Stable identifier for the provider/model (e.g., `local:all-MiniLM-L6-v2:d384`).
    fn embedder_id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Maximum token length for this provider.
    fn max_len(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow!("provider '{}' returned no embedding", self.embedder_id()))
    }

    /// Cosine similarity of `query` against every vector of `batch`, in [-1, 1].
    fn similarity(&self, query: &[f32], batch: &[&[f32]]) -> Vec<f32> {
        cos_sim_batch(query, batch)
    }
}

pub mod local;
