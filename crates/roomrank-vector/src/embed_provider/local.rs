//! Local embedding provider using the crate `roomrank-embed`.
//!
//! Respects `APP_USE_FAKE_EMBEDDINGS=1` to switch to the HashingEmbedder for
//! fast and deterministic outputs in tests and development.
use anyhow::Result;
use roomrank_core::traits::Embedder as CoreEmbedder;
use roomrank_embed::get_embedder;

use super::EmbedProvider;

pub struct LocalProvider {
    inner: Box<dyn CoreEmbedder>,
    id: String,
}

impl LocalProvider {
    /// Create a new local provider, loading the default embedder.
    pub fn new() -> Result<Self> {
        Self::with_model_dir(None)
    }

    pub fn with_model_dir(model_dir: Option<&str>) -> Result<Self> {
        Ok(Self::from_embedder(get_embedder(model_dir)?))
    }

    pub fn from_embedder(inner: Box<dyn CoreEmbedder>) -> Self {
        let id = format!("local:{}:d{}", inner.name(), inner.dim());
        Self { inner, id }
    }
}

impl EmbedProvider for LocalProvider {
    fn embedder_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.inner.dim() }
    fn max_len(&self) -> usize { self.inner.max_len() }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { self.inner.embed_batch(texts) }
}
