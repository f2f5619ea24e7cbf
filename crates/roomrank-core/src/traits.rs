use std::path::Path;

/// Text → vector model. Vectors for one model share a dimension.
pub trait Embedder: Send + Sync {
    /// Model name; two embedders with the same name produce the same vectors.
    fn name(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Produces a structured free-text description for an image.
pub trait Captioner {
    fn caption(&self, image: &Path) -> anyhow::Result<String>;
}
