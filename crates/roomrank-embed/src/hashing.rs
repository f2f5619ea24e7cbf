use std::hash::{Hash, Hasher};

use anyhow::Result;
use twox_hash::XxHash64;

use roomrank_core::traits::Embedder;

/// Deterministic bag-of-tokens embedder for tests and offline runs.
///
/// Each whitespace token is hashed into one of `dim` buckets; the vector is
/// L2-normalized. Texts sharing tokens get positive cosine similarity.
pub struct HashingEmbedder { dim: usize, name: String }

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1), name: format!("hashing-d{}", dim.max(1)) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str { &self.name }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}
