use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{Device, Tensor, DType};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use roomrank_core::traits::Embedder;

mod device;
mod hashing;
mod pool;
mod tokenize;

pub use device::select_device;
pub use hashing::HashingEmbedder;
pub use pool::masked_mean_l2;
pub use tokenize::{configure_truncation, tokenize_batch};

/// Directory name of the default sentence encoder.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
const MAX_LEN: usize = 256;

/// BERT sentence encoder: masked-mean pooled, L2-normalized embeddings.
pub struct EmbeddingModel { model: BertModel, tokenizer: Tokenizer, device: Device, name: String, dim: usize, pad_id: u32 }

impl EmbeddingModel {
    pub fn new() -> Result<Self> { Self::from_dir(&resolve_model_dir(None)?) }

    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let device = select_device();
        info!(dir = %model_dir.display(), "loading sentence encoder");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        configure_truncation(&mut tokenizer, MAX_LEN)?;
        let config_path = model_dir.join("config.json");
        let config_text = std::fs::read_to_string(&config_path)?;
        let config: BertConfig = serde_json::from_str(&config_text)?;
        let raw: serde_json::Value = serde_json::from_str(&config_text)?;
        let dim = raw.get("hidden_size").and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;
        let pad_id = raw.get("pad_token_id").and_then(serde_json::Value::as_u64).unwrap_or(0) as u32;
        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb, &config)?;
        let name = model_dir.file_name().map_or_else(|| DEFAULT_MODEL.to_string(), |n| n.to_string_lossy().to_string());
        info!(model = %name, dim, "sentence encoder loaded");
        Ok(Self { model, tokenizer, device, name, dim, pad_id })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_texts(&[text.to_string()])?.pop().ok_or_else(|| anyhow!("empty embedding batch"))
    }

    /// One forward pass for the whole batch.
    pub fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden_states = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden_states, &attention_mask)?;
        let embs = pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?;
        if let Some(bad) = embs.iter().find(|e| e.len() != self.dim) {
            return Err(anyhow!("embedding dim {} != configured {}", bad.len(), self.dim));
        }
        let elapsed = start.elapsed();
        debug!(batch = texts.len(), ms = elapsed.as_millis() as u64, "embedded batch");
        if elapsed.as_millis() > 100 * texts.len() as u128 { warn!(ms = elapsed.as_millis() as u64, batch = texts.len(), "slow embedding"); }
        Ok(embs)
    }
}

impl Embedder for EmbeddingModel {
    fn name(&self) -> &str { &self.name }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { MAX_LEN }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { self.embed_texts(texts) }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    let weights = candle_core::pickle::read_all(&pickle)
        .map_err(|e| anyhow!("Failed to read weights from {}: {}", pickle.display(), e))?;
    Ok(weights.into_iter().collect())
}

/// Hashing embedder when `APP_USE_FAKE_EMBEDDINGS` is set, otherwise the local model.
pub fn get_default_embedder() -> Result<Box<dyn Embedder>> { get_embedder(None) }

pub fn get_embedder(model_dir: Option<&str>) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake { info!("using HashingEmbedder"); return Ok(Box::new(HashingEmbedder::new(384))); }
    Ok(Box::new(EmbeddingModel::from_dir(&resolve_model_dir(model_dir)?)?))
}

fn resolve_model_dir(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = explicit { let p = PathBuf::from(dir); if p.exists() { return Ok(p); } return Err(anyhow!("Model directory {} does not exist", p.display())); }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { debug!(dir = %p.display(), "using APP_MODEL_DIR"); return Ok(p); } }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = PathBuf::from(&dir); if p.exists() { debug!(dir = %p.display(), "using MODEL_DIR"); return Ok(p); } }
    let root = Path::new("../models").join(DEFAULT_MODEL); if root.exists() { return Ok(root); }
    let local = Path::new("models").join(DEFAULT_MODEL); if local.exists() { return Ok(local); }
    Err(anyhow!("Could not locate {} model directory (set APP_MODEL_DIR)", DEFAULT_MODEL))
}
