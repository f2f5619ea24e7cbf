//! Embedded catalog: ordered items plus the model that embedded them.
//!
//! Built once per load and read-only afterwards. The `CatalogVersion` is a
//! blake3 digest over the embedder id and every item's identity, normalized
//! text and vector, so identical content under the same model always hashes
//! the same and any change produces a new version.

use std::collections::HashSet;

use anyhow::anyhow;
use tracing::{info, warn};

use roomrank_core::error::{Error, Result};
use roomrank_core::types::{CatalogRecord, CatalogVersion, Item};
use roomrank_text::normalize;

use crate::embed_provider::EmbedProvider;

#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    embedder_id: String,
    version: CatalogVersion,
}

impl Catalog {
    /// Normalize and embed every usable record, in file order.
    ///
    /// Records whose captioning failed are skipped. Provider failures fail
    /// the whole build.
    pub fn build(records: &[CatalogRecord], provider: &dyn EmbedProvider) -> Result<Self> {
        let usable: Vec<&CatalogRecord> = records
            .iter()
            .filter(|r| {
                if r.is_failed() {
                    warn!(url = %r.image_url, "skipping record without caption");
                }
                !r.is_failed()
            })
            .collect();
        let normalized: Vec<String> = usable.iter().map(|r| normalize(&r.caption)).collect();
        let embeddings = provider.embed_batch(&normalized).map_err(Error::Provider)?;
        if embeddings.len() != normalized.len() {
            return Err(Error::Provider(anyhow!(
                "embedder returned {} vectors for {} texts",
                embeddings.len(),
                normalized.len()
            )));
        }
        if let Some(bad) = embeddings.iter().find(|v| v.len() != provider.dim()) {
            return Err(Error::Provider(anyhow!("dim mismatch: got {} expected {}", bad.len(), provider.dim())));
        }
        if let Some(i) = embeddings.iter().position(|v| v.iter().any(|x| !x.is_finite())) {
            return Err(Error::Provider(anyhow!("non-finite embedding for '{}'", usable[i].image_url)));
        }
        let items = usable
            .into_iter()
            .zip(normalized)
            .zip(embeddings)
            .map(|((record, normalized_text), embedding)| Item {
                id: record.image_url.clone(),
                raw_text: record.caption.clone(),
                normalized_text,
                embedding,
            })
            .collect();
        let catalog = Self::from_items(items, provider.embedder_id());
        info!(items = catalog.len(), version = %catalog.version, embedder = %catalog.embedder_id, "catalog built");
        Ok(catalog)
    }

    /// Wrap already-embedded items.
    pub fn from_items(items: Vec<Item>, embedder_id: impl Into<String>) -> Self {
        let embedder_id = embedder_id.into();
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                warn!(id = %item.id, "duplicate item identity in catalog");
            }
        }
        let version = catalog_version(&embedder_id, &items);
        Self { items, embedder_id, version }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn embedder_id(&self) -> &str {
        &self.embedder_id
    }

    pub fn version(&self) -> &CatalogVersion {
        &self.version
    }
}

fn catalog_version(embedder_id: &str, items: &[Item]) -> CatalogVersion {
    let mut hasher = blake3::Hasher::new();
    hasher.update(embedder_id.as_bytes());
    for item in items {
        hasher.update(&[0]);
        hasher.update(item.id.as_bytes());
        hasher.update(&[0]);
        hasher.update(item.normalized_text.as_bytes());
        hasher.update(&[0]);
        for x in &item.embedding {
            hasher.update(&x.to_le_bytes());
        }
    }
    CatalogVersion(hasher.finalize().to_hex().to_string())
}
