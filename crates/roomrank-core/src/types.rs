//! Domain types shared by the text, vector and hybrid engines.

use serde::{Deserialize, Serialize};

pub type ItemId = String;

/// One catalog entry: a hotel-room image reduced to its description.
///
/// - `id`: stable identity, the public image URL
/// - `raw_text`: description exactly as captioned
/// - `normalized_text`: output of the text normalizer, used for matching
/// - `embedding`: vector computed from `normalized_text` at catalog load
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub raw_text: String,
    pub normalized_text: String,
    pub embedding: Vec<f32>,
}

/// A single row of the catalog CSV.
///
/// `image_url` and `caption` are required columns. `caption_error` is set
/// when the captioning collaborator failed for this image; such rows carry an
/// empty caption and are skipped when a catalog is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub caption: String,
    pub image_url: String,
    #[serde(default)]
    pub caption_error: Option<String>,
}

impl CatalogRecord {
    pub fn is_failed(&self) -> bool {
        self.caption_error.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Ordered keyword groups: OR within a group, AND across groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordGroups(pub Vec<Vec<String>>);

impl KeywordGroups {
    pub fn new<G, K>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self(groups.into_iter().map(|g| g.into_iter().map(Into::into).collect()).collect())
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `(item identity, score)`; higher is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: ItemId,
    pub score: f32,
}

/// Result of the flat keyword search: number of distinct keywords found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub id: ItemId,
    pub relevance: usize,
}

/// Content hash identifying one loaded catalog under one embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogVersion(pub String);

impl std::fmt::Display for CatalogVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form is enough for logs.
        f.write_str(self.0.get(..12).unwrap_or(&self.0))
    }
}

/// Outcome of captioning one image.
///
/// `Failed` is never a description: consumers can tell "no caption" apart
/// from a caption that happens to say "no".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionOutcome {
    Described(String),
    Failed(String),
}

impl CaptionOutcome {
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Described(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
