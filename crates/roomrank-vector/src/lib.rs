//! roomrank-vector
//!
//! In-memory embedding space for one catalog: the provider abstraction,
//! cosine similarity, the embedded [`Catalog`] and top-k semantic search.
pub mod catalog;
pub mod embed_provider;
pub mod search;
pub mod similarity;

pub use catalog::Catalog;
pub use embed_provider::EmbedProvider;
pub use search::{order_by_score, semantic_scores, top_k};
pub use similarity::{cos_sim_batch, cosine_similarity};
