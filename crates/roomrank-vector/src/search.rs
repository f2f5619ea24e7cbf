use roomrank_core::types::RankedResult;

use crate::catalog::Catalog;
use crate::embed_provider::EmbedProvider;

/// Raw cosine score of every catalog item against `query_vec`, in catalog order.
pub fn semantic_scores(catalog: &Catalog, query_vec: &[f32], provider: &dyn EmbedProvider) -> Vec<f32> {
    let batch: Vec<&[f32]> = catalog.items().iter().map(|item| item.embedding.as_slice()).collect();
    provider.similarity(query_vec, &batch)
}

/// Catalog indices ordered by score, highest first; equal scores keep catalog order.
/// NaN ranks below every real score.
pub fn order_by_score(scores: &[f32]) -> Vec<usize> {
    let key = |i: usize| if scores[i].is_nan() { f32::NEG_INFINITY } else { scores[i] };
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| key(b).total_cmp(&key(a)));
    order
}

/// The `k` most similar items with their raw scores. No threshold, no boost.
pub fn top_k(catalog: &Catalog, scores: &[f32], k: usize) -> Vec<RankedResult> {
    order_by_score(scores)
        .into_iter()
        .take(k)
        .map(|i| RankedResult { id: catalog.items()[i].id.clone(), score: scores[i] })
        .collect()
}
