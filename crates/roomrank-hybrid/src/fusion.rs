//! Score fusion: semantic similarity plus an additive keyword boost.
//!
//! The semantic pass and the keyword pass are computed independently and
//! only meet here. For a matching item the fused score is `raw + boost`,
//! otherwise `raw`. A matching item is therefore never excluded as long as
//! `raw >= threshold - boost`.

use std::collections::HashSet;

use roomrank_core::config::RankingSettings;
use roomrank_core::types::{Item, RankedResult};
use roomrank_vector::order_by_score;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParams {
    pub boost: f32,
    pub threshold: f32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self { boost: 0.3, threshold: 0.60 }
    }
}

impl From<&RankingSettings> for FusionParams {
    fn from(settings: &RankingSettings) -> Self {
        Self { boost: settings.boost, threshold: settings.threshold }
    }
}

/// Fuse raw scores (`scores[i]` belongs to `items[i]`) with keyword matches.
///
/// Traverses items in descending raw-score order (catalog order on ties),
/// keeps the first occurrence of each identity, boosts members of
/// `keyword_matches`, drops anything below the threshold and returns the
/// survivors by fused score, highest first.
pub fn fuse(items: &[Item], scores: &[f32], keyword_matches: &HashSet<&str>, params: FusionParams) -> Vec<RankedResult> {
    debug_assert_eq!(items.len(), scores.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    let mut fused: Vec<RankedResult> = Vec::with_capacity(items.len());
    for i in order_by_score(scores) {
        let id = items[i].id.as_str();
        if !seen.insert(id) {
            continue;
        }
        let boost = if keyword_matches.contains(id) { params.boost } else { 0.0 };
        fused.push(RankedResult { id: id.to_string(), score: scores[i] + boost });
    }
    // NaN never passes `>=`
    fused.retain(|r| r.score >= params.threshold);
    fused.sort_by(|a, b| b.score.total_cmp(&a.score));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter()
            .map(|id| Item { id: id.to_string(), raw_text: String::new(), normalized_text: String::new(), embedding: vec![] })
            .collect()
    }

    #[test]
    fn boost_lifts_a_middling_match_above_threshold() {
        let items = items(&["matched", "unmatched"]);
        let matches = HashSet::from(["matched"]);
        let out = fuse(&items, &[0.45, 0.45], &matches, FusionParams::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "matched");
        assert!((out[0].score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn boosted_item_can_overtake_a_stronger_semantic_hit() {
        let items = items(&["semantic", "keyword"]);
        let matches = HashSet::from(["keyword"]);
        let out = fuse(&items, &[0.8, 0.6], &matches, FusionParams::default());
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["keyword", "semantic"]);
    }

    #[test]
    fn duplicate_identity_keeps_the_highest_scoring_occurrence() {
        let items = items(&["dup", "other", "dup"]);
        let out = fuse(&items, &[0.61, 0.7, 0.9], &HashSet::new(), FusionParams::default());
        let got: Vec<(&str, f32)> = out.iter().map(|r| (r.id.as_str(), r.score)).collect();
        assert_eq!(got, vec![("dup", 0.9), ("other", 0.7)]);
    }

    #[test]
    fn nan_copy_does_not_hide_a_scored_duplicate() {
        let items = items(&["dup", "dup"]);
        let out = fuse(&items, &[0.9, f32::NAN], &HashSet::new(), FusionParams::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "dup");
        assert!((out[0].score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn threshold_is_inclusive_and_nan_is_dropped() {
        let items = items(&["edge", "nan"]);
        let params = FusionParams { boost: 0.0, threshold: 0.5 };
        let out = fuse(&items, &[0.5, f32::NAN], &HashSet::new(), params);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "edge");
    }

    #[test]
    fn params_follow_ranking_settings() {
        let settings = RankingSettings { boost: 0.2, threshold: 0.5, top_k: 3 };
        assert_eq!(FusionParams::from(&settings), FusionParams { boost: 0.2, threshold: 0.5 });
    }
}
