//! Exact-keyword predicates over normalized text.
//!
//! Two shapes of query are supported:
//! - grouped: `[[a, b], [c]]` means `(a OR b) AND c`, used to boost fused rankings
//! - flat: `[a, b, c]` means `a OR b OR c`, scored by how many distinct keywords hit
//!
//! Matching is a plain substring test against text that was already
//! lower-cased by [`crate::normalize`], so it is case-insensitive in effect.

use std::collections::HashSet;

use roomrank_core::types::{Item, KeywordGroups, KeywordHit};

/// True when every group has at least one keyword contained in `normalized_text`.
///
/// No groups matches everything; an empty group matches nothing.
pub fn matches(normalized_text: &str, keyword_groups: &KeywordGroups) -> bool {
    keyword_groups
        .groups()
        .iter()
        .all(|group| group.iter().any(|keyword| normalized_text.contains(keyword.as_str())))
}

/// Identities of the items whose normalized text satisfies `keyword_groups`.
pub fn filter<'a>(items: &'a [Item], keyword_groups: &KeywordGroups) -> HashSet<&'a str> {
    items
        .iter()
        .filter(|item| matches(&item.normalized_text, keyword_groups))
        .map(|item| item.id.as_str())
        .collect()
}

/// Lower-cased, sorted, de-duplicated keywords with blanks removed.
///
/// Two keyword lists with the same canonical form always produce the same
/// search result, which makes this form usable as a cache key.
pub fn canonical_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut out: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .filter(|k| !k.trim().is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Flat OR search: every item containing at least one keyword, ranked by the
/// number of distinct keywords it contains. Ties keep catalog order.
pub fn keyword_or_search<S: AsRef<str>>(items: &[Item], keywords: &[S], k: usize) -> Vec<KeywordHit> {
    let keywords = canonical_keywords(keywords);
    if keywords.is_empty() || k == 0 {
        return Vec::new();
    }
    let mut hits: Vec<KeywordHit> = items
        .iter()
        .filter_map(|item| {
            let relevance = keywords.iter().filter(|kw| item.normalized_text.contains(kw.as_str())).count();
            (relevance > 0).then(|| KeywordHit { id: item.id.clone(), relevance })
        })
        .collect();
    // sort_by is stable: equal relevance keeps catalog order
    hits.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    hits.truncate(k);
    hits
}
