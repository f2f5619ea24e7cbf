//! roomrank-text
//!
//! Text canonicalization and exact-keyword predicates over normalized
//! descriptions. Everything here is pure and allocation-light.
pub mod keywords;
pub mod normalize;

pub use keywords::{filter, keyword_or_search, matches};
pub use normalize::normalize;
