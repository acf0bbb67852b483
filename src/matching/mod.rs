//! Fuzzy matching for blog search.
//!
//! This module provides approximate string matching (Bitap) and the weighted
//! multi-field index built on top of it.

pub mod bitap;
pub mod fuzzy_matcher;

pub use bitap::{BitapOptions, BitapResult, BitapSearcher};
pub use fuzzy_matcher::{
    FieldMatch, FuzzyIndex, FuzzyOptions, ScoredMatch, SearchField, WeightedKey,
};
