//! Data models for blog search.
//!
//! A single record type flows through the whole system: the aggregator emits
//! it, the search API serves it and the search hook indexes it.

pub mod document;

pub use document::{Document, BLOG_URL_PREFIX};
