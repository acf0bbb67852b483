//! Client-side search over the blog's posts.
//!
//! This module provides the search hook: a single fetch of the document
//! collection on mount, an in-memory fuzzy index, and load/error state.

pub mod search_hook;

pub use search_hook::{LoadState, SearchHook, SearchSnapshot};
