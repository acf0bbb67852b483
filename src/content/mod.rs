//! Post content processing.
//!
//! This module turns MDX/Markdown sources into search documents: frontmatter
//! extraction, markup stripping and directory-wide aggregation.

pub mod collector;
pub mod frontmatter;
pub mod normalizer;

pub use collector::{slug_for, to_search_json, write_search_index, ContentCollector};
pub use frontmatter::{parse_frontmatter, Frontmatter};
pub use normalizer::{clean_content, excerpt};
