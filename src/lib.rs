//! Blog Search Server - search for an MDX/Markdown blog, served over MCP.
//!
//! This library turns post sources into plain-text search documents, loads the
//! document collection once and answers fuzzy queries over it.
//!
//! # Architecture
//!
//! - **models**: The `Document` search record
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **content**: Markup stripping, frontmatter parsing and content aggregation
//! - **matching**: Bitap fuzzy matching and the weighted search index
//! - **client**: Document sources (HTTP `/api/search` or a local content directory)
//! - **search**: The fetch-once search hook with loading/error state
//! - **metrics**: Counters for fetches, queries and index builds
//! - **server**: MCP protocol server

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod models;
pub mod search;
pub mod server;

pub use client::{ContentDirectorySource, DocumentSource, HttpDocumentSource, SearchClient};
pub use config::Config;
pub use content::{clean_content, excerpt, ContentCollector};
pub use error::{ConfigError, ContentError, FetchError};
pub use matching::{FuzzyIndex, FuzzyOptions, ScoredMatch, SearchField};
pub use metrics::{FetchTimer, Metrics, MetricsSummary};
pub use models::Document;
pub use search::{LoadState, SearchHook, SearchSnapshot};
pub use server::BlogSearchServer;
