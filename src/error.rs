//! Error types for the blog search server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when the search endpoint answers with a non-success status.
pub const SEARCH_INDEX_UNAVAILABLE: &str = "Failed to load search index";

/// Message shown when a fetch failure carries no usable message.
pub const POSTS_UNAVAILABLE: &str = "Failed to load posts";

/// Errors that can occur while fetching the document collection.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The endpoint answered with a non-success HTTP status
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// Transport-level failure (connection refused, DNS, TLS, I/O)
    #[error("{0}")]
    Transport(String),

    /// Failed to parse the JSON response body
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Failure without a usable message
    #[error("unknown fetch failure")]
    Unknown,
}

impl FetchError {
    /// The message surfaced through the hook's `error` field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { .. } => SEARCH_INDEX_UNAVAILABLE.to_string(),
            Self::Transport(message) if !message.trim().is_empty() => message.clone(),
            Self::Json(err) => err.to_string(),
            Self::Transport(_) | Self::Unknown => POSTS_UNAVAILABLE.to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors that can occur while aggregating content files.
#[derive(Error, Debug)]
pub enum ContentError {
    /// IO error while reading content
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Frontmatter could not be parsed
    #[error("invalid frontmatter in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// Frontmatter is missing a required field
    #[error("missing {field} in {path}")]
    MissingField { path: PathBuf, field: &'static str },

    /// Failed to serialize the search index
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with FetchError
pub type FetchResult<T> = Result<T, FetchError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ContentError
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingVar("BLOG_SITE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: BLOG_SITE_URL"
        );

        let err = ContentError::MissingField {
            path: PathBuf::from("posts/hello.mdx"),
            field: "title",
        };
        assert_eq!(err.to_string(), "missing title in posts/hello.mdx");
    }

    #[test]
    fn test_status_message_is_fixed() {
        let err = FetchError::Status { status: 500 };
        assert_eq!(err.user_message(), "Failed to load search index");

        let err = FetchError::Status { status: 404 };
        assert_eq!(err.user_message(), "Failed to load search index");
    }

    #[test]
    fn test_transport_message_passes_through() {
        let err = FetchError::Transport("Connection refused".to_string());
        assert_eq!(err.user_message(), "Connection refused");
    }

    #[test]
    fn test_missing_message_falls_back() {
        assert_eq!(FetchError::Unknown.user_message(), "Failed to load posts");
        assert_eq!(
            FetchError::Transport("   ".to_string()).user_message(),
            "Failed to load posts"
        );
    }

    #[test]
    fn test_json_message_passes_through() {
        let parse_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let expected = parse_err.to_string();
        let err = FetchError::from(parse_err);
        assert_eq!(err.user_message(), expected);
    }
}
