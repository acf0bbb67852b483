//! Configuration management for the blog search server.
//!
//! This module handles loading and validating configuration from environment variables.
//! The binary loads `.env` through `dotenvy` before calling [`Config::from_env`].

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

/// Configuration for the blog search server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the blog serving `/api/search`
    pub site_url: Option<String>,

    /// Local content directory used instead of the HTTP endpoint
    pub content_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Maximum number of search results returned by the MCP tool (default: 10)
    pub max_search_results: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// One of these must be set:
    /// - `BLOG_SITE_URL`: Base URL of the blog (http:// or https://)
    /// - `BLOG_CONTENT_DIR`: Directory of `.md`/`.mdx` posts to index locally
    ///
    /// Optional environment variables:
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `MAX_SEARCH_RESULTS`: Max results per query (default: 10)
    pub fn from_env() -> ConfigResult<Self> {
        let site_url = env::var("BLOG_SITE_URL").ok().filter(|s| !s.trim().is_empty());
        let content_dir = env::var("BLOG_CONTENT_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        if site_url.is_none() && content_dir.is_none() {
            return Err(ConfigError::MissingVar(
                "BLOG_SITE_URL or BLOG_CONTENT_DIR".to_string(),
            ));
        }

        if let Some(url) = &site_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    var: "BLOG_SITE_URL".to_string(),
                    reason: "Must start with http:// or https://".to_string(),
                });
            }
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let max_search_results = Self::parse_env_usize("MAX_SEARCH_RESULTS", 10)?;

        if max_search_results == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_SEARCH_RESULTS".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            site_url,
            content_dir,
            request_timeout,
            max_search_results,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            site_url: None,
            content_dir: None,
            request_timeout: 10,
            max_search_results: 10,
        }
    }
}
