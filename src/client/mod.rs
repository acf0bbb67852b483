//! HTTP client for the blog's search endpoint.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client fetches the document array from
//! `/api/search` and maps failures to the messages the search hook surfaces.

mod async_wrapper;
pub use async_wrapper::{ContentDirectorySource, DocumentSource, HttpDocumentSource};

use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::metrics::{FetchTimer, Metrics};
use crate::models::Document;
use std::sync::Arc;
use std::time::Duration;

/// Path of the search index endpoint relative to the site URL.
pub const SEARCH_ENDPOINT: &str = "/api/search";

/// HTTP client for the blog search API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct SearchClient {
    /// Base URL of the blog
    base_url: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl SearchClient {
    /// Create a new SearchClient from configuration.
    ///
    /// Falls back to an empty base URL when no site URL is configured; requests
    /// then fail as transport errors.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.site_url.clone().unwrap_or_default(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a SearchClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Share a metrics collector with other components.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a GET request.
    fn get(&self, path: &str) -> FetchResult<ureq::Response> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        self.agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(map_error)
    }

    /// Fetch every search document published by the blog.
    pub fn fetch_documents(&self) -> FetchResult<Vec<Document>> {
        let timer = FetchTimer::new(self.metrics.clone());

        match self.fetch_documents_inner() {
            Ok(documents) => {
                tracing::info!(count = documents.len(), "fetched search documents");
                timer.complete(documents.len());
                Ok(documents)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch search documents");
                timer.complete_with_error();
                Err(e)
            }
        }
    }

    fn fetch_documents_inner(&self) -> FetchResult<Vec<Document>> {
        let response = self.get(SEARCH_ENDPOINT)?;
        let body = response
            .into_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let mut documents: Vec<Document> = serde_json::from_str(&body)?;
        for doc in &mut documents {
            doc.populate_computed_fields();
        }

        Ok(documents)
    }
}

/// Map a ureq error to a FetchError.
fn map_error(error: ureq::Error) -> FetchError {
    match error {
        ureq::Error::Status(code, _) => FetchError::Status { status: code },
        ureq::Error::Transport(transport) => {
            let message = transport.to_string();
            if message.trim().is_empty() {
                FetchError::Unknown
            } else {
                FetchError::Transport(message)
            }
        }
    }
}
