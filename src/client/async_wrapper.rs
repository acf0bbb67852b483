//! Async document sources.
//!
//! This module provides the async interface the search hook fetches through. Both
//! implementations do blocking work (HTTP via `ureq`, filesystem walks) and run it
//! on the blocking thread pool with `tokio::task::spawn_blocking`, preventing
//! blocking of the async runtime.

use crate::client::SearchClient;
use crate::content::ContentCollector;
use crate::error::{FetchError, FetchResult};
use crate::metrics::{FetchTimer, Metrics};
use crate::models::Document;
use async_trait::async_trait;
use std::sync::Arc;

/// A source of the blog's search documents.
///
/// The search hook calls `fetch_documents` exactly once per mount.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_documents(&self) -> FetchResult<Vec<Document>>;
}

/// Fetches documents from the blog's `/api/search` endpoint.
///
/// Uses `tokio::task::spawn_blocking` to run the synchronous HTTP request
/// on a dedicated thread pool.
#[derive(Clone)]
pub struct HttpDocumentSource {
    client: Arc<SearchClient>,
}

impl HttpDocumentSource {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_documents(&self) -> FetchResult<Vec<Document>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.fetch_documents())
            .await
            .map_err(|e| FetchError::Transport(format!("Task join error: {}", e)))?
    }
}

/// Builds documents directly from a local content directory.
///
/// Runs the content aggregator, so the hook can serve a blog checkout without
/// the site being deployed.
#[derive(Clone)]
pub struct ContentDirectorySource {
    collector: Arc<ContentCollector>,
    metrics: Metrics,
}

impl ContentDirectorySource {
    pub fn new(collector: ContentCollector) -> Self {
        Self {
            collector: Arc::new(collector),
            metrics: Metrics::new(),
        }
    }

    /// Share a metrics collector with other components.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }
}

#[async_trait]
impl DocumentSource for ContentDirectorySource {
    async fn fetch_documents(&self) -> FetchResult<Vec<Document>> {
        let collector = self.collector.clone();
        let timer = FetchTimer::new(self.metrics.clone());

        let result = tokio::task::spawn_blocking(move || collector.collect())
            .await
            .map_err(|e| FetchError::Transport(format!("Task join error: {}", e)))?
            .map_err(|e| FetchError::Transport(e.to_string()));

        match &result {
            Ok(documents) => timer.complete(documents.len()),
            Err(e) => {
                tracing::error!(error = %e, "failed to collect content");
                timer.complete_with_error();
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_content_dir_is_transport_error() {
        let metrics = Metrics::new();
        let source = ContentDirectorySource::new(ContentCollector::new(
            "/definitely/not/a/real/content/dir",
        ))
        .with_metrics(metrics.clone());

        let err = source.fetch_documents().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!err.user_message().is_empty());
        assert_eq!(metrics.fetch_errors_total(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let source =
            HttpDocumentSource::new(SearchClient::with_base_url("http://127.0.0.1:1".to_string()));

        let err = source.fetch_documents().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
