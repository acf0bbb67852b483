use async_trait::async_trait;
use blog_search_server::client::DocumentSource;
use blog_search_server::error::{FetchError, FetchResult};
use blog_search_server::models::Document;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock document source for testing.
///
/// Returns a configured collection or error and counts fetches. A gated mock
/// holds every fetch until `release` is called, which lets tests observe the
/// loading state or unmount mid-fetch.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockDocumentSource {
    documents: Arc<Mutex<Vec<Document>>>,
    failure: Arc<Mutex<Option<fn() -> FetchError>>>,
    gate: Option<Arc<Notify>>,
    fetch_count: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockDocumentSource {
    /// Create a source that returns `documents`.
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(Mutex::new(documents)),
            failure: Arc::new(Mutex::new(None)),
            gate: None,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a source whose fetches fail with the error `make_error` builds.
    pub fn failing(make_error: fn() -> FetchError) -> Self {
        let source = Self::new(Vec::new());
        *source.failure.lock().unwrap() = Some(make_error);
        source
    }

    /// Hold fetches until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let a held fetch complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of fetches started.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for MockDocumentSource {
    async fn fetch_documents(&self) -> FetchResult<Vec<Document>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let failure = *self.failure.lock().unwrap();
        if let Some(make_error) = failure {
            return Err(make_error());
        }

        let documents = self.documents.lock().unwrap().clone();
        Ok(documents)
    }
}
