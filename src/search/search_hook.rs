//! The search hook: fetch-on-mount state machine plus fuzzy querying.
//!
//! A hook fetches the document collection once when mounted, builds a fuzzy
//! index over it, and answers queries synchronously. Fetch failures never
//! escape; they surface as the `error` message.

use crate::client::DocumentSource;
use crate::matching::{FuzzyIndex, FuzzyOptions};
use crate::metrics::Metrics;
use crate::models::Document;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the hook is in its load lifecycle.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Fetch in flight
    Loading,
    /// Collection fetched and indexed
    Loaded(Arc<Vec<Document>>),
    /// Fetch failed with a displayable message
    Failed(String),
}

impl LoadState {
    /// Short label used in logs and status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

/// The record a consumer reads from the hook at any moment.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub posts: Arc<Vec<Document>>,
    pub loading: bool,
    pub error: Option<String>,
}

struct HookState {
    load: LoadState,
    index: Option<Arc<FuzzyIndex>>,
}

struct Inner {
    state: RwLock<HookState>,
    options: FuzzyOptions,
    metrics: Metrics,
    mounted: AtomicBool,
    index_builds: AtomicU64,
}

impl Inner {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HookState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HookState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to Loaded, rebuilding the index only for a collection not seen before.
    fn apply_documents(&self, documents: Arc<Vec<Document>>) {
        let mut state = self.write();

        let up_to_date = state
            .index
            .as_ref()
            .is_some_and(|index| index.is_built_from(&documents));

        if !up_to_date {
            state.index = Some(Arc::new(FuzzyIndex::new(
                documents.clone(),
                self.options.clone(),
            )));
            self.index_builds.fetch_add(1, Ordering::SeqCst);
            self.metrics.record_index_build();
            debug!(count = documents.len(), "built search index");
        }

        info!(count = documents.len(), "search documents loaded");
        state.load = LoadState::Loaded(documents);
    }

    fn apply_failure(&self, message: String) {
        warn!(error = %message, "search documents failed to load");
        let mut state = self.write();
        state.index = None;
        state.load = LoadState::Failed(message);
    }
}

/// Fetches the blog's search documents once and answers fuzzy queries.
///
/// Each hook owns its state; two hooks never share a fetch or an index.
pub struct SearchHook {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SearchHook {
    /// Mount a hook: start in Loading and spawn the single fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(source: Arc<dyn DocumentSource>, options: FuzzyOptions) -> Self {
        Self::mount_with_metrics(source, options, Metrics::new())
    }

    /// Mount a hook that records into a shared metrics collector.
    pub fn mount_with_metrics(
        source: Arc<dyn DocumentSource>,
        options: FuzzyOptions,
        metrics: Metrics,
    ) -> Self {
        let inner = Arc::new(Inner {
            state: RwLock::new(HookState {
                load: LoadState::Loading,
                index: None,
            }),
            options,
            metrics,
            mounted: AtomicBool::new(true),
            index_builds: AtomicU64::new(0),
        });

        let task_inner = inner.clone();
        let handle = tokio::spawn(async move {
            debug!("fetching search documents");
            let result = source.fetch_documents().await;

            if !task_inner.mounted.load(Ordering::SeqCst) {
                debug!("hook unmounted before fetch completed, discarding result");
                return;
            }

            match result {
                Ok(documents) => task_inner.apply_documents(Arc::new(documents)),
                Err(e) => task_inner.apply_failure(e.user_message()),
            }
        });

        Self {
            inner,
            task: Mutex::new(Some(handle)),
        }
    }

    /// The loaded collection, or an empty one while loading or after a failure.
    pub fn posts(&self) -> Arc<Vec<Document>> {
        match &self.inner.read().load {
            LoadState::Loaded(documents) => documents.clone(),
            _ => Arc::new(Vec::new()),
        }
    }

    /// Whether the fetch is still pending.
    pub fn loading(&self) -> bool {
        matches!(self.inner.read().load, LoadState::Loading)
    }

    /// The failure message, if the fetch failed.
    pub fn error(&self) -> Option<String> {
        match &self.inner.read().load {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Current lifecycle state.
    pub fn load_state(&self) -> LoadState {
        self.inner.read().load.clone()
    }

    /// `posts`, `loading` and `error` read under one lock.
    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.inner.read();
        match &state.load {
            LoadState::Loading => SearchSnapshot {
                posts: Arc::new(Vec::new()),
                loading: true,
                error: None,
            },
            LoadState::Loaded(documents) => SearchSnapshot {
                posts: documents.clone(),
                loading: false,
                error: None,
            },
            LoadState::Failed(message) => SearchSnapshot {
                posts: Arc::new(Vec::new()),
                loading: false,
                error: Some(message.clone()),
            },
        }
    }

    /// Query the collection.
    ///
    /// A blank query returns every post in collection order. Before the index
    /// exists any other query returns nothing. Otherwise results are in match
    /// order, best first.
    pub fn search(&self, query: &str) -> Vec<Document> {
        self.inner.metrics.record_query();

        if query.trim().is_empty() {
            return self.posts().to_vec();
        }

        let index = self.inner.read().index.clone();
        match index {
            Some(index) => {
                let results = index.search(query);
                debug!(query, count = results.len(), "search");
                results
            }
            None => Vec::new(),
        }
    }

    /// The index currently answering queries, if any.
    pub fn index(&self) -> Option<Arc<FuzzyIndex>> {
        self.inner.read().index.clone()
    }

    /// Replace the collection. The index is rebuilt only when `documents` is
    /// not the collection it was built from.
    pub fn set_documents(&self, documents: Arc<Vec<Document>>) {
        self.inner.apply_documents(documents);
    }

    /// How many times this hook has built its index.
    pub fn index_builds(&self) -> u64 {
        self.inner.index_builds.load(Ordering::SeqCst)
    }

    /// Metrics this hook records into.
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    /// Whether the hook is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    /// Unmount: a fetch still in flight is left to finish but its result is dropped.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
    }

    /// Wait for the mount fetch to finish (or be discarded).
    pub async fn wait_until_settled(&self) {
        let handle = self.task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "search fetch task did not complete");
            }
        }
    }
}

impl Drop for SearchHook {
    fn drop(&mut self) {
        self.unmount();
    }
}
