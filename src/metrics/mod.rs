//! Counters for the search subsystem.
//!
//! Document sources record fetches through [`FetchTimer`]; the search hook
//! counts queries and index builds. `search_status` reports a [`MetricsSummary`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default)]
struct Counters {
    fetches: AtomicU64,
    fetch_errors: AtomicU64,
    fetch_millis: AtomicU64,
    documents_fetched: AtomicU64,
    queries: AtomicU64,
    index_builds: AtomicU64,
}

/// Shared counters; clones observe the same values.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    counters: Arc<Counters>,
}

impl Metrics {
    /// Create a collector with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answered query.
    pub fn record_query(&self) {
        self.counters.queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fuzzy index build.
    pub fn record_index_build(&self) {
        self.counters.index_builds.fetch_add(1, Ordering::Relaxed);
    }

    /// Fetches attempted, failed ones included.
    pub fn fetches_total(&self) -> u64 {
        self.counters.fetches.load(Ordering::Relaxed)
    }

    pub fn fetch_errors_total(&self) -> u64 {
        self.counters.fetch_errors.load(Ordering::Relaxed)
    }

    pub fn documents_fetched_total(&self) -> u64 {
        self.counters.documents_fetched.load(Ordering::Relaxed)
    }

    pub fn queries_total(&self) -> u64 {
        self.counters.queries.load(Ordering::Relaxed)
    }

    pub fn index_builds_total(&self) -> u64 {
        self.counters.index_builds.load(Ordering::Relaxed)
    }

    /// Snapshot every counter.
    pub fn summary(&self) -> MetricsSummary {
        let fetches = self.fetches_total();
        let fetch_millis = self.counters.fetch_millis.load(Ordering::Relaxed);

        MetricsSummary {
            fetches_total: fetches,
            fetch_errors_total: self.fetch_errors_total(),
            fetch_duration_total_ms: fetch_millis,
            fetch_duration_avg_ms: if fetches == 0 {
                0.0
            } else {
                fetch_millis as f64 / fetches as f64
            },
            documents_fetched_total: self.documents_fetched_total(),
            queries_total: self.queries_total(),
            index_builds_total: self.index_builds_total(),
        }
    }

    fn record_fetch(&self, started: Instant, outcome: Option<usize>) {
        let c = &self.counters;
        c.fetches.fetch_add(1, Ordering::Relaxed);
        c.fetch_millis
            .fetch_add(started.elapsed().as_millis() as u64, Ordering::Relaxed);

        match outcome {
            Some(documents) => {
                c.documents_fetched
                    .fetch_add(documents as u64, Ordering::Relaxed);
            }
            None => {
                c.fetch_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub fetches_total: u64,
    pub fetch_errors_total: u64,
    pub fetch_duration_total_ms: u64,
    pub fetch_duration_avg_ms: f64,
    pub documents_fetched_total: u64,
    pub queries_total: u64,
    pub index_builds_total: u64,
}

/// Times one document fetch; consumed by recording its outcome.
pub struct FetchTimer {
    start: Instant,
    metrics: Metrics,
}

impl FetchTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Record a successful fetch of `documents` posts.
    pub fn complete(self, documents: usize) {
        self.metrics.record_fetch(self.start, Some(documents));
    }

    /// Record a failed fetch.
    pub fn complete_with_error(self) {
        self.metrics.record_fetch(self.start, None);
    }
}
