//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for lean getter processing
///
/// Relaxed ordering throughout; counters are exact but not synchronized
/// with each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Results handed to an interceptor
    results_intercepted: AtomicU64,
    /// Results passed through because getters were disabled
    results_skipped: AtomicU64,
    /// Top-level documents walked
    documents_walked: AtomicU64,
    /// Walks aborted by a getter error
    getter_failures: AtomicU64,
    /// Queries answered by the reference engine
    queries_executed: AtomicU64,
    /// Queries the reference engine rejected
    queries_rejected: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment intercepted results
    pub fn increment_results_intercepted(&self) {
        self.results_intercepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment skipped results
    pub fn increment_results_skipped(&self) {
        self.results_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Add walked documents
    pub fn add_documents_walked(&self, count: u64) {
        self.documents_walked.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment getter failures
    pub fn increment_getter_failures(&self) {
        self.getter_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment executed queries
    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejected queries
    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            results_intercepted: self.results_intercepted.load(Ordering::Relaxed),
            results_skipped: self.results_skipped.load(Ordering::Relaxed),
            documents_walked: self.documents_walked.load(Ordering::Relaxed),
            getter_failures: self.getter_failures.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
        }
    }

    /// Snapshot rendered as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub results_intercepted: u64,
    pub results_skipped: u64,
    pub documents_walked: u64,
    pub getter_failures: u64,
    pub queries_executed: u64,
    pub queries_rejected: u64,
}
