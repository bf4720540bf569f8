//! Retrieval metrics
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one data source
///
/// All counters use Relaxed ordering; values are exact once the counted
/// operations have returned.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Retrievals that returned a table
    retrievals_executed: AtomicU64,
    /// Retrievals that returned an error
    retrievals_failed: AtomicU64,
    /// Rows returned to callers
    rows_returned: AtomicU64,
    /// Retrievals whose projection was augmented
    fields_augmented: AtomicU64,
    /// Channel identifiers inferred from a traffic type
    identifiers_inferred: AtomicU64,
    /// Channel identifiers set to the empty identifier
    identifiers_defaulted: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_retrievals_executed(&self) {
        self.retrievals_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retrievals_failed(&self) {
        self.retrievals_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_returned(&self, rows: u64) {
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_fields_augmented(&self) {
        self.fields_augmented.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_identifiers_inferred(&self, count: u64) {
        self.identifiers_inferred.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_identifiers_defaulted(&self, count: u64) {
        self.identifiers_defaulted.fetch_add(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            retrievals_executed: self.retrievals_executed.load(Ordering::Relaxed),
            retrievals_failed: self.retrievals_failed.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
            fields_augmented: self.fields_augmented.load(Ordering::Relaxed),
            identifiers_inferred: self.identifiers_inferred.load(Ordering::Relaxed),
            identifiers_defaulted: self.identifiers_defaulted.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub retrievals_executed: u64,
    pub retrievals_failed: u64,
    pub rows_returned: u64,
    pub fields_augmented: u64,
    pub identifiers_inferred: u64,
    pub identifiers_defaulted: u64,
}
