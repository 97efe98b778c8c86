//! Counters for rowid filter planning and execution
//!
//! - Counters only, monotonic
//! - Thread-safe, lock-free (relaxed atomics)
//! - Passive: nothing in planning reads them back

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of rowid filter counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Tables for which candidate gathering ran
    tables_planned: AtomicU64,
    /// Candidates produced by the cost model
    candidates_gathered: AtomicU64,
    /// Candidates dropped for non-positive slope
    candidates_unprofitable: AtomicU64,
    /// Candidates left ambiguous after pruning
    candidates_ambiguous: AtomicU64,
    /// Join order evaluations that returned a filter
    filters_chosen: AtomicU64,
    /// Runtime filters successfully filled
    filters_built: AtomicU64,
    /// Runtime filter fills that failed on a scan error
    filter_build_failures: AtomicU64,
    /// Runtime filter fills aborted by the kill signal
    filter_builds_cancelled: AtomicU64,
    /// Row locators collected into runtime filters
    locators_collected: AtomicU64,
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub tables_planned: u64,
    pub candidates_gathered: u64,
    pub candidates_unprofitable: u64,
    pub candidates_ambiguous: u64,
    pub filters_chosen: u64,
    pub filters_built: u64,
    pub filter_build_failures: u64,
    pub filter_builds_cancelled: u64,
    pub locators_collected: u64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Planning

    pub fn increment_tables_planned(&self) {
        self.tables_planned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_candidates_gathered(&self, n: u64) {
        self.candidates_gathered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_candidates_unprofitable(&self, n: u64) {
        self.candidates_unprofitable.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_candidates_ambiguous(&self, n: u64) {
        self.candidates_ambiguous.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_filters_chosen(&self) {
        self.filters_chosen.fetch_add(1, Ordering::Relaxed);
    }

    // Execution

    pub fn increment_filters_built(&self) {
        self.filters_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filter_build_failures(&self) {
        self.filter_build_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filter_builds_cancelled(&self) {
        self.filter_builds_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_locators_collected(&self, n: u64) {
        self.locators_collected.fetch_add(n, Ordering::Relaxed);
    }

    /// Take a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tables_planned: self.tables_planned.load(Ordering::Relaxed),
            candidates_gathered: self.candidates_gathered.load(Ordering::Relaxed),
            candidates_unprofitable: self.candidates_unprofitable.load(Ordering::Relaxed),
            candidates_ambiguous: self.candidates_ambiguous.load(Ordering::Relaxed),
            filters_chosen: self.filters_chosen.load(Ordering::Relaxed),
            filters_built: self.filters_built.load(Ordering::Relaxed),
            filter_build_failures: self.filter_build_failures.load(Ordering::Relaxed),
            filter_builds_cancelled: self.filter_builds_cancelled.load(Ordering::Relaxed),
            locators_collected: self.locators_collected.load(Ordering::Relaxed),
        }
    }
}
