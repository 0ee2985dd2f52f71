//! Report memoization.
//!
//! Reports are cached on the complete [`AnalysisParams`] tuple, so changing
//! any parameter is a miss. Values are shared read-only through `Arc`. The
//! cache holds at most a fixed number of reports and evicts the oldest
//! insertion first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use newsgraph_core::pipeline::{AnalysisParams, AnalysisReport};

/// Reports kept by [`AnalysisCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Entries {
    reports: HashMap<AnalysisParams, Arc<AnalysisReport>>,
    order: VecDeque<AnalysisParams>,
}

/// Thread-safe, bounded map from parameters to the report they produced.
#[derive(Debug)]
pub struct AnalysisCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisCache {
    /// Create an empty cache holding up to [`DEFAULT_CACHE_CAPACITY`] reports.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create an empty cache holding up to `capacity` reports (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Maximum number of cached reports.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached report for exactly these parameters.
    pub fn get(&self, params: &AnalysisParams) -> Option<Arc<AnalysisReport>> {
        self.lock().reports.get(params).cloned()
    }

    /// Store a report, returning the shared handle.
    ///
    /// Replacing an existing key keeps its age; a new key past capacity evicts
    /// the oldest report.
    pub fn insert(&self, params: AnalysisParams, report: AnalysisReport) -> Arc<AnalysisReport> {
        let report = Arc::new(report);
        let mut entries = self.lock();
        if entries
            .reports
            .insert(params.clone(), Arc::clone(&report))
            .is_none()
        {
            entries.order.push_back(params);
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.reports.remove(&oldest);
                tracing::debug!(keyword = %oldest.keyword, "evicted cached analysis");
            }
        }
        report
    }

    /// Return the cached report or compute, store, and return a new one.
    ///
    /// Errors from `compute` are not cached. The lock is not held while
    /// computing, so two callers racing on a cold key may both compute.
    pub fn get_or_try_insert<E>(
        &self,
        params: &AnalysisParams,
        compute: impl FnOnce() -> Result<AnalysisReport, E>,
    ) -> Result<Arc<AnalysisReport>, E> {
        if let Some(hit) = self.get(params) {
            tracing::debug!(keyword = %params.keyword, "analysis cache hit");
            return Ok(hit);
        }
        let report = compute()?;
        Ok(self.insert(params.clone(), report))
    }

    /// Number of cached reports.
    pub fn len(&self) -> usize {
        self.lock().reports.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().reports.is_empty()
    }

    /// Drop every cached report.
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.reports.clear();
        entries.order.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // poisoned: the map and queue are updated together under the lock
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
