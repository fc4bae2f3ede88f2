//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions, and
//! refresh passes.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
///
/// Counters are cumulative for the lifetime of the store; a reconfiguration
/// rebuild discards the resident entries but not the counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not resident)
    pub misses: u64,
    /// Number of entries evicted to make room for a new key
    pub evictions: u64,
    /// Number of completed refresh passes over the slot array
    pub refresh_passes: u64,
    /// Current number of resident entries
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Refresh Pass ==
    /// Increments the refresh pass counter.
    pub fn record_refresh_pass(&mut self) {
        self.refresh_passes += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }

    // == Snapshot ==
    /// Captures a point-in-time view of the counters for reporting.
    pub fn snapshot(&self, capacity: usize) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            refresh_passes: self.refresh_passes,
            total_entries: self.total_entries,
            capacity,
            hit_rate: self.hit_rate(),
            captured_at: Utc::now(),
        }
    }
}

// == Stats Snapshot ==
/// A timestamped, serializable view of the cache counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub refresh_passes: u64,
    pub total_entries: usize,
    pub capacity: usize,
    pub hit_rate: f64,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}
