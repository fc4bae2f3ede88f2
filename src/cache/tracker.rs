//! Access Tracker Module
//!
//! Wraps a single cached value with its key and the access statistics used
//! to compute its staleness score.

use std::time::{SystemTime, UNIX_EPOCH};

// == Access Tracker ==
/// One resident cache entry: a key, its value, and access statistics.
///
/// Every read or write of the value through the store counts as an access.
/// The tracker records when the entry was created, when it was last touched,
/// how many times it was touched, and the running mean of the gaps between
/// touches. Those four statistics feed [`AccessTracker::score`].
#[derive(Debug, Clone)]
pub struct AccessTracker<K, V> {
    /// Entry key, immutable for the lifetime of the entry
    key: K,
    /// The stored value
    value: V,
    /// Creation timestamp (Unix milliseconds), never mutated
    created_at: u64,
    /// Timestamp of the most recent access (Unix milliseconds)
    last_access_at: u64,
    /// Total accesses over the lifetime of the entry, never reset
    access_count: u64,
    /// Running mean of inter-access gaps, in milliseconds
    average_interval_ms: f64,
}

impl<K, V> AccessTracker<K, V> {
    // == Constructor ==
    /// Creates a tracker for a freshly inserted entry.
    ///
    /// Construction itself does not count as an access; the store records
    /// the initial value write right after placing the entry, so an entry
    /// observed after its first `store` has an access count of one.
    pub fn new(key: K, value: V) -> Self {
        let now = current_timestamp_ms();

        Self {
            key,
            value,
            created_at: now,
            last_access_at: now,
            access_count: 0,
            average_interval_ms: 0.0,
        }
    }

    // == Access ==
    /// Records one access: advances the counter, folds the gap since the
    /// previous access into the running mean, and stamps the access time.
    pub(crate) fn access(&mut self) {
        self.access_at(current_timestamp_ms());
    }

    fn access_at(&mut self, now: u64) {
        let gap_ms = now.saturating_sub(self.last_access_at) as f64;
        let previous_count = self.access_count as f64;

        self.access_count += 1;
        self.average_interval_ms =
            (self.average_interval_ms * previous_count + gap_ms) / self.access_count as f64;
        self.last_access_at = now;
    }

    // == Read ==
    /// Counting value read: records an access and returns the value.
    pub(crate) fn read(&mut self) -> &V {
        self.access();
        &self.value
    }

    // == Replace ==
    /// Counting value write: replaces the value and records an access.
    ///
    /// Does not reset the access count or the creation timestamp.
    pub(crate) fn replace(&mut self, value: V) {
        self.value = value;
        self.access();
    }

    // == Score ==
    /// Computes the entry's staleness score at the current wall-clock time.
    ///
    /// ```text
    /// score = (now - created_at) * (now - last_access_at)
    ///         / (access_count * average_interval_ms)
    /// ```
    ///
    /// Higher means staler: older, longer-unused, less-frequently and
    /// less-regularly accessed entries score higher, and the store always
    /// evicts the highest-scoring occupied slot. A zero denominator (no
    /// accesses yet, or every access in the same millisecond) yields `0.0`,
    /// marking the entry as the least eligible for eviction.
    ///
    /// The score is recomputed from the current time on every call; it is
    /// never cached.
    pub fn score(&self) -> f64 {
        self.score_at(current_timestamp_ms())
    }

    fn score_at(&self, now: u64) -> f64 {
        let denominator = self.access_count as f64 * self.average_interval_ms;
        if denominator == 0.0 {
            return 0.0;
        }

        let age_ms = now.saturating_sub(self.created_at) as f64;
        let idle_ms = now.saturating_sub(self.last_access_at) as f64;
        age_ms * idle_ms / denominator
    }

    // == Accessors ==
    /// Returns the entry key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the stored value without counting an access.
    ///
    /// The store never hands trackers out on its keyed read path; this is
    /// the inspection surface offered to revalidators and diagnostics, and
    /// only a revalidator's push-back through `store` counts as an access.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Creation timestamp in Unix milliseconds.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Timestamp of the most recent access in Unix milliseconds.
    pub fn last_access_at(&self) -> u64 {
        self.last_access_at
    }

    /// Total number of accesses recorded for this entry.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Running mean of inter-access gaps in milliseconds.
    pub fn average_interval_ms(&self) -> f64 {
        self.average_interval_ms
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
