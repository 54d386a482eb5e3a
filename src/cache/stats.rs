//! Cache Statistics Module
//!
//! Tracks read-through performance: hits, misses, remote fetches and failures.

use serde::Serialize;

// == Cache Stats ==
/// Tracks read-through cache metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads answered from the local store
    pub hits: u64,
    /// Reads that found nothing locally
    pub misses: u64,
    /// Remote fetches started
    pub fetches: u64,
    /// Remote fetches that returned an error
    pub fetch_failures: u64,
    /// Misses answered by a fetch another caller completed
    pub coalesced: u64,
    /// Writes into the local store (`put` and populated misses)
    pub writes: u64,
    /// Entries dropped by a capacity-bounded local store
    pub evictions: u64,
    /// Current number of entries in the local store
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
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_fetch(&mut self) {
        self.fetches += 1;
    }

    pub fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn set_evictions(&mut self, count: u64) {
        self.evictions = count;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
