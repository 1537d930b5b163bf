//! Cache Statistics Module
//!
//! Activity counters the cache maintains as it serves reads and absorbs
//! evictions, exposed as point-in-time snapshots.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing what a cache has done so far.
///
/// `hits`/`misses`/`expirations`/`evictions` accumulate over the cache's
/// lifetime; `total_entries` and `total_cost` describe its state at the
/// moment the snapshot was taken. An expired read bumps both `expirations`
/// and `misses`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that returned nothing (absent or expired key)
    pub misses: u64,
    /// Entries dropped by the lazy TTL check on read
    pub expirations: u64,
    /// Entries evicted under count or cost pressure
    pub evictions: u64,
    /// Entries currently stored
    pub total_entries: usize,
    /// Cumulative cost of the entries currently stored
    pub total_cost: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of reads that hit, `0.0` when nothing has been read yet.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            reads => self.hits as f64 / reads as f64,
        }
    }

    // == Recorders ==
    /// Counts a read that returned a value.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a read that returned nothing.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an entry dropped because its lifespan elapsed.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Counts an entry evicted under capacity pressure.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Snapshot Sizes ==
    /// Stamps the snapshot with the cache's current entry count and cost.
    pub fn observe_sizes(&mut self, entries: usize, cost: u64) {
        self.total_entries = entries;
        self.total_cost = cost;
    }
}
