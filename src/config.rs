//! Configuration Module
//!
//! Cache construction parameters with sensible defaults and optional loading
//! from environment variables.

use std::env;
use std::time::Duration;

// == Defaults ==
/// Default entry lifespan: 12 hours.
pub const DEFAULT_LIFESPAN: Duration = Duration::from_secs(12 * 60 * 60);

/// Cache configuration parameters.
///
/// A limit of `0` means unlimited, for both the entry count and the total
/// cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Fixed lifespan applied to every entry at insert time
    pub lifespan: Duration,
    /// Maximum number of entries before eviction starts (0 = unlimited)
    pub max_entries: usize,
    /// Maximum cumulative entry cost before eviction starts (0 = unlimited)
    pub max_total_cost: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lifespan: DEFAULT_LIFESPAN,
            max_entries: 0,
            max_total_cost: 0,
        }
    }
}

impl CacheConfig {
    /// Creates the default configuration (12 hour lifespan, no limits).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry lifespan.
    pub fn lifespan(mut self, lifespan: Duration) -> Self {
        self.lifespan = lifespan;
        self
    }

    /// Sets the maximum entry count (0 = unlimited).
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the maximum cumulative cost (0 = unlimited).
    pub fn max_total_cost(mut self, max_total_cost: u64) -> Self {
        self.max_total_cost = max_total_cost;
        self
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_LIFESPAN_SECS` - Entry lifespan in seconds (default: 43200)
    /// - `CACHE_MAX_ENTRIES` - Maximum entry count (default: 0, unlimited)
    /// - `CACHE_MAX_TOTAL_COST` - Maximum cumulative cost (default: 0, unlimited)
    pub fn from_env() -> Self {
        Self {
            lifespan: env::var("CACHE_LIFESPAN_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LIFESPAN),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            max_total_cost: env::var("CACHE_MAX_TOTAL_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}
