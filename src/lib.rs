//! Bounded Cache - an in-memory cache with TTL expiration and LRU eviction
//!
//! Entries carry a caller-assigned cost and expire a fixed lifespan after
//! insertion (checked lazily on read). Count and cumulative-cost limits
//! trigger least-recently-used eviction, a key tracker stays in sync with
//! every eviction, and the whole cache can be saved to and loaded from the
//! platform cache directory.
//!
//! ```
//! use bounded_cache::{Cache, CacheConfig};
//!
//! let mut cache = Cache::new(CacheConfig::new().max_total_cost(1_000));
//!
//! cache.insert_with_cost("logo.png".to_string(), vec![0u8; 64], 64);
//! assert_eq!(cache.get(&"logo.png".to_string()), Some(vec![0u8; 64]));
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
mod persist;
pub mod sync;

pub use cache::{BoundedStore, Cache, CacheEntry, CacheStats, KeyTracker, LruTracker};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_LIFESPAN};
pub use error::{CacheError, Result};
pub use sync::Protected;
