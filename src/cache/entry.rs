//! Cache Entry Module
//!
//! Defines the record stored for each key: the value, the absolute expiration
//! instant, and the cost counted toward the capacity limit.

// == Cache Entry ==
/// A single cache entry.
///
/// Entries are owned exclusively by the bounded store; callers only ever see
/// clones of the value. Expiry predicates take the current time as a
/// parameter so the cache's injected clock stays authoritative.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The lookup key
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiration instant (Unix milliseconds)
    pub expires_at_ms: u64,
    /// Caller-assigned weight counted toward the cost limit
    pub cost: u64,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry expiring at the given absolute instant.
    pub fn new(key: K, value: V, expires_at_ms: u64, cost: u64) -> Self {
        Self {
            key,
            value,
            expires_at_ms,
            cost,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiration instant, so an entry becomes
    /// unreadable the moment its full lifespan has elapsed.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }

    // == Time To Live ==
    /// Returns the remaining lifespan in milliseconds at `now_ms`.
    ///
    /// Returns `0` once the entry has expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }
}
