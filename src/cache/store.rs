//! Cache Store Module
//!
//! The public cache type: a bounded backing store plus a key tracker, an
//! injectable clock, and a fixed entry lifespan checked lazily on read.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::cache::{BoundedStore, CacheEntry, CacheStats, KeyTracker};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;

// == Cache ==
/// A bounded, time-expiring key/value cache.
///
/// Entries carry a caller-assigned cost; once the entry count or the
/// cumulative cost exceeds the configured limits, least-recently-used entries
/// are evicted. Independently of capacity, every entry expires a fixed
/// lifespan after insertion and is dropped lazily by the read that finds it
/// stale; there is no background sweep.
///
/// The cache is a plain single-owner structure with no internal locking; for
/// concurrent use, wrap it in [`Protected`](crate::Protected) so the store
/// and the key tracker always change together.
pub struct Cache<K, V> {
    /// Capacity-bounded backing store
    store: BoundedStore<K, V>,
    /// Side-index of present keys, pruned on every eviction
    tracker: KeyTracker<K>,
    /// Time source consulted on insert and read
    clock: Arc<dyn Clock>,
    /// Fixed lifespan applied to every entry at insert time
    lifespan: Duration,
    /// Activity counters
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> Cache<K, V> {
    // == Constructors ==
    /// Creates a cache using the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(Arc::new(SystemClock), config)
    }

    /// Creates a cache with an injected time source.
    pub fn with_clock(clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            store: BoundedStore::new(config.max_entries, config.max_total_cost),
            tracker: KeyTracker::new(),
            clock,
            lifespan: config.lifespan,
            stats: CacheStats::new(),
        }
    }

    // == Insert ==
    /// Inserts a value with zero cost.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_with_cost(key, value, 0);
    }

    /// Inserts a value with the given cost.
    ///
    /// The entry expires one lifespan from now. Always succeeds; as a side
    /// effect the backing store may immediately evict this or another entry
    /// to get back under its limits, and the key tracker is pruned for every
    /// such eviction before this method returns.
    pub fn insert_with_cost(&mut self, key: K, value: V, cost: u64) {
        let now = self.clock.now_ms();
        let expires_at = now.saturating_add(self.lifespan.as_millis() as u64);

        // Track first: if the store evicts this very entry for capacity, the
        // eviction report below prunes it again, leaving tracker and store in
        // agreement either way.
        self.tracker.insert(key.clone());
        let evicted = self
            .store
            .insert(CacheEntry::new(key, value, expires_at, cost));

        for victim in &evicted {
            self.tracker.remove(victim);
            self.stats.record_eviction();
        }
    }

    // == Get ==
    /// Returns the value for a key, if present and not expired.
    ///
    /// An entry whose lifespan has elapsed is removed by this read and
    /// reported as absent. A successful read marks the entry most recently
    /// used.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();

        let expired = match self.store.peek(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            trace!("dropping expired entry on read");
            self.store.remove(key);
            self.tracker.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.store.get(key).map(|entry| entry.value.clone())
    }

    // == Remove ==
    /// Removes the entry for a key, returning whether one was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let removed = self.store.remove(key).is_some();
        self.tracker.remove(key);
        removed
    }

    // == Remove All ==
    /// Removes every entry and forgets every tracked key.
    pub fn clear(&mut self) {
        self.store.clear();
        self.tracker.clear();
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // == Time To Live ==
    /// Returns the remaining lifespan of a present entry.
    ///
    /// Returns `Duration::ZERO` for an entry that is present but already
    /// past its expiration (the next read will drop it). Does not touch
    /// recency.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.store
            .peek(key)
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms(now)))
    }

    // == Stats ==
    /// Returns a snapshot of the activity counters and current sizes.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.observe_sizes(self.store.len(), self.store.total_cost());
        stats
    }

    // == Configuration ==
    /// Returns the configuration this cache was built with.
    pub fn config(&self) -> CacheConfig {
        CacheConfig {
            lifespan: self.lifespan,
            max_entries: self.store.max_entries(),
            max_total_cost: self.store.max_total_cost(),
        }
    }

    // == Transformation ==
    /// Returns a cache with every value transformed by `f`.
    ///
    /// The new cache shares this cache's clock and configuration and holds
    /// `f(&value)` for every currently-tracked, still-present entry,
    /// preserving each entry's cost. Entries pass through the normal insert
    /// path, so they get a fresh lifespan.
    pub fn map<T, F>(&self, f: F) -> Cache<K, T>
    where
        F: Fn(&V) -> T,
    {
        let mut mapped = self.derive();
        for entry in self.entries() {
            mapped.insert_with_cost(entry.key.clone(), f(&entry.value), entry.cost);
        }
        mapped
    }

    /// Returns a cache with every value transformed by `f`, omitting entries
    /// for which `f` returns `None`.
    pub fn compact_map<T, F>(&self, f: F) -> Cache<K, T>
    where
        F: Fn(&V) -> Option<T>,
    {
        let mut mapped = self.derive();
        for entry in self.entries() {
            if let Some(value) = f(&entry.value) {
                mapped.insert_with_cost(entry.key.clone(), value, entry.cost);
            }
        }
        mapped
    }

    /// Creates an empty cache with the same clock and configuration but a
    /// possibly different value type.
    fn derive<T>(&self) -> Cache<K, T> {
        Cache::with_clock(Arc::clone(&self.clock), self.config())
    }

    // == Entries ==
    /// Returns every tracked, still-present entry.
    pub(crate) fn entries(&self) -> Vec<&CacheEntry<K, V>> {
        let keys = self.tracker.snapshot();
        keys.iter().filter_map(|key| self.store.peek(key)).collect()
    }

    /// Returns whether the key tracker currently lists a key. Test hook for
    /// the tracker/store agreement invariant.
    #[cfg(test)]
    pub(crate) fn is_tracked(&self, key: &K) -> bool {
        self.tracker.contains(key)
    }
}

impl<K: Eq + Hash + Clone, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("entries", &self.store.len())
            .field("total_cost", &self.store.total_cost())
            .field("lifespan", &self.lifespan)
            .field("max_entries", &self.store.max_entries())
            .field("max_total_cost", &self.store.max_total_cost())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    fn test_cache(config: CacheConfig) -> (Cache<String, String>, MockClock) {
        let clock = MockClock::new();
        let cache = Cache::with_clock(Arc::new(clock.clone()), config);
        (cache, clock)
    }

    fn short_lived(lifespan_secs: u64) -> CacheConfig {
        CacheConfig::new().lifespan(Duration::from_secs(lifespan_secs))
    }

    #[test]
    fn test_cache_insert_and_get() {
        let (mut cache, _clock) = test_cache(CacheConfig::default());

        cache.insert("key1".to_string(), "value1".to_string());

        assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_get_nonexistent() {
        let (mut cache, _clock) = test_cache(CacheConfig::default());
        assert_eq!(cache.get(&"nope".to_string()), None);
    }

    #[test]
    fn test_cache_overwrite() {
        let (mut cache, _clock) = test_cache(CacheConfig::default());

        cache.insert("key1".to_string(), "value1".to_string());
        cache.insert("key1".to_string(), "value2".to_string());

        assert_eq!(cache.get(&"key1".to_string()), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_remove() {
        let (mut cache, _clock) = test_cache(CacheConfig::default());

        cache.insert("key1".to_string(), "value1".to_string());
        assert!(cache.remove(&"key1".to_string()));

        assert_eq!(cache.get(&"key1".to_string()), None);
        assert!(!cache.remove(&"key1".to_string()));
        assert!(!cache.is_tracked(&"key1".to_string()));
    }

    #[test]
    fn test_cache_clear() {
        let (mut cache, _clock) = test_cache(CacheConfig::default());

        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get(&"b".to_string()), None);
    }

    #[test]
    fn test_cache_ttl_expiry_is_lazy() {
        let (mut cache, clock) = test_cache(short_lived(1));

        cache.insert("a".to_string(), "x".to_string());

        clock.advance(Duration::from_millis(500));
        assert_eq!(cache.get(&"a".to_string()), Some("x".to_string()));

        clock.advance(Duration::from_millis(1_000));
        // Entry is still stored until this read drops it
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.len(), 0);
        assert!(!cache.is_tracked(&"a".to_string()));
    }

    #[test]
    fn test_cache_expiry_boundary() {
        let (mut cache, clock) = test_cache(short_lived(1));

        cache.insert("a".to_string(), "x".to_string());

        // Expired exactly when the full lifespan has elapsed
        clock.set_ms(1_000);
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn test_cache_cost_limit_eviction() {
        let config = CacheConfig::new().max_total_cost(10);
        let (mut cache, _clock) = test_cache(config);

        cache.insert_with_cost("a".to_string(), "1".to_string(), 6);
        cache.insert_with_cost("b".to_string(), "2".to_string(), 6);

        // 12 > 10: the older entry is evicted, the newer survives
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get(&"b".to_string()), Some("2".to_string()));
        assert!(!cache.is_tracked(&"a".to_string()));
    }

    #[test]
    fn test_cache_count_limit_eviction() {
        let config = CacheConfig::new().max_entries(3);
        let (mut cache, _clock) = test_cache(config);

        for (k, v) in [("k1", "v1"), ("k2", "v2"), ("k3", "v3"), ("k4", "v4")] {
            cache.insert(k.to_string(), v.to_string());
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&"k1".to_string()), None);
        assert_eq!(cache.get(&"k4".to_string()), Some("v4".to_string()));
    }

    #[test]
    fn test_cache_get_protects_from_eviction() {
        let config = CacheConfig::new().max_entries(3);
        let (mut cache, _clock) = test_cache(config);

        cache.insert("k1".to_string(), "v1".to_string());
        cache.insert("k2".to_string(), "v2".to_string());
        cache.insert("k3".to_string(), "v3".to_string());

        // Reading k1 makes k2 the eviction candidate
        assert!(cache.get(&"k1".to_string()).is_some());
        cache.insert("k4".to_string(), "v4".to_string());

        assert_eq!(cache.get(&"k1".to_string()), Some("v1".to_string()));
        assert_eq!(cache.get(&"k2".to_string()), None);
    }

    #[test]
    fn test_cache_oversized_insert_still_succeeds() {
        let config = CacheConfig::new().max_total_cost(10);
        let (mut cache, _clock) = test_cache(config);

        // Costlier than the whole cache allows: inserted, then immediately
        // evicted; the operation itself does not fail
        cache.insert_with_cost("huge".to_string(), "x".to_string(), 100);

        assert!(cache.is_empty());
        assert!(!cache.is_tracked(&"huge".to_string()));
    }

    #[test]
    fn test_cache_ttl_remaining() {
        let (mut cache, clock) = test_cache(short_lived(10));

        cache.insert("a".to_string(), "x".to_string());
        clock.advance(Duration::from_secs(4));

        assert_eq!(
            cache.ttl_remaining(&"a".to_string()),
            Some(Duration::from_secs(6))
        );
        assert_eq!(cache.ttl_remaining(&"missing".to_string()), None);

        clock.advance(Duration::from_secs(20));
        assert_eq!(
            cache.ttl_remaining(&"a".to_string()),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_cache_stats_tracking() {
        let (mut cache, clock) = test_cache(short_lived(1));

        cache.insert_with_cost("a".to_string(), "1".to_string(), 5);
        assert!(cache.get(&"a".to_string()).is_some()); // hit
        assert!(cache.get(&"missing".to_string()).is_none()); // miss

        clock.advance(Duration::from_secs(2));
        assert!(cache.get(&"a".to_string()).is_none()); // expired: miss + expiration

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_cost, 0);
    }

    #[test]
    fn test_cache_stats_eviction_count() {
        let config = CacheConfig::new().max_entries(1);
        let (mut cache, _clock) = test_cache(config);

        cache.insert("a".to_string(), "1".to_string());
        cache.insert("b".to_string(), "2".to_string());
        cache.insert("c".to_string(), "3".to_string());

        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_cache_map_transforms_values() {
        let (mut cache, _clock) = test_cache(CacheConfig::default());

        cache.insert_with_cost("a".to_string(), "1".to_string(), 7);
        cache.insert_with_cost("b".to_string(), "2".to_string(), 9);

        let mut lengths = cache.map(|v| v.len());

        assert_eq!(lengths.len(), 2);
        assert_eq!(lengths.get(&"a".to_string()), Some(1));
        assert_eq!(lengths.get(&"b".to_string()), Some(1));
        // Costs carry over into the new cache
        assert_eq!(lengths.stats().total_cost, 16);
    }

    #[test]
    fn test_cache_map_preserves_config() {
        let config = CacheConfig::new()
            .lifespan(Duration::from_secs(99))
            .max_entries(5)
            .max_total_cost(50);
        let (cache, _clock) = test_cache(config.clone());

        let mapped: Cache<String, usize> = cache.map(|v| v.len());
        assert_eq!(mapped.config(), config);
    }

    #[test]
    fn test_cache_map_roundtrip_with_bijection() {
        let mut cache: Cache<String, i64> = Cache::new(CacheConfig::default());

        cache.insert("a".to_string(), 1i64);
        cache.insert("b".to_string(), 2i64);

        let mut roundtripped = cache.map(|v| v + 100).map(|v| v - 100);

        assert_eq!(roundtripped.get(&"a".to_string()), Some(1));
        assert_eq!(roundtripped.get(&"b".to_string()), Some(2));
        assert_eq!(roundtripped.len(), cache.len());
    }

    #[test]
    fn test_cache_compact_map_drops_none() {
        let mut cache: Cache<String, u32> = Cache::new(CacheConfig::default());

        cache.insert("even".to_string(), 2u32);
        cache.insert("odd".to_string(), 3u32);

        let mut evens = cache.compact_map(|v| (v % 2 == 0).then_some(*v));

        assert_eq!(evens.len(), 1);
        assert_eq!(evens.get(&"even".to_string()), Some(2));
        assert_eq!(evens.get(&"odd".to_string()), None);
    }

    #[test]
    fn test_cache_map_skips_capacity_evicted_entries() {
        let config = CacheConfig::new().max_total_cost(10);
        let (mut cache, _clock) = test_cache(config);

        cache.insert_with_cost("a".to_string(), "1".to_string(), 6);
        cache.insert_with_cost("b".to_string(), "2".to_string(), 6);

        // "a" was evicted for capacity, so it must not reappear
        let mut mapped = cache.map(|v| v.clone());
        assert_eq!(mapped.get(&"a".to_string()), None);
        assert_eq!(mapped.get(&"b".to_string()), Some("2".to_string()));
    }

    #[test]
    fn test_cache_works_with_integer_keys() {
        let (mut cache, _clock) = {
            let clock = MockClock::new();
            let cache: Cache<u64, Vec<u8>> =
                Cache::with_clock(Arc::new(clock.clone()), CacheConfig::default());
            (cache, clock)
        };

        cache.insert(7, vec![1, 2, 3]);
        assert_eq!(cache.get(&7), Some(vec![1, 2, 3]));
    }
}
