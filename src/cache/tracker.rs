//! Key Tracker Module
//!
//! Side-index of the keys currently held by the bounded store. The cache adds
//! to it on insert and prunes it with every eviction the store reports, so at
//! each operation boundary the tracked set matches the store's key set.

use std::collections::HashSet;
use std::hash::Hash;

// == Key Tracker ==
/// Set of keys believed to be present in the backing store.
///
/// The tracker is what makes whole-cache operations (`map`, persistence)
/// possible: the bounded store has no stable iteration contract of its own,
/// so the tracker's snapshot is the authoritative key listing.
#[derive(Debug, Clone)]
pub struct KeyTracker<K> {
    keys: HashSet<K>,
}

impl<K> Default for KeyTracker<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyTracker<K> {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Registers a key as present.
    pub fn insert(&mut self, key: K) {
        self.keys.insert(key);
    }

    // == Remove ==
    /// Prunes a key after the store evicted or removed it.
    pub fn remove(&mut self, key: &K) {
        self.keys.remove(key);
    }

    // == Clear ==
    /// Forgets every key (remove-all path).
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    // == Contains ==
    /// Checks whether a key is currently tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    // == Snapshot ==
    /// Returns the tracked keys as an owned list.
    pub fn snapshot(&self) -> Vec<K> {
        self.keys.iter().cloned().collect()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
