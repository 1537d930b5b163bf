//! Synchronization Module
//!
//! The cache itself carries no internal locking. `Protected` is the supported
//! discipline for sharing one across threads: a mutex-guarded value whose
//! closures keep every compound operation atomic, so the backing store and
//! the key tracker always change together.

use parking_lot::Mutex;

// == Protected ==
/// A value guarded by a mutex, accessed exclusively through closures.
///
/// ```
/// use bounded_cache::{Cache, CacheConfig, Protected};
///
/// let cache = Protected::new(Cache::<String, String>::new(CacheConfig::default()));
///
/// cache.write(|c| c.insert("k".to_string(), "v".to_string()));
/// let hit = cache.write(|c| c.get(&"k".to_string()));
/// assert_eq!(hit, Some("v".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct Protected<T> {
    value: Mutex<T>,
}

impl<T> Protected<T> {
    // == Constructor ==
    /// Wraps a value.
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    // == Read ==
    /// Runs a closure against a shared reference to the value, returning its
    /// result.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.lock())
    }

    // == Write ==
    /// Runs a closure against an exclusive reference to the value, returning
    /// its result.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.lock())
    }

    // == Replace ==
    /// Swaps in a new value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut self.value.lock(), value)
    }

    // == Into Inner ==
    /// Consumes the wrapper, returning the value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Clone> Protected<T> {
    // == Cloned ==
    /// Returns a clone of the current value.
    pub fn cloned(&self) -> T {
        self.value.lock().clone()
    }
}
