//! Persistence Module
//!
//! Whole-cache serialization to and from disk. The file holds a JSON array of
//! `{key, value, cost}` records. Expirations are not persisted: each record
//! is re-inserted through the normal insert path on load, so entries get a
//! fresh lifespan relative to load time. This keeps the format round-trip
//! stable regardless of how long the file sat on disk.

use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::Cache;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Persisted Record ==
/// On-disk form of a single entry.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry<K, V> {
    key: K,
    value: V,
    cost: u64,
}

// == File Location ==
/// Resolves `<platform-cache-directory>/<filename>.cache`.
fn cache_file_path(filename: &str) -> Result<PathBuf> {
    let dir = dirs::cache_dir().ok_or(CacheError::CacheDirUnavailable)?;
    Ok(dir.join(format!("{filename}.cache")))
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    // == Save ==
    /// Writes the cache to `<platform-cache-directory>/<filename>.cache`.
    pub fn save_to_disk(&self, filename: &str) -> Result<()> {
        self.save_to_path(&cache_file_path(filename)?)
    }

    /// Writes the cache to an explicit file path.
    ///
    /// Synchronous file I/O; call it off any latency-sensitive path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let records: Vec<PersistedEntry<K, V>> = self
            .entries()
            .into_iter()
            .map(|entry| PersistedEntry {
                key: entry.key.clone(),
                value: entry.value.clone(),
                cost: entry.cost,
            })
            .collect();

        let data = serde_json::to_vec(&records).map_err(CacheError::Encode)?;
        fs::write(path, data)?;

        info!(path = %path.display(), entries = records.len(), "cache saved to disk");
        Ok(())
    }

    // == Load ==
    /// Reads a cache from `<platform-cache-directory>/<filename>.cache`.
    ///
    /// The returned cache has the default configuration and system clock;
    /// use [`read_from_disk_with`](Self::read_from_disk_with) to supply your
    /// own.
    pub fn read_from_disk(filename: &str) -> Result<Self> {
        Self::read_from_path(&cache_file_path(filename)?)
    }

    /// Reads a cache from the platform location with an explicit clock and
    /// configuration.
    pub fn read_from_disk_with(
        filename: &str,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Result<Self> {
        Self::read_from_path_with(&cache_file_path(filename)?, clock, config)
    }

    /// Reads a cache from an explicit file path with the default
    /// configuration and system clock.
    pub fn read_from_path(path: &Path) -> Result<Self> {
        Self::read_from_path_with(path, Arc::new(SystemClock), CacheConfig::default())
    }

    /// Reads a cache from an explicit file path with an explicit clock and
    /// configuration.
    ///
    /// Every record passes through the normal insert path, so entries get a
    /// fresh lifespan and the configured limits apply while loading.
    pub fn read_from_path_with(
        path: &Path,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Result<Self> {
        let data = fs::read(path)?;
        let records: Vec<PersistedEntry<K, V>> =
            serde_json::from_slice(&data).map_err(CacheError::Decode)?;

        let mut cache = Cache::with_clock(clock, config);
        let count = records.len();
        for record in records {
            cache.insert_with_cost(record.key, record.value, record.cost);
        }

        info!(path = %path.display(), entries = count, "cache loaded from disk");
        Ok(cache)
    }
}
