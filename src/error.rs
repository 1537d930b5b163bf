//! Error types for the cache library
//!
//! Only the persistence path can fail; every in-memory operation is total and
//! reports absence as `None`.

use thiserror::Error;

// == Cache Error Enum ==
/// Failures surfaced by [`save_to_disk`](crate::Cache::save_to_disk) and
/// [`read_from_disk`](crate::Cache::read_from_disk).
///
/// The variants are deliberately distinct: callers routinely want to treat a
/// missing cache directory (nothing to load) differently from a corrupt file.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The platform-specific cache directory could not be resolved
    #[error("No cache directory available on this platform")]
    CacheDirUnavailable,

    /// Reading or writing the cache file failed
    #[error("Cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The cache contents could not be encoded
    #[error("Cache encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored bytes did not match the expected format
    #[error("Cache decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for persistence operations.
pub type Result<T> = std::result::Result<T, CacheError>;
