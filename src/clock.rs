//! Time Source Module
//!
//! Trait-based clock abstraction so entry lifespans can be tested
//! deterministically without real time passing.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

// == Clock Trait ==
/// A source of wall-clock time, expressed as milliseconds since the Unix epoch.
///
/// The cache stores one `Arc<dyn Clock>` and consults it on every insert and
/// read; derived caches (`map`, `compact_map`) share the same instance.
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Production clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// == Mock Clock ==
/// Manually advanced clock for deterministic tests.
///
/// Clones share the same underlying time, so a clock handed to a cache can
/// still be advanced from the test body.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ms: Arc<Mutex<u64>>,
}

impl MockClock {
    /// Creates a mock clock starting at `t = 0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock clock starting at the given epoch-millisecond instant.
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(Mutex::new(now_ms)),
        }
    }

    /// Advances the clock by `duration` without real time passing.
    pub fn advance(&self, duration: Duration) {
        *self.now_ms.lock() += duration.as_millis() as u64;
    }

    /// Sets the clock to an absolute epoch-millisecond instant.
    pub fn set_ms(&self, now_ms: u64) {
        *self.now_ms.lock() = now_ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        *self.now_ms.lock()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_positive() {
        let clock = SystemClock;
        assert!(clock.now_ms() > 0);
    }

    #[test]
    fn test_mock_clock_starts_at_zero() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now_ms(), 5_000);

        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now_ms(), 5_500);
    }

    #[test]
    fn test_mock_clock_set_ms() {
        let clock = MockClock::starting_at(1_000);
        clock.set_ms(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::new();
        let handle = clock.clone();

        clock.advance(Duration::from_secs(1));
        assert_eq!(handle.now_ms(), 1_000);
    }
}
