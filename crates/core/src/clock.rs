//! Clock abstraction for testable time handling.
//!
//! The watcher's failure-restart delay and the log follower's poll tick
//! are both real-time waits owned by `tokio::time`, but `started_at`
//! capture and status derivation only need "what second is it", which
//! this trait isolates so tests can pin it.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current wall-clock time, expressed in unix seconds.
pub trait Clock: Clone + Send + Sync + 'static {
    fn unix_seconds(&self) -> i64;
}

/// The real system clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

/// A clock with a settable value, for deterministic tests.
#[derive(Clone)]
pub struct FakeClock {
    seconds: Arc<AtomicI64>,
}

impl FakeClock {
    pub fn new(start: i64) -> Self {
        Self {
            seconds: Arc::new(AtomicI64::new(start)),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.seconds.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, value: i64) {
        self.seconds.store(value, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl Clock for FakeClock {
    fn unix_seconds(&self) -> i64 {
        self.seconds.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
