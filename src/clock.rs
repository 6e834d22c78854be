//! Clock abstraction for supporting both real and manually advanced time.
//!
//! The orchestrator only ever asks "what time is it now" on a monotonic
//! scale; deadlines are computed from that. Production uses the system
//! monotonic clock, while tests drive a manual clock forward in controlled
//! steps to exercise timer-dependent behavior without real waiting.

use std::time::Instant;

/// Trait for abstracting monotonic time queries.
pub trait Clock: Send + Sync {
    /// Get the current monotonic time.
    fn now(&self) -> Instant;
}

/// Real clock backed by the system monotonic clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Time stands still until `advance` is called, so a test can arm timers,
/// step past their deadlines, and observe exactly which ones fire.
#[cfg(any(test, feature = "testing-support"))]
pub struct ManualClock {
    now: std::sync::Mutex<Instant>,
}

#[cfg(any(test, feature = "testing-support"))]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: std::time::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}
