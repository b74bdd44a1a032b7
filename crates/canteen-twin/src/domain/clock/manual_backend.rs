//! Manual Clock Backend
//!
//! # Deterministic Time
//!
//! The digital twin must replay physical scenarios ("eight presses, 300 ms
//! apart") without waiting in real time. `ManualClock` is a plain atomic
//! counter that only moves when told to:
//!
//! - `advance(ms)` / `set(ms)` are driven by the test harness
//! - `sleep(d)` advances virtual time by `d` and returns immediately, so a
//!   role's cooldown is observable as elapsed time rather than as a stall
//! - `park(d)` does the same: a bounded wait with nothing to wake it runs to
//!   its deadline in virtual time, so timer-driven roles fire without a
//!   real-time stall
//!
//! The counter is an `AtomicU64`, so the clock is as safe to read from the
//! simulated interrupt path as the production one.

use super::backend::{millis_ceil, BootMillis, MonotonicClock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Virtual monotonic clock advanced explicitly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock reading `ms`.
    pub fn starting_at(ms: BootMillis) -> Self {
        Self {
            now_ms: AtomicU64::new(ms),
        }
    }

    /// Move time forward by `ms`, returning the new reading.
    pub fn advance(&self, ms: BootMillis) -> BootMillis {
        self.now_ms.fetch_add(ms, Ordering::AcqRel) + ms
    }

    /// Jump to `ms`. Ignored if it would move time backwards.
    pub fn set(&self, ms: BootMillis) {
        self.now_ms.fetch_max(ms, Ordering::AcqRel);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> BootMillis {
        self.now_ms.load(Ordering::Acquire)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(millis_ceil(duration));
    }

    fn park(&self, timeout: Duration) {
        self.advance(millis_ceil(timeout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.advance(300), 300);
        assert_eq!(clock.now_ms(), 300);
    }

    #[test]
    fn test_manual_clock_never_moves_backwards() {
        let clock = ManualClock::starting_at(1_000);
        clock.set(500);
        assert_eq!(clock.now_ms(), 1_000);
        clock.set(1_200);
        assert_eq!(clock.now_ms(), 1_200);
    }

    #[test]
    fn test_manual_clock_sleep_is_virtual() {
        let clock = ManualClock::new();
        clock.sleep(Duration::from_millis(150));
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn test_manual_clock_park_runs_to_deadline() {
        let clock = ManualClock::starting_at(40);
        clock.park(Duration::from_millis(1_000));
        assert_eq!(clock.now_ms(), 1_040);
    }
}
