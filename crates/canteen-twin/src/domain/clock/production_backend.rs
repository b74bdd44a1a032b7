//! Production Clock Backend
//!
//! # Design
//! Wraps `std::time::Instant`, which is monotonic on every supported host.
//! The epoch is captured at construction and plays the role of "boot".

use super::backend::{BootMillis, MonotonicClock};
use std::time::{Duration, Instant};

/// Wall-clock backed monotonic clock for the threaded runtime.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    boot: Instant,
}

impl SystemClock {
    /// Create a clock whose zero is "now".
    pub fn new() -> Self {
        Self {
            boot: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> BootMillis {
        // u64 milliseconds covers ~584 million years of uptime
        self.boot.elapsed().as_millis() as BootMillis
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn park(&self, timeout: Duration) {
        if !timeout.is_zero() {
            std::thread::park_timeout(timeout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let t0 = clock.now_ms();
        let t1 = clock.now_ms();
        assert!(t1 >= t0);
    }

    #[test]
    fn test_system_clock_sleep_advances() {
        let clock = SystemClock::new();
        let t0 = clock.now_ms();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.now_ms() >= t0 + 5);
    }

    #[test]
    fn test_system_clock_park_ends_on_unpark() {
        let clock = SystemClock::new();
        let parked = std::thread::spawn(move || {
            let start = Instant::now();
            clock.park(Duration::from_secs(10));
            start.elapsed()
        });
        std::thread::sleep(Duration::from_millis(20));
        parked.thread().unpark();
        assert!(parked.join().unwrap() < Duration::from_secs(5));
    }
}
