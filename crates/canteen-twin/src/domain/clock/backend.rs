//! Clock Backend Abstraction
//!
//! The dispenser only needs two things from a time source: a monotonic
//! millisecond reading and a way to let a worker role pause between
//! iterations. Both backends implement this trait; callers are generic over
//! it so the choice costs nothing at runtime.

use std::sync::Arc;
use std::time::Duration;

/// Milliseconds elapsed since the board booted.
pub type BootMillis = u64;

/// Monotonic millisecond time source.
///
/// Implementations must be callable from interrupt context: `now_ms` may not
/// block or allocate.
pub trait MonotonicClock: Send + Sync {
    /// Current time in milliseconds since boot.
    fn now_ms(&self) -> BootMillis;

    /// Suspend the calling role for `duration`.
    ///
    /// Task context only. Never called while the output lock is held.
    fn sleep(&self, duration: Duration);

    /// Block the calling thread for at most `timeout`.
    ///
    /// Unlike `sleep`, this may return early: an `unpark` of the calling
    /// thread ends it on hosts with real threads. Callers loop on their own
    /// condition and re-read `now_ms` to decide whether to park again.
    fn park(&self, timeout: Duration);
}

/// `duration` in whole milliseconds, rounded up and saturating.
pub fn millis_ceil(duration: Duration) -> BootMillis {
    let whole = BootMillis::try_from(duration.as_millis()).unwrap_or(BootMillis::MAX);
    if duration.subsec_nanos() % 1_000_000 == 0 {
        whole
    } else {
        whole.saturating_add(1)
    }
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for Arc<C> {
    #[inline]
    fn now_ms(&self) -> BootMillis {
        (**self).now_ms()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }

    #[inline]
    fn park(&self, timeout: Duration) {
        (**self).park(timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_ceil_rounds_up() {
        assert_eq!(millis_ceil(Duration::ZERO), 0);
        assert_eq!(millis_ceil(Duration::from_millis(270)), 270);
        assert_eq!(millis_ceil(Duration::from_micros(500)), 1);
        assert_eq!(millis_ceil(Duration::from_micros(1_500)), 2);
        assert_eq!(millis_ceil(Duration::MAX), BootMillis::MAX);
    }
}
