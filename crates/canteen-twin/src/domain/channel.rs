//! Edge Event Channel
//!
//! # Semantics
//!
//! A single-slot, coalescing signal between the interrupt path and one
//! worker role:
//!
//! ```text
//!   ISR: post() ──► [ pending: bool ] ──► wait_and_consume() : role thread
//!                    ▲
//!                    └── second post() while pending: no-op (coalesced)
//! ```
//!
//! - `post` is a single atomic swap plus, on the rising transition, an
//!   `unpark` of the bound consumer. It never blocks and never takes a lock.
//! - `wait_and_consume` parks the consumer until the slot is set or the
//!   timeout elapses, then clears the slot atomically. The deadline is
//!   measured on the role's `MonotonicClock`, so a virtual clock runs the
//!   wait out in virtual time.
//! - `wait_and_consume_unless` also gives up as soon as its abort condition
//!   holds; whoever raises the condition unparks the waiting thread.
//!
//! The consumer thread binds itself on its first blocking wait. Because a
//! thread's park token survives an `unpark` that happens before `park`, a
//! post landing between the consumer's last check and its park is never
//! lost. Threads other than the bound consumer fall back to short polling
//! slices.

use crate::domain::clock::{millis_ceil, MonotonicClock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::thread::{self, Thread};
use std::time::Duration;

/// Poll slice used by waiters that are not the bound consumer.
const FOREIGN_POLL: Duration = Duration::from_millis(5);

/// Result of posting an edge event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// The slot was empty; the event is now pending.
    Posted,
    /// An event was already pending; this one merged into it.
    Coalesced,
}

/// Single-slot coalescing event flag.
#[derive(Debug, Default)]
pub struct EdgeEventChannel {
    pending: AtomicBool,
    consumer: OnceLock<Thread>,
    posted: AtomicU64,
    coalesced: AtomicU64,
}

impl EdgeEventChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal one occurrence. Interrupt-safe.
    pub fn post(&self) -> PostOutcome {
        if self.pending.swap(true, Ordering::AcqRel) {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            return PostOutcome::Coalesced;
        }
        self.posted.fetch_add(1, Ordering::Relaxed);
        if let Some(consumer) = self.consumer.get() {
            consumer.unpark();
        }
        PostOutcome::Posted
    }

    /// Consume the pending event without waiting.
    pub fn try_consume(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Block until an event is pending or `timeout` elapses on `clock`.
    ///
    /// Returns `true` if an event was consumed. A timeout is not an error;
    /// callers simply re-check their own state and wait again.
    pub fn wait_and_consume<C>(&self, clock: &C, timeout: Duration) -> bool
    where
        C: MonotonicClock + ?Sized,
    {
        self.wait_and_consume_unless(clock, timeout, || false)
    }

    /// Like `wait_and_consume`, but returns `false` early once `abort`
    /// holds. `abort` is checked before every park.
    pub fn wait_and_consume_unless<C, F>(&self, clock: &C, timeout: Duration, abort: F) -> bool
    where
        C: MonotonicClock + ?Sized,
        F: Fn() -> bool,
    {
        if self.try_consume() {
            return true;
        }
        if timeout.is_zero() {
            return false;
        }

        let me = thread::current();
        let bound = self.consumer.get_or_init(|| me.clone()).id() == me.id();
        let deadline = clock.now_ms().saturating_add(millis_ceil(timeout));

        loop {
            if self.try_consume() {
                return true;
            }
            if abort() {
                return false;
            }
            let now = clock.now_ms();
            if now >= deadline {
                return false;
            }
            let remaining = Duration::from_millis(deadline - now);
            let slice = if bound {
                remaining
            } else {
                remaining.min(FOREIGN_POLL)
            };
            clock.park(slice);
        }
    }

    /// Whether an unconsumed event is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Number of posts that filled an empty slot.
    pub fn posted_count(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }

    /// Number of posts merged into an already pending event.
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::{ManualClock, SystemClock};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_post_then_consume() {
        let channel = EdgeEventChannel::new();
        assert!(!channel.is_pending());
        assert_eq!(channel.post(), PostOutcome::Posted);
        assert!(channel.is_pending());
        assert!(channel.try_consume());
        assert!(!channel.try_consume(), "event is consumed exactly once");
    }

    #[test]
    fn test_second_post_coalesces() {
        let channel = EdgeEventChannel::new();
        assert_eq!(channel.post(), PostOutcome::Posted);
        assert_eq!(channel.post(), PostOutcome::Coalesced);
        assert_eq!(channel.post(), PostOutcome::Coalesced);

        assert!(channel.try_consume());
        assert!(!channel.try_consume());
        assert_eq!(channel.posted_count(), 1);
        assert_eq!(channel.coalesced_count(), 2);
    }

    #[test]
    fn test_wait_times_out_without_event() {
        let channel = EdgeEventChannel::new();
        let clock = SystemClock::new();
        let start = clock.now_ms();
        assert!(!channel.wait_and_consume(&clock, Duration::from_millis(20)));
        assert!(clock.now_ms() >= start + 20);
    }

    #[test]
    fn test_wait_runs_out_in_virtual_time() {
        let channel = EdgeEventChannel::new();
        let clock = ManualClock::starting_at(500);
        let start = Instant::now();

        assert!(!channel.wait_and_consume(&clock, Duration::from_secs(60)));
        assert_eq!(clock.now_ms(), 60_500);
        assert!(start.elapsed() < Duration::from_secs(5), "no real-time stall");
    }

    #[test]
    fn test_abort_ends_wait_early() {
        let channel = Arc::new(EdgeEventChannel::new());
        let stop = Arc::new(AtomicBool::new(false));
        let waiter = {
            let channel = Arc::clone(&channel);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let start = Instant::now();
                let consumed = channel.wait_and_consume_unless(
                    &SystemClock::new(),
                    Duration::from_secs(30),
                    || stop.load(Ordering::Acquire),
                );
                (consumed, start.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        stop.store(true, Ordering::Release);
        waiter.thread().unpark();

        let (consumed, elapsed) = waiter.join().unwrap();
        assert!(!consumed);
        assert!(elapsed < Duration::from_secs(5));
        assert!(!channel.is_pending());
    }

    #[test]
    fn test_zero_timeout_is_non_blocking() {
        let channel = EdgeEventChannel::new();
        let clock = ManualClock::new();
        assert!(!channel.wait_and_consume(&clock, Duration::ZERO));
        channel.post();
        assert!(channel.wait_and_consume(&clock, Duration::ZERO));
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_post_wakes_blocked_consumer() {
        let channel = Arc::new(EdgeEventChannel::new());
        let consumer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.wait_and_consume(&SystemClock::new(), Duration::from_secs(5)))
        };

        thread::sleep(Duration::from_millis(20));
        channel.post();

        assert!(consumer.join().unwrap());
        assert!(!channel.is_pending());
    }
}
