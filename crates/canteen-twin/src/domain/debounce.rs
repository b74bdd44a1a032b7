//! Edge Debouncing
//!
//! Mechanical buttons bounce: one press produces a burst of edges over a few
//! milliseconds. `DebounceFilter` is a per-line time gate that lets the first
//! edge through and rejects every following edge until the window has
//! strictly elapsed since the last *accepted* one.
//!
//! The filter runs in interrupt context. It holds no lock and never
//! allocates; the only state is one `AtomicU64` updated with
//! compare-exchange.

use super::clock::BootMillis;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Minimum spacing between two accepted edges on one line.
pub const DEBOUNCE_WINDOW_MS: u64 = 270;

/// Marker for "no edge accepted yet".
const NEVER: u64 = u64::MAX;

/// Lock-free per-line time gate.
#[derive(Debug)]
pub struct DebounceFilter {
    window_ms: u64,
    last_accepted: AtomicU64,
}

impl DebounceFilter {
    /// Create a filter with the given window.
    pub fn new(window: Duration) -> Self {
        Self::with_window_ms(window.as_millis() as u64)
    }

    /// Create a filter with a window in milliseconds.
    pub const fn with_window_ms(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted: AtomicU64::new(NEVER),
        }
    }

    /// Window length in milliseconds.
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Timestamp of the last accepted edge, if any.
    pub fn last_accepted(&self) -> Option<BootMillis> {
        match self.last_accepted.load(Ordering::Acquire) {
            NEVER => None,
            ts => Some(ts),
        }
    }

    /// Decide whether an edge observed at `now` is a real press.
    ///
    /// Returns `true` and records `now` iff `now - last > window`, or if no
    /// edge has been accepted yet.
    pub fn accept(&self, now: BootMillis) -> bool {
        let mut last = self.last_accepted.load(Ordering::Acquire);
        loop {
            if last != NEVER && now.saturating_sub(last) <= self.window_ms {
                return false;
            }
            match self.last_accepted.compare_exchange_weak(
                last,
                now,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for DebounceFilter {
    fn default() -> Self {
        Self::with_window_ms(DEBOUNCE_WINDOW_MS)
    }
}


#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Two accepted edges are always more than one window apart.
    #[kani::proof]
    fn proof_accepted_edges_spaced() {
        let filter = DebounceFilter::default();
        let t0: u64 = kani::any();
        let dt: u64 = kani::any();
        kani::assume(t0 < u64::MAX / 2);
        kani::assume(dt < u64::MAX / 2);

        kani::assert(filter.accept(t0), "first edge is accepted");
        if filter.accept(t0 + dt) {
            kani::assert(dt > DEBOUNCE_WINDOW_MS, "accepted edges respect the window");
        }
    }
}
