//! Interrupt Dispatcher
//!
//! # Architecture
//!
//! All monitored lines share one interrupt vector. The dispatcher
//! demultiplexes by originating line and runs that line's private
//! filter/channel pair:
//!
//! ```text
//! edge(line, now)
//!     │
//!     ├─ line 5  ──► DebounceFilter ──► EdgeEventChannel ──► Entrance
//!     ├─ line 6  ──► DebounceFilter ──► EdgeEventChannel ──► Exit
//!     └─ line 22 ──► DebounceFilter ──► EdgeEventChannel ──► Reset
//! ```
//!
//! Bindings are fixed at start-up. After that the table is only read, so
//! `on_edge` needs no lock: a linear scan over a handful of entries, one
//! CAS in the filter, one swap in the channel, and relaxed counter bumps.
//! Nothing here logs or allocates.

use super::channel::{EdgeEventChannel, PostOutcome};
use super::clock::BootMillis;
use super::config::ConfigError;
use super::debounce::DebounceFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Input line identifier (GPIO number on the board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u8);

impl LineId {
    /// Button A, wired to the entrance role.
    pub const ENTRANCE: Self = Self(5);
    /// Button B, wired to the exit role.
    pub const EXIT: Self = Self(6);
    /// Joystick push switch, wired to the reset role.
    pub const RESET: Self = Self(22);

    /// Create a line identifier.
    pub const fn new(gpio: u8) -> Self {
        Self(gpio)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gpio{}", self.0)
    }
}

/// What happened to one hardware edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Accepted and queued for the role
    Posted,
    /// Accepted, but an event was already pending
    Coalesced,
    /// Rejected as contact bounce
    Debounced,
    /// No binding for this line
    UnknownLine,
}

/// Counters for one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Edges that passed the debounce filter
    pub accepted: u64,
    /// Edges rejected as bounce
    pub rejected: u64,
    /// Accepted edges merged into a pending event
    pub coalesced: u64,
}

#[derive(Debug)]
struct LineBinding {
    line: LineId,
    filter: DebounceFilter,
    channel: Arc<EdgeEventChannel>,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

/// Shared-vector edge demultiplexer.
#[derive(Debug, Default)]
pub struct InterruptDispatcher {
    bindings: Vec<LineBinding>,
    unknown: AtomicU64,
}

impl InterruptDispatcher {
    /// Create a dispatcher with no lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `line` to `channel` with its own debounce window.
    ///
    /// # Errors
    /// `ConfigError::DuplicateLine` if the line is already bound.
    pub fn bind(
        &mut self,
        line: LineId,
        window_ms: u64,
        channel: Arc<EdgeEventChannel>,
    ) -> Result<(), ConfigError> {
        if self.binding(line).is_some() {
            return Err(ConfigError::DuplicateLine(line));
        }
        self.bindings.push(LineBinding {
            line,
            filter: DebounceFilter::with_window_ms(window_ms),
            channel,
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        });
        Ok(())
    }

    /// Handle one edge on `line` observed at `now`. Interrupt-safe.
    pub fn on_edge(&self, line: LineId, now: BootMillis) -> DispatchOutcome {
        let Some(binding) = self.binding(line) else {
            self.unknown.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::UnknownLine;
        };

        if !binding.filter.accept(now) {
            binding.rejected.fetch_add(1, Ordering::Relaxed);
            return DispatchOutcome::Debounced;
        }

        binding.accepted.fetch_add(1, Ordering::Relaxed);
        match binding.channel.post() {
            PostOutcome::Posted => DispatchOutcome::Posted,
            PostOutcome::Coalesced => DispatchOutcome::Coalesced,
        }
    }

    /// Bound lines in binding order.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.bindings.iter().map(|b| b.line)
    }

    /// Channel bound to `line`.
    pub fn channel(&self, line: LineId) -> Option<&Arc<EdgeEventChannel>> {
        self.binding(line).map(|b| &b.channel)
    }

    /// Counters for `line`.
    pub fn stats(&self, line: LineId) -> Option<LineStats> {
        self.binding(line).map(|b| LineStats {
            accepted: b.accepted.load(Ordering::Relaxed),
            rejected: b.rejected.load(Ordering::Relaxed),
            coalesced: b.channel.coalesced_count(),
        })
    }

    /// Edges seen on lines with no binding.
    pub fn unknown_edges(&self) -> u64 {
        self.unknown.load(Ordering::Relaxed)
    }

    fn binding(&self, line: LineId) -> Option<&LineBinding> {
        self.bindings.iter().find(|b| b.line == line)
    }
}
