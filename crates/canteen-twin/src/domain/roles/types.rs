//! Worker Role Types

use crate::domain::pool::PoolError;
use crate::domain::surface::SurfaceFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Responsibility of a worker role over the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Consumes one token per event
    Entrance,
    /// Returns one token per event
    Exit,
    /// Refills the pool
    Reset,
}

impl RoleKind {
    /// Pause after each action when none is configured.
    pub const fn default_cooldown(self) -> Duration {
        match self {
            Self::Entrance | Self::Exit => Duration::from_millis(150),
            Self::Reset => Duration::from_millis(1_000),
        }
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entrance => "entrance",
            Self::Exit => "exit",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What wakes a role.
///
/// Boards without a dedicated reset button run the reset role on a timer;
/// `Both` accepts either source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Trigger {
    /// Debounced edges on the role's line
    #[default]
    Edge,
    /// Fixed period, no input line
    Timer {
        /// Period in milliseconds
        period_ms: u64,
    },
    /// Edges and a fixed period
    Both {
        /// Period in milliseconds
        period_ms: u64,
    },
}

impl Trigger {
    /// Whether the role listens on an input line.
    pub const fn uses_edges(self) -> bool {
        matches!(self, Self::Edge | Self::Both { .. })
    }

    /// Timer period, if any.
    pub const fn period_ms(self) -> Option<u64> {
        match self {
            Self::Edge => None,
            Self::Timer { period_ms } | Self::Both { period_ms } => Some(period_ms),
        }
    }
}

/// Role loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RoleState {
    /// Blocked on the event channel (resting state)
    Waiting = 0,
    /// Running the pool operation and refresh
    Acting = 1,
}

/// Loop state published by a role, readable from any thread.
#[derive(Debug, Clone, Default)]
pub struct RoleStateCell(Arc<AtomicU8>);

impl RoleStateCell {
    /// Current state.
    pub fn load(&self) -> RoleState {
        if self.0.load(Ordering::Acquire) == RoleState::Acting as u8 {
            RoleState::Acting
        } else {
            RoleState::Waiting
        }
    }

    pub(crate) fn store(&self, state: RoleState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Why a role woke up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Consumed an edge event
    Edge,
    /// Timer period elapsed
    Timer,
}

/// Pool-level result of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    /// A token was taken
    Acquired {
        /// Tokens left afterwards
        remaining: u32,
    },
    /// A token came back
    Released {
        /// Tokens available afterwards
        available: u32,
    },
    /// The pool was refilled
    Refilled {
        /// Count before the reset
        previous: u32,
    },
    /// The request was dropped
    Rejected(PoolError),
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The wait timed out with nothing to do
    Idle,
    /// The role acted and refreshed the surface
    Acted {
        /// Wake source
        wake: Wake,
        /// Pool result
        result: ActionResult,
        /// Frame written by the refresh
        frame: SurfaceFrame,
    },
}

impl StepOutcome {
    /// Whether the role acted.
    pub const fn acted(&self) -> bool {
        matches!(self, Self::Acted { .. })
    }
}
