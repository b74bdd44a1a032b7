//! Input Subsystem Port
//!
//! Line configuration and edge-callback registration belong to the board's
//! GPIO layer. The dispenser uses them exactly once per monitored line at
//! start-up; after that the callback is the only path from hardware into
//! the core.

use super::dispatcher::LineId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Edge polarity that raises the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// High-to-low (button pressed against a pull-up)
    #[default]
    Falling,
    /// Low-to-high
    Rising,
}

/// Callback invoked in interrupt context with the originating line.
pub type EdgeCallback = Arc<dyn Fn(LineId) + Send + Sync>;

/// GPIO layer as seen by the dispenser.
pub trait InputSubsystem {
    /// Configure `line` as a pulled-up input interrupting on `edge`.
    fn configure_line(&mut self, line: LineId, edge: EdgeKind);

    /// Route interrupts on `line` to `callback`.
    fn register_edge_callback(&mut self, line: LineId, callback: EdgeCallback);
}
