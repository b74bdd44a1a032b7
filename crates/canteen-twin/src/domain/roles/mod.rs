//! Worker Roles
//!
//! Each role is a long-lived loop bound to one responsibility:
//!
//! ```text
//!            event consumed / timer due
//!  ┌─────────┐ ───────────────────────► ┌────────┐
//!  │ Waiting │                          │ Acting │  pool op + refresh
//!  └─────────┘ ◄─────────────────────── └────────┘
//!       ▲        always, then cooldown
//!       └── wait timed out: re-check, wait again
//!
//! Waits and cooldowns run on the context clock and end early once the
//! shutdown signal is raised.
//! ```
//!
//! | Role     | Pool operation   | On failure          |
//! |----------|------------------|---------------------|
//! | Entrance | `try_acquire`    | dropped, no effect  |
//! | Exit     | `release`        | dropped, no effect  |
//! | Reset    | `reset_to_full`  | cannot fail         |
//!
//! Every action is followed by a surface refresh, successful or not, so
//! the display always shows ground truth.

mod types;
mod worker;

pub use types::{ActionResult, RoleKind, RoleState, RoleStateCell, StepOutcome, Trigger, Wake};
pub use worker::{ShutdownSignal, WorkerRole};
