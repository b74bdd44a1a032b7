//! Canteen Token Dispenser Twin
//!
//! # Overview
//!
//! `canteen-twin` is the core of a cafeteria token dispenser: a bounded
//! pool of tokens taken at the entrance, returned at the exit, and refilled
//! by a supervisor. Button edges arrive through one shared interrupt
//! vector, are debounced per line, and wake one worker role each. Every
//! action ends with a redraw of the display and indicator under a single
//! lock.
//!
//! The same core runs two ways:
//!
//! - **Twin**: `ManualClock` + `SimulatedBoard`, deterministic, driven
//!   step by step from tests.
//! - **Runtime**: `SystemClock` + one OS thread per role, driven by real
//!   edges from the CLI or a GPIO adapter.
//!
//! # Layers
//!
//! - **Domain**: pool, debounce, channels, dispatcher, roles, surface
//! - **Infrastructure**: TOML config loading, threaded runtime
//! - **Adapters**: recording fakes, simulated board, terminal output
//!
//! # Invariants
//!
//! ## Pool
//! - `0 <= available <= capacity` in every observable state
//! - a failed take or return has no effect
//!
//! ## Input
//! - edges on one line closer than the window are dropped
//! - at most one pending event per line; extra posts coalesce
//!
//! ## Output
//! - frames are never interleaved
//! - every action is followed by a refresh, success or not
//!
//! # Usage
//!
//! ```rust
//! use canteen_twin::adapters::SimulatedBoard;
//! use canteen_twin::domain::{IndicatorLevel, RoleKind};
//!
//! let mut board = SimulatedBoard::new().unwrap();
//! board.press(RoleKind::Entrance);
//! board.step(RoleKind::Entrance);
//!
//! assert_eq!(board.available(), 7);
//! assert_eq!(board.indicator().last(), Some(IndicatorLevel::Normal));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod adapters;
pub mod domain;
pub mod infrastructure;

pub use domain::{
    Dispenser, DispenserBuilder, DispenserConfig, IndicatorLevel, LineId, RoleKind, SharedPool,
    TokenPool,
};
pub use infrastructure::{DispenserRuntime, RuntimeHandle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
