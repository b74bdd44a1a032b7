//! Output Surface - Display + Indicator Under One Lock
//!
//! # Mutual Exclusion Discipline
//!
//! ```text
//! Entrance ─┐
//! Exit     ─┼─► OutputSurface::refresh ──► [ Mutex ] ──► DisplayDriver
//! Reset    ─┘                                  │         IndicatorDriver
//!                                              └── held for the whole frame
//! ```
//!
//! - One lock, never nested, always released inside the same call.
//! - The lock is held across the driver calls so two roles can never
//!   interleave half-written frames.
//! - Interrupt context never touches the surface.

mod output;
mod ports;

pub use output::{OutputSurface, SurfaceFrame};
pub use ports::{DisplayDriver, IndicatorDriver, GLYPH_WIDTH, PANEL_HEIGHT, PANEL_WIDTH};
