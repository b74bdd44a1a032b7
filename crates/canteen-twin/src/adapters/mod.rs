//! Adapters Layer - Ports & Adapters Pattern
//!
//! Implementations of the collaborator ports the domain talks to.
//!
//! # Hexagonal Architecture
//! - Inbound adapters: edges → Domain (`SimulatedInput`)
//! - Outbound adapters: Domain → output (`RecordingDisplay`,
//!   `RecordingIndicator`, `TerminalDisplay`, `TerminalIndicator`)
//! - `SimulatedBoard` wires the fakes around a deterministic dispenser

pub mod board;
pub mod input;
pub mod recording;
pub mod terminal;

// Re-exports
pub use board::{SimulatedBoard, TwinDispenser};
pub use input::SimulatedInput;
pub use recording::{DisplayCall, RecordingDisplay, RecordingIndicator};
pub use terminal::{led_color, TerminalDisplay, TerminalIndicator};
