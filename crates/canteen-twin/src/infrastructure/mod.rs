//! Infrastructure Layer - Host Integration
//!
//! Concrete pieces that depend on the host rather than on the board.
//!
//! # Responsibilities
//! - Configuration files (TOML via `toml`)
//! - Role threads and process-level shutdown

pub mod config;
pub mod runtime;

// Re-exports
pub use config::DEFAULT_CONFIG_FILE;
pub use runtime::{DispenserRuntime, RoleReport, RuntimeError, RuntimeHandle};
