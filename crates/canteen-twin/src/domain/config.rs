//! Dispenser Configuration
//!
//! Which roles run, on which lines, with which cooldowns and triggers is a
//! configuration choice. One validated `DispenserConfig` describes the whole
//! board; the builder turns it into a running `Dispenser`.
//!
//! ```toml
//! [pool]
//! capacity = 8
//!
//! [debounce]
//! window_ms = 270
//!
//! [[roles]]
//! kind = "entrance"
//! line = 5
//!
//! [[roles]]
//! kind = "reset"
//! cooldown_ms = 1000
//! trigger = { mode = "timer", period_ms = 60000 }
//! ```

use super::debounce::DEBOUNCE_WINDOW_MS;
use super::dispatcher::LineId;
use super::pool::DEFAULT_CAPACITY;
use super::roles::{RoleKind, Trigger};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration problems, detected before anything starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Capacity of zero
    #[error("pool capacity must be at least 1")]
    InvalidCapacity,

    /// No roles configured
    #[error("at least one worker role must be configured")]
    NoRoles,

    /// Two roles share a line
    #[error("line {0} is bound to more than one role")]
    DuplicateLine(LineId),

    /// Edge-triggered role without a line
    #[error("{kind} role is edge-triggered but has no input line")]
    MissingLine {
        /// Offending role
        kind: RoleKind,
    },

    /// Timer-only role with a line
    #[error("{kind} role is timer-triggered but has input line {line}")]
    UnexpectedLine {
        /// Offending role
        kind: RoleKind,
        /// Line that would never be read
        line: LineId,
    },

    /// Timer trigger on a role other than reset
    #[error("{kind} role cannot be timer-triggered")]
    TimerNotSupported {
        /// Offending role
        kind: RoleKind,
    },

    /// Timer period of zero
    #[error("timer period of {kind} role must be non-zero")]
    InvalidTimerPeriod {
        /// Offending role
        kind: RoleKind,
    },

    /// Config file could not be read or written
    #[error("config file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema
    #[error("invalid config: {message}")]
    Parse {
        /// Parser message
        message: String,
    },
}

/// Complete board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispenserConfig {
    /// Token pool
    pub pool: PoolConfig,
    /// Edge debouncing
    pub debounce: DebounceConfig,
    /// Host runtime tuning
    pub runtime: RuntimeConfig,
    /// Worker roles, one thread each
    pub roles: Vec<RoleConfig>,
}

/// Token pool section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of tokens
    pub capacity: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Debounce section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Minimum spacing between accepted edges, per line
    pub window_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_ms: DEBOUNCE_WINDOW_MS,
        }
    }
}

/// Runtime section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Upper bound on one blocking wait; roles re-check shutdown this often
    pub idle_wait_ms: u64,
}

impl RuntimeConfig {
    /// Idle wait as a duration.
    pub const fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { idle_wait_ms: 100 }
    }
}

/// One worker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Responsibility
    pub kind: RoleKind,
    /// Input line; required unless timer-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineId>,
    /// Pause after each action; defaults per kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<u64>,
    /// Wake source
    #[serde(default)]
    pub trigger: Trigger,
}

impl RoleConfig {
    /// Edge-triggered role on `line` with the default cooldown.
    pub const fn edge(kind: RoleKind, line: LineId) -> Self {
        Self {
            kind,
            line: Some(line),
            cooldown_ms: None,
            trigger: Trigger::Edge,
        }
    }

    /// Timer-only reset role.
    pub const fn timed_reset(period_ms: u64) -> Self {
        Self {
            kind: RoleKind::Reset,
            line: None,
            cooldown_ms: None,
            trigger: Trigger::Timer { period_ms },
        }
    }

    /// Override the cooldown.
    #[must_use]
    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = Some(cooldown_ms);
        self
    }

    /// Effective cooldown.
    pub fn cooldown(&self) -> Duration {
        self.cooldown_ms
            .map_or_else(|| self.kind.default_cooldown(), Duration::from_millis)
    }
}

impl Default for DispenserConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            debounce: DebounceConfig::default(),
            runtime: RuntimeConfig::default(),
            roles: vec![
                RoleConfig::edge(RoleKind::Entrance, LineId::ENTRANCE),
                RoleConfig::edge(RoleKind::Exit, LineId::EXIT),
                RoleConfig::edge(RoleKind::Reset, LineId::RESET),
            ],
        }
    }
}

impl DispenserConfig {
    /// Set every role's cooldown to `cooldown_ms`.
    #[must_use]
    pub fn with_uniform_cooldown(mut self, cooldown_ms: u64) -> Self {
        for role in &mut self.roles {
            role.cooldown_ms = Some(cooldown_ms);
        }
        self
    }

    /// Check internal consistency.
    ///
    /// # Errors
    /// The first problem found, as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if self.roles.is_empty() {
            return Err(ConfigError::NoRoles);
        }

        let mut seen = HashSet::new();
        for role in &self.roles {
            let kind = role.kind;
            if let Some(period) = role.trigger.period_ms() {
                if kind != RoleKind::Reset {
                    return Err(ConfigError::TimerNotSupported { kind });
                }
                if period == 0 {
                    return Err(ConfigError::InvalidTimerPeriod { kind });
                }
            }
            match (role.trigger.uses_edges(), role.line) {
                (true, None) => return Err(ConfigError::MissingLine { kind }),
                (false, Some(line)) => return Err(ConfigError::UnexpectedLine { kind, line }),
                (true, Some(line)) => {
                    if !seen.insert(line) {
                        return Err(ConfigError::DuplicateLine(line));
                    }
                }
                (false, None) => {}
            }
        }
        Ok(())
    }
}
