//! Simulated Board - Deterministic Digital Twin
//!
//! # Wiring
//!
//! ```text
//! press(kind) ──► SimulatedInput ──► callback ──► InterruptDispatcher
//!                                                      │
//!   ManualClock ◄── advance(ms) / role cooldowns       ▼
//!                                               EdgeEventChannel
//!                                                      │
//! step(kind) ───────────────────────────────────► WorkerRole ──► pool
//!                                                      │
//!                                 RecordingDisplay ◄───┴──► RecordingIndicator
//! ```
//!
//! Nothing runs on its own. The test decides when edges arrive, when time
//! moves and when each role takes its turn, so every scenario replays
//! identically.

use super::input::SimulatedInput;
use super::recording::{RecordingDisplay, RecordingIndicator};
use crate::domain::clock::{BootMillis, ManualClock, MonotonicClock};
use crate::domain::config::{ConfigError, DispenserConfig};
use crate::domain::context::{Dispenser, DispenserBuilder};
use crate::domain::dispatcher::{InterruptDispatcher, LineId};
use crate::domain::pool::SharedPool;
use crate::domain::roles::{RoleKind, StepOutcome};
use std::sync::Arc;
use std::time::Duration;

/// Dispenser type driven by the twin.
pub type TwinDispenser = Dispenser<Arc<ManualClock>, RecordingDisplay, RecordingIndicator>;

/// Upper bound on rounds in `drain`, well above anything a finite input
/// sequence can produce.
const MAX_DRAIN_ROUNDS: usize = 1_024;

/// Dispenser on virtual time with simulated buttons and recording outputs.
pub struct SimulatedBoard {
    clock: Arc<ManualClock>,
    input: SimulatedInput,
    display: RecordingDisplay,
    indicator: RecordingIndicator,
    dispenser: TwinDispenser,
}

impl SimulatedBoard {
    /// Board with the default three-role configuration.
    ///
    /// # Errors
    /// Never for the default configuration; kept fallible for symmetry with
    /// `from_config`.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(DispenserConfig::default())
    }

    /// Board built from `config`.
    ///
    /// # Errors
    /// `ConfigError` if the configuration does not validate.
    pub fn from_config(config: DispenserConfig) -> Result<Self, ConfigError> {
        let clock = Arc::new(ManualClock::new());
        let display = RecordingDisplay::new();
        let indicator = RecordingIndicator::new();
        let dispenser = DispenserBuilder::from_config(config).build(
            Arc::clone(&clock),
            display.clone(),
            indicator.clone(),
        )?;

        let mut input = SimulatedInput::new();
        dispenser.attach_input(&mut input);

        Ok(Self {
            clock,
            input,
            display,
            indicator,
            dispenser,
        })
    }

    /// Press the button wired to `kind` at the current instant.
    ///
    /// Returns `false` if no edge-triggered role of that kind exists.
    pub fn press(&self, kind: RoleKind) -> bool {
        self.dispenser
            .line_of(kind)
            .is_some_and(|line| self.input.inject(line))
    }

    /// Raise an edge on an arbitrary line.
    pub fn press_line(&self, line: LineId) -> bool {
        self.input.inject(line)
    }

    /// Press `kind` once per gap, advancing time by the gap first.
    /// Models contact bounce when the gaps are shorter than the window.
    pub fn bounce(&self, kind: RoleKind, gaps_ms: &[u64]) -> usize {
        self.dispenser
            .line_of(kind)
            .map_or(0, |line| self.input.inject_burst(line, &self.clock, gaps_ms))
    }

    /// Let `ms` of virtual time pass.
    pub fn advance(&self, ms: BootMillis) -> BootMillis {
        self.clock.advance(ms)
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> BootMillis {
        self.clock.now_ms()
    }

    /// Give the first role of `kind` one non-blocking turn.
    pub fn step(&mut self, kind: RoleKind) -> StepOutcome {
        self.dispenser
            .step_role(kind, Duration::ZERO)
            .unwrap_or(StepOutcome::Idle)
    }

    /// Step every role round-robin until a full round is idle. Returns the
    /// outcomes of the turns that acted.
    pub fn drain(&mut self) -> Vec<StepOutcome> {
        let kinds: Vec<RoleKind> = self.dispenser.roles().iter().map(|r| r.kind()).collect();
        let mut acted = Vec::new();
        for _ in 0..MAX_DRAIN_ROUNDS {
            let before = acted.len();
            for &kind in &kinds {
                let outcome = self.step(kind);
                if outcome.acted() {
                    acted.push(outcome);
                }
            }
            if acted.len() == before {
                break;
            }
        }
        acted
    }

    /// Tokens currently available.
    pub fn available(&self) -> u32 {
        self.pool().current_count()
    }

    /// The token pool.
    pub fn pool(&self) -> &SharedPool {
        self.dispenser.context().pool()
    }

    /// Edge dispatcher.
    pub fn dispatcher(&self) -> &InterruptDispatcher {
        self.dispenser.dispatcher()
    }

    /// Virtual clock.
    pub fn clock(&self) -> &Arc<ManualClock> {
        &self.clock
    }

    /// Simulated GPIO layer.
    pub const fn input(&self) -> &SimulatedInput {
        &self.input
    }

    /// Display recorder.
    pub const fn display(&self) -> &RecordingDisplay {
        &self.display
    }

    /// Indicator recorder.
    pub const fn indicator(&self) -> &RecordingIndicator {
        &self.indicator
    }

    /// Underlying dispenser.
    pub const fn dispenser(&self) -> &TwinDispenser {
        &self.dispenser
    }

    /// Underlying dispenser, mutably.
    pub fn dispenser_mut(&mut self) -> &mut TwinDispenser {
        &mut self.dispenser
    }
}
