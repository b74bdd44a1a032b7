//! Dispenser Assembly
//!
//! # Ownership
//!
//! There is no global state. Everything the roles share lives in one
//! `DispenserContext`, built once and handed to each role as an `Arc`:
//!
//! ```text
//! Dispenser<C, D, I>
//!   ├─ context: Arc<DispenserContext>     pool + surface + clock
//!   ├─ dispatcher: Arc<InterruptDispatcher>
//!   └─ roles: Vec<WorkerRole>             one per configured role
//! ```
//!
//! The clock, display and indicator are type parameters, so the twin
//! (`ManualClock` + recording fakes) and the host runtime (`SystemClock` +
//! terminal drivers) share one monomorphized code path.

use super::channel::EdgeEventChannel;
use super::clock::MonotonicClock;
use super::config::{ConfigError, DispenserConfig};
use super::dispatcher::{InterruptDispatcher, LineId};
use super::input::{EdgeCallback, EdgeKind, InputSubsystem};
use super::pool::SharedPool;
use super::roles::{RoleKind, StepOutcome, WorkerRole};
use super::surface::{DisplayDriver, IndicatorDriver, OutputSurface, SurfaceFrame};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// State shared by every worker role.
pub struct DispenserContext<C, D, I> {
    pool: SharedPool,
    surface: OutputSurface<D, I>,
    clock: C,
}

impl<C, D, I> DispenserContext<C, D, I>
where
    C: MonotonicClock,
    D: DisplayDriver,
    I: IndicatorDriver,
{
    /// Full pool of `capacity` tokens.
    pub fn new(capacity: u32, surface: OutputSurface<D, I>, clock: C) -> Self {
        Self {
            pool: SharedPool::new(capacity),
            surface,
            clock,
        }
    }

    /// The token pool.
    pub const fn pool(&self) -> &SharedPool {
        &self.pool
    }

    /// The output surface.
    pub const fn surface(&self) -> &OutputSurface<D, I> {
        &self.surface
    }

    /// The time source.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Redraw from the current pool state.
    pub fn refresh(&self) -> SurfaceFrame {
        self.surface.refresh_from(&self.pool)
    }
}

/// Builds a `Dispenser` from a validated configuration.
#[derive(Debug, Clone, Default)]
pub struct DispenserBuilder {
    config: DispenserConfig,
}

impl DispenserBuilder {
    /// Start from the default three-role board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `config`.
    pub const fn from_config(config: DispenserConfig) -> Self {
        Self { config }
    }

    /// Override the pool capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.config.pool.capacity = capacity;
        self
    }

    /// Override the debounce window.
    #[must_use]
    pub fn debounce_window_ms(mut self, window_ms: u64) -> Self {
        self.config.debounce.window_ms = window_ms;
        self
    }

    /// Override every role's cooldown.
    #[must_use]
    pub fn cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.config = self.config.with_uniform_cooldown(cooldown_ms);
        self
    }

    /// Validate, wire channels and roles, and draw the first frame.
    ///
    /// # Errors
    /// Any `ConfigError` from validation or line binding.
    pub fn build<C, D, I>(
        self,
        clock: C,
        display: D,
        indicator: I,
    ) -> Result<Dispenser<C, D, I>, ConfigError>
    where
        C: MonotonicClock,
        D: DisplayDriver,
        I: IndicatorDriver,
    {
        let config = self.config;
        config.validate()?;

        let context = Arc::new(DispenserContext::new(
            config.pool.capacity,
            OutputSurface::new(display, indicator),
            clock,
        ));

        let mut dispatcher = InterruptDispatcher::new();
        let mut roles = Vec::with_capacity(config.roles.len());
        for (index, role) in config.roles.iter().enumerate() {
            let channel = match role.line {
                Some(line) if role.trigger.uses_edges() => {
                    let channel = Arc::new(EdgeEventChannel::new());
                    dispatcher.bind(line, config.debounce.window_ms, Arc::clone(&channel))?;
                    Some(channel)
                }
                _ => None,
            };
            roles.push(WorkerRole::new(role, index, channel, Arc::clone(&context)));
        }

        let frame = context.refresh();
        info!(
            capacity = frame.total,
            roles = roles.len(),
            debounce_ms = config.debounce.window_ms,
            "dispenser assembled"
        );

        Ok(Dispenser {
            context,
            dispatcher: Arc::new(dispatcher),
            roles,
            config,
        })
    }
}

/// Fully wired dispenser: context, dispatcher and roles.
pub struct Dispenser<C, D, I> {
    context: Arc<DispenserContext<C, D, I>>,
    dispatcher: Arc<InterruptDispatcher>,
    roles: Vec<WorkerRole<C, D, I>>,
    config: DispenserConfig,
}

impl<C, D, I> Dispenser<C, D, I>
where
    C: MonotonicClock + 'static,
    D: DisplayDriver + 'static,
    I: IndicatorDriver + 'static,
{
    /// Shared context.
    pub const fn context(&self) -> &Arc<DispenserContext<C, D, I>> {
        &self.context
    }

    /// Edge dispatcher.
    pub const fn dispatcher(&self) -> &Arc<InterruptDispatcher> {
        &self.dispatcher
    }

    /// Configuration the dispenser was built from.
    pub const fn config(&self) -> &DispenserConfig {
        &self.config
    }

    /// Configured roles in order.
    pub fn roles(&self) -> &[WorkerRole<C, D, I>] {
        &self.roles
    }

    /// First role of `kind`.
    pub fn role_mut(&mut self, kind: RoleKind) -> Option<&mut WorkerRole<C, D, I>> {
        self.roles.iter_mut().find(|r| r.kind() == kind)
    }

    /// Line of the first edge-triggered role of `kind`.
    pub fn line_of(&self, kind: RoleKind) -> Option<LineId> {
        self.roles
            .iter()
            .filter(|r| r.kind() == kind)
            .find_map(WorkerRole::line)
    }

    /// Run one iteration of the first role of `kind`.
    pub fn step_role(&mut self, kind: RoleKind, wait: Duration) -> Option<StepOutcome> {
        self.role_mut(kind).map(|role| role.step(wait))
    }

    /// Configure every bound line and route its interrupts to the
    /// dispatcher. Call once at start-up.
    pub fn attach_input<S: InputSubsystem>(&self, input: &mut S) {
        let lines: Vec<LineId> = self.dispatcher.lines().collect();
        for line in lines {
            input.configure_line(line, EdgeKind::Falling);
            let dispatcher = Arc::clone(&self.dispatcher);
            let context = Arc::clone(&self.context);
            let callback: EdgeCallback = Arc::new(move |line: LineId| {
                dispatcher.on_edge(line, context.clock().now_ms());
            });
            input.register_edge_callback(line, callback);
        }
    }

    /// Split into the parts a threaded runtime needs.
    pub fn into_parts(
        self,
    ) -> (
        Arc<DispenserContext<C, D, I>>,
        Arc<InterruptDispatcher>,
        Vec<WorkerRole<C, D, I>>,
        DispenserConfig,
    ) {
        (self.context, self.dispatcher, self.roles, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::recording::{RecordingDisplay, RecordingIndicator};
    use crate::domain::clock::ManualClock;
    use crate::domain::pool::IndicatorLevel;

    #[test]
    fn test_build_draws_initial_frame() {
        let display = RecordingDisplay::new();
        let indicator = RecordingIndicator::new();
        let dispenser = DispenserBuilder::new()
            .build(ManualClock::new(), display.clone(), indicator.clone())
            .unwrap();

        assert_eq!(display.commits(), 1);
        assert_eq!(indicator.last(), Some(IndicatorLevel::Full));
        assert_eq!(dispenser.roles().len(), 3);
        assert_eq!(dispenser.line_of(RoleKind::Exit), Some(LineId::EXIT));
        assert_eq!(
            dispenser.dispatcher().lines().collect::<Vec<_>>(),
            vec![LineId::ENTRANCE, LineId::EXIT, LineId::RESET]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = DispenserBuilder::new().capacity(0).build(
            ManualClock::new(),
            RecordingDisplay::new(),
            RecordingIndicator::new(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidCapacity)));
    }

    #[test]
    fn test_custom_capacity() {
        let mut dispenser = DispenserBuilder::new()
            .capacity(3)
            .cooldown_ms(0)
            .build(ManualClock::new(), RecordingDisplay::new(), RecordingIndicator::new())
            .unwrap();

        assert_eq!(dispenser.context().pool().capacity(), 3);
        assert_eq!(dispenser.step_role(RoleKind::Entrance, Duration::ZERO), Some(StepOutcome::Idle));
    }
}
