//! Worker Role Loop

use super::types::{ActionResult, RoleKind, RoleState, RoleStateCell, StepOutcome, Trigger, Wake};
use crate::domain::channel::EdgeEventChannel;
use crate::domain::clock::{millis_ceil, BootMillis, MonotonicClock};
use crate::domain::config::RoleConfig;
use crate::domain::context::DispenserContext;
use crate::domain::dispatcher::LineId;
use crate::domain::surface::{DisplayDriver, IndicatorDriver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Process-level stop flag shared by every role.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    /// Create a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every role to stop after its current iteration. Roles blocked in
    /// a wait notice once their thread is unparked.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether shutdown was requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One worker role bound to its channel and the shared context.
pub struct WorkerRole<C, D, I> {
    name: String,
    kind: RoleKind,
    line: Option<LineId>,
    trigger: Trigger,
    cooldown: Duration,
    channel: Option<Arc<EdgeEventChannel>>,
    context: Arc<DispenserContext<C, D, I>>,
    state: RoleStateCell,
    shutdown: ShutdownSignal,
    next_due: Option<BootMillis>,
    actions: u64,
    rejections: u64,
}

impl<C, D, I> WorkerRole<C, D, I>
where
    C: MonotonicClock,
    D: DisplayDriver,
    I: IndicatorDriver,
{
    /// Build a role from its config. `channel` must be present iff the
    /// trigger uses edges.
    pub fn new(
        config: &RoleConfig,
        index: usize,
        channel: Option<Arc<EdgeEventChannel>>,
        context: Arc<DispenserContext<C, D, I>>,
    ) -> Self {
        let next_due = config
            .trigger
            .period_ms()
            .map(|period| context.clock().now_ms().saturating_add(period));
        Self {
            name: format!("{}-{}", config.kind, index),
            kind: config.kind,
            line: config.line,
            trigger: config.trigger,
            cooldown: config.cooldown(),
            channel,
            context,
            state: RoleStateCell::default(),
            shutdown: ShutdownSignal::new(),
            next_due,
            actions: 0,
            rejections: 0,
        }
    }

    /// Thread name, e.g. `entrance-0`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Responsibility.
    pub const fn kind(&self) -> RoleKind {
        self.kind
    }

    /// Input line, if edge-triggered.
    pub const fn line(&self) -> Option<LineId> {
        self.line
    }

    /// Current loop state.
    pub fn state(&self) -> RoleState {
        self.state.load()
    }

    /// Handle for observing the loop state from another thread.
    pub fn state_cell(&self) -> RoleStateCell {
        self.state.clone()
    }

    /// Actions performed so far.
    pub const fn actions(&self) -> u64 {
        self.actions
    }

    /// Actions whose pool operation was rejected.
    pub const fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Run one iteration: wait up to `wait`, act if woken, refresh, cool down.
    pub fn step(&mut self, wait: Duration) -> StepOutcome {
        let Some(wake) = self.wait_for_trigger(wait) else {
            return StepOutcome::Idle;
        };

        self.state.store(RoleState::Acting);
        let result = self.act();
        let frame = self
            .context
            .surface()
            .refresh_from(self.context.pool());
        self.actions += 1;
        self.state.store(RoleState::Waiting);

        self.pause(self.cooldown);
        StepOutcome::Acted {
            wake,
            result,
            frame,
        }
    }

    /// Loop until `shutdown` is raised. Waits and cooldowns end early on
    /// shutdown; an action already started always completes its refresh.
    pub fn run(&mut self, shutdown: &ShutdownSignal, idle_wait: Duration) {
        self.shutdown = shutdown.clone();
        info!(role = %self.name, line = ?self.line, "worker role started");
        while !shutdown.is_requested() {
            self.step(idle_wait);
        }
        info!(
            role = %self.name,
            actions = self.actions,
            rejections = self.rejections,
            "worker role stopped"
        );
    }

    fn wait_for_trigger(&mut self, wait: Duration) -> Option<Wake> {
        let Some(due) = self.next_due else {
            return self.wait_for_edge(wait);
        };

        let clock = self.context.clock();
        let now = clock.now_ms();
        if now < due {
            let budget = wait.min(Duration::from_millis(due - now));
            if self.channel.is_some() {
                if self.wait_for_edge(budget).is_some() {
                    return Some(Wake::Edge);
                }
            } else {
                self.pause(budget);
            }
        }

        let now = clock.now_ms();
        if now >= due {
            let period = self.trigger.period_ms().unwrap_or_default();
            self.next_due = Some(now.saturating_add(period));
            return Some(Wake::Timer);
        }
        None
    }

    fn wait_for_edge(&self, wait: Duration) -> Option<Wake> {
        let channel = self.channel.as_ref()?;
        channel
            .wait_and_consume_unless(self.context.clock(), wait, || self.shutdown.is_requested())
            .then_some(Wake::Edge)
    }

    /// Let `duration` pass on the context clock, or less on shutdown.
    fn pause(&self, duration: Duration) {
        let clock = self.context.clock();
        let deadline = clock.now_ms().saturating_add(millis_ceil(duration));
        loop {
            let now = clock.now_ms();
            if now >= deadline || self.shutdown.is_requested() {
                return;
            }
            clock.park(Duration::from_millis(deadline - now));
        }
    }

    fn act(&mut self) -> ActionResult {
        let pool = self.context.pool();
        let result = match self.kind {
            RoleKind::Entrance => pool
                .acquire_token()
                .map_or_else(ActionResult::Rejected, |remaining| ActionResult::Acquired { remaining }),
            RoleKind::Exit => pool
                .release_token()
                .map_or_else(ActionResult::Rejected, |available| ActionResult::Released { available }),
            RoleKind::Reset => ActionResult::Refilled {
                previous: pool.reset_to_full(),
            },
        };

        match result {
            ActionResult::Rejected(err) => {
                self.rejections += 1;
                debug!(role = %self.name, %err, "request dropped");
            }
            ActionResult::Acquired { remaining } => {
                debug!(role = %self.name, remaining, "token taken");
            }
            ActionResult::Released { available } => {
                debug!(role = %self.name, available, "token returned");
            }
            ActionResult::Refilled { previous } => {
                debug!(role = %self.name, previous, capacity = pool.capacity(), "pool refilled");
            }
        }
        result
    }
}
