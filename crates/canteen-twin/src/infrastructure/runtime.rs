//! Threaded Runtime
//!
//! # Execution Model
//!
//! ```text
//!  DispenserRuntime::spawn(dispenser)
//!     ├─ thread "entrance-0" ── WorkerRole::run ─┐
//!     ├─ thread "exit-1"     ── WorkerRole::run ─┼─ observe ShutdownSignal
//!     └─ thread "reset-2"    ── WorkerRole::run ─┘  between bounded waits
//!
//!  RuntimeHandle::edge(line) ──► InterruptDispatcher::on_edge(line, now)
//!  RuntimeHandle::shutdown() ──► raise flag, unpark, join, collect reports
//! ```
//!
//! One OS thread per role, the host equivalent of one RTOS task each. The
//! handle is the only way in from outside: edges go through the dispatcher
//! exactly as interrupts would.
//!
//! Shutdown raises the flag and then unparks every role thread. A role
//! parked in a channel wait, a timer wait or a cooldown sees the flag on
//! wake-up, so stopping never waits out `idle_wait` or a cooldown.

use crate::domain::clock::MonotonicClock;
use crate::domain::context::{Dispenser, DispenserContext};
use crate::domain::dispatcher::{DispatchOutcome, InterruptDispatcher, LineId};
use crate::domain::roles::{RoleKind, RoleState, RoleStateCell, ShutdownSignal, WorkerRole};
use crate::domain::surface::{DisplayDriver, IndicatorDriver, SurfaceFrame};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Runtime start-up failures.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The OS refused to start a role thread
    #[error("failed to spawn thread for role {role}: {source}")]
    Spawn {
        /// Role name
        role: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Final counters of one role after shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleReport {
    /// Thread name
    pub name: String,
    /// Responsibility
    pub kind: RoleKind,
    /// Actions performed
    pub actions: u64,
    /// Actions whose pool operation was rejected
    pub rejections: u64,
}

impl<C, D, I> From<&WorkerRole<C, D, I>> for RoleReport
where
    C: MonotonicClock,
    D: DisplayDriver,
    I: IndicatorDriver,
{
    fn from(role: &WorkerRole<C, D, I>) -> Self {
        Self {
            name: role.name().to_owned(),
            kind: role.kind(),
            actions: role.actions(),
            rejections: role.rejections(),
        }
    }
}

/// Starts a dispenser on host threads.
pub struct DispenserRuntime;

impl DispenserRuntime {
    /// Spawn one named thread per role.
    ///
    /// # Errors
    /// `RuntimeError::Spawn` if a thread cannot be started. Threads already
    /// running are stopped and joined before returning.
    pub fn spawn<C, D, I>(dispenser: Dispenser<C, D, I>) -> Result<RuntimeHandle<C, D, I>, RuntimeError>
    where
        C: MonotonicClock + 'static,
        D: DisplayDriver + 'static,
        I: IndicatorDriver + 'static,
    {
        let (context, dispatcher, roles, config) = dispenser.into_parts();
        let idle_wait = config.runtime.idle_wait();
        let shutdown = ShutdownSignal::new();

        let mut handle = RuntimeHandle {
            context,
            dispatcher,
            shutdown,
            workers: Vec::with_capacity(roles.len()),
            states: Vec::with_capacity(roles.len()),
        };

        for mut role in roles {
            let name = role.name().to_owned();
            handle.states.push((name.clone(), role.state_cell()));
            let signal = handle.shutdown.clone();
            let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
                role.run(&signal, idle_wait);
                role
            });
            match spawned {
                Ok(join) => handle.workers.push(join),
                Err(source) => {
                    handle.shutdown();
                    return Err(RuntimeError::Spawn { role: name, source });
                }
            }
        }

        info!(roles = handle.workers.len(), "dispenser runtime started");
        Ok(handle)
    }
}

/// Control handle for a running dispenser.
pub struct RuntimeHandle<C, D, I> {
    context: Arc<DispenserContext<C, D, I>>,
    dispatcher: Arc<InterruptDispatcher>,
    shutdown: ShutdownSignal,
    workers: Vec<JoinHandle<WorkerRole<C, D, I>>>,
    states: Vec<(String, RoleStateCell)>,
}

impl<C, D, I> RuntimeHandle<C, D, I>
where
    C: MonotonicClock + 'static,
    D: DisplayDriver + 'static,
    I: IndicatorDriver + 'static,
{
    /// Deliver one edge on `line`, timestamped now.
    pub fn edge(&self, line: LineId) -> DispatchOutcome {
        self.dispatcher.on_edge(line, self.context.clock().now_ms())
    }

    /// Shared context (pool, surface, clock).
    pub const fn context(&self) -> &Arc<DispenserContext<C, D, I>> {
        &self.context
    }

    /// Edge dispatcher.
    pub const fn dispatcher(&self) -> &Arc<InterruptDispatcher> {
        &self.dispatcher
    }

    /// Current pool state as the surface would draw it.
    pub fn status(&self) -> SurfaceFrame {
        SurfaceFrame::from(self.context.pool().snapshot())
    }

    /// Shutdown flag observed by every role.
    pub const fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Loop state of every role, by thread name.
    pub fn role_states(&self) -> Vec<(String, RoleState)> {
        self.states
            .iter()
            .map(|(name, cell)| (name.clone(), cell.load()))
            .collect()
    }

    /// Number of role threads started.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop every role and wait for it. A role in the middle of an action
    /// finishes its refresh, so no frame is left half drawn; waits and
    /// cooldowns are cut short.
    pub fn shutdown(mut self) -> Vec<RoleReport> {
        self.shutdown.request();
        for worker in &self.workers {
            worker.thread().unpark();
        }

        let mut reports = Vec::with_capacity(self.workers.len());
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("role").to_owned();
            match worker.join() {
                Ok(role) => reports.push(RoleReport::from(&role)),
                Err(_) => error!(role = %name, "worker role panicked"),
            }
        }
        info!(roles = reports.len(), "dispenser runtime stopped");
        reports
    }
}
