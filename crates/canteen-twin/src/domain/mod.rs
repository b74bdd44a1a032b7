//! Domain Layer - Dispenser Core
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Interrupt path (no locks, no logging)                      │
//! │  ├─ InterruptDispatcher   edge(line, now) demultiplexer     │
//! │  ├─ DebounceFilter        270 ms per-line window            │
//! │  └─ EdgeEventChannel      single-slot coalescing flag       │
//! │                                                             │
//! │  Task path                                                  │
//! │  ├─ WorkerRole<C, D, I>   Entrance / Exit / Reset loops     │
//! │  ├─ TokenPool<B>          bounded lock-free counter         │
//! │  └─ OutputSurface<D, I>   display + indicator, one Mutex    │
//! │                                                             │
//! │  Assembly                                                   │
//! │  ├─ DispenserConfig       validated board description       │
//! │  └─ Dispenser<C, D, I>    context + dispatcher + roles      │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Backends
//!
//! Time, pool storage and output drivers are all type parameters:
//!
//! - `SystemClock` / `ManualClock` for time
//! - `AtomicBackend` / `CellBackend` for the pool counter
//! - any `DisplayDriver` / `IndicatorDriver` pair for output
//!
//! The twin and the threaded runtime run the same monomorphized core.

pub mod channel;
pub mod clock;
pub mod config;
pub mod context;
pub mod debounce;
pub mod dispatcher;
pub mod input;
pub mod pool;
pub mod roles;
pub mod surface;

pub use channel::{EdgeEventChannel, PostOutcome};
pub use clock::{BootMillis, ManualClock, MonotonicClock, SystemClock};
pub use config::{ConfigError, DispenserConfig, RoleConfig};
pub use context::{Dispenser, DispenserBuilder, DispenserContext};
pub use debounce::{DebounceFilter, DEBOUNCE_WINDOW_MS};
pub use dispatcher::{DispatchOutcome, InterruptDispatcher, LineId, LineStats};
pub use input::{EdgeCallback, EdgeKind, InputSubsystem};
pub use pool::{
    IndicatorLevel, PoolError, PoolSnapshot, SharedPool, TokenPool, VerificationPool,
    DEFAULT_CAPACITY,
};
pub use roles::{
    ActionResult, RoleKind, RoleState, RoleStateCell, ShutdownSignal, StepOutcome, Trigger, Wake,
    WorkerRole,
};
pub use surface::{DisplayDriver, IndicatorDriver, OutputSurface, SurfaceFrame};
