//! Monotonic Clock Module
//!
//! # Design Philosophy
//!
//! Every time-dependent part of the dispenser (edge debouncing, role
//! cooldowns, timer-driven reset) reads time through one small trait. The
//! concrete backend is chosen at construction and resolved statically:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  Dispenser / Roles / Dispatcher                        │
//! │  clock.now_ms();  clock.park(until_deadline);          │
//! └────────────────────────────────────────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          │                       │
//!   Production                 Deterministic
//!   (host threads)             (twin / tests)
//!          │                       │
//!    SystemClock               ManualClock
//!          │                       │
//!   Instant since boot,      AtomicU64 counter,
//!   park blocks thread       park advances time
//! ```
//!
//! # Laws
//! - Time never decreases between two reads on the same clock.
//! - `sleep(d)` returns no earlier than `d` after it was entered, measured
//!   on the same clock.
//! - `park(d)` returns no later than `d` after it was entered; it may return
//!   earlier when the thread is unparked.

mod backend;
mod manual_backend;
mod production_backend;

pub use backend::{millis_ceil, BootMillis, MonotonicClock};
pub use manual_backend::ManualClock;
pub use production_backend::SystemClock;
