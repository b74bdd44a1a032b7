//! Token Pool - Bounded Counting Primitive
//!
//! # Architecture
//!
//! The pool is the single authoritative source of "tokens available". It is
//! the only state mutated concurrently by several worker roles, so every
//! operation is one atomic read-modify-write on the backend:
//!
//! ```text
//! TokenPool<B: PoolBackend>
//!   ├─ capacity: u32                (fixed at construction)
//!   └─ backend: B                   (the `available` counter)
//!        ├─ AtomicBackend  → AtomicU32, lock-free, Sync   (runtime)
//!        └─ CellBackend    → Cell<u32>, single-threaded   (model checking)
//! ```
//!
//! ## Operations
//!
//! | Operation         | Effect on `available`            | Fails when        |
//! |-------------------|----------------------------------|-------------------|
//! | `try_acquire`     | `-1`                             | `available == 0`  |
//! | `release`         | `+1`                             | `== capacity`     |
//! | `reset_to_full`   | `= capacity`                     | never             |
//! | `current_count`   | none                             | never             |
//!
//! A failed operation has no side effect. Requests are dropped, not queued.

mod backend;
mod engine;
mod production_backend;
mod types;
mod verification_backend;

#[cfg(kani)]
mod proofs;

pub use backend::PoolBackend;
pub use engine::TokenPool;
pub use production_backend::AtomicBackend;
pub use types::{IndicatorLevel, PoolError, PoolSnapshot, DEFAULT_CAPACITY};
pub use verification_backend::CellBackend;

/// Thread-safe pool used by the runtime.
pub type SharedPool = TokenPool<AtomicBackend>;

/// Single-threaded pool for bounded model checking.
pub type VerificationPool = TokenPool<CellBackend>;
