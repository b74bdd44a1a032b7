//! Verification Pool Backend
//!
//! # The Kani Whisperer
//!
//! Kani can reason about atomics, but a plain `Cell<u32>` keeps the state
//! space minimal: no memory orderings to explore, no spurious CAS failures.
//! The price is that the backend is `!Sync`, which is exactly right for the
//! single-threaded harnesses it is used in.

use super::backend::PoolBackend;
use std::cell::Cell;

/// Single-threaded counter cell.
#[derive(Debug)]
pub struct CellBackend {
    available: Cell<u32>,
}

impl PoolBackend for CellBackend {
    fn with_value(initial: u32) -> Self {
        Self {
            available: Cell::new(initial),
        }
    }

    fn load(&self) -> u32 {
        self.available.get()
    }

    fn compare_exchange(&self, current: u32, new: u32) -> Result<u32, u32> {
        let actual = self.available.get();
        if actual == current {
            self.available.set(new);
            Ok(actual)
        } else {
            Err(actual)
        }
    }

    fn swap(&self, value: u32) -> u32 {
        self.available.replace(value)
    }
}
