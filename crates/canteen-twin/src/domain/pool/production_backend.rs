//! Atomic Pool Backend
//!
//! `AtomicU32` with acquire/release ordering. Lock-free, so it is also safe
//! to read from interrupt context.

use super::backend::PoolBackend;
use std::sync::atomic::{AtomicU32, Ordering};

/// Lock-free counter cell.
#[derive(Debug)]
pub struct AtomicBackend {
    available: AtomicU32,
}

impl PoolBackend for AtomicBackend {
    fn with_value(initial: u32) -> Self {
        Self {
            available: AtomicU32::new(initial),
        }
    }

    #[inline]
    fn load(&self) -> u32 {
        self.available.load(Ordering::Acquire)
    }

    #[inline]
    fn compare_exchange(&self, current: u32, new: u32) -> Result<u32, u32> {
        self.available
            .compare_exchange_weak(current, new, Ordering::AcqRel, Ordering::Acquire)
    }

    #[inline]
    fn swap(&self, value: u32) -> u32 {
        self.available.swap(value, Ordering::AcqRel)
    }
}
