//! Token Pool Engine
//!
//! One generic implementation, monomorphized per backend. Every mutating
//! operation is a CAS loop over the backend cell, so concurrent acquires and
//! releases from different roles can interleave arbitrarily and the counter
//! still never leaves `0..=capacity`.

use super::backend::PoolBackend;
use super::production_backend::AtomicBackend;
use super::types::{IndicatorLevel, PoolError, PoolSnapshot, DEFAULT_CAPACITY};

/// Bounded token counter.
#[derive(Debug)]
pub struct TokenPool<B: PoolBackend = AtomicBackend> {
    capacity: u32,
    backend: B,
}

impl<B: PoolBackend> TokenPool<B> {
    /// Create a full pool.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            backend: B::with_value(capacity),
        }
    }

    /// Fixed number of tokens.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Tokens currently available. Never blocks.
    pub fn current_count(&self) -> u32 {
        self.backend.load()
    }

    /// Tokens currently handed out.
    pub fn in_use(&self) -> u32 {
        self.capacity - self.current_count()
    }

    /// Current indicator category.
    pub fn level(&self) -> IndicatorLevel {
        IndicatorLevel::classify(self.current_count(), self.capacity)
    }

    /// Consistent `(capacity, available)` pair.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot::new(self.capacity, self.current_count())
    }

    /// Take one token.
    ///
    /// # Errors
    /// `PoolError::Exhausted` if no token is available; nothing changes.
    pub fn acquire_token(&self) -> Result<u32, PoolError> {
        let mut current = self.backend.load();
        loop {
            if current == 0 {
                return Err(PoolError::Exhausted {
                    capacity: self.capacity,
                });
            }
            match self.backend.compare_exchange(current, current - 1) {
                Ok(_) => return Ok(current - 1),
                Err(actual) => current = actual,
            }
        }
    }

    /// Return one token.
    ///
    /// # Errors
    /// `PoolError::Saturated` if the pool is already full; nothing changes.
    pub fn release_token(&self) -> Result<u32, PoolError> {
        let mut current = self.backend.load();
        loop {
            if current >= self.capacity {
                return Err(PoolError::Saturated {
                    capacity: self.capacity,
                });
            }
            match self.backend.compare_exchange(current, current + 1) {
                Ok(_) => return Ok(current + 1),
                Err(actual) => current = actual,
            }
        }
    }

    /// Non-blocking acquire. `true` iff a token was taken.
    pub fn try_acquire(&self) -> bool {
        self.acquire_token().is_ok()
    }

    /// Return one token. `true` iff the count went up.
    pub fn release(&self) -> bool {
        self.release_token().is_ok()
    }

    /// Force the pool back to full capacity, returning the previous count.
    pub fn reset_to_full(&self) -> u32 {
        self.backend.swap(self.capacity)
    }
}

impl<B: PoolBackend> Default for TokenPool<B> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pool::CellBackend;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_full() {
        let pool: TokenPool = TokenPool::default();
        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.current_count(), 8);
        assert_eq!(pool.level(), IndicatorLevel::Full);
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let pool: TokenPool = TokenPool::new(8);
        for expected in (0..8).rev() {
            assert_eq!(pool.acquire_token(), Ok(expected));
        }
        assert_eq!(pool.acquire_token(), Err(PoolError::Exhausted { capacity: 8 }));
        assert!(!pool.try_acquire());
        assert_eq!(pool.current_count(), 0);
        assert_eq!(pool.level(), IndicatorLevel::Empty);
    }

    #[test]
    fn test_release_at_capacity_fails() {
        let pool: TokenPool = TokenPool::new(8);
        assert_eq!(pool.release_token(), Err(PoolError::Saturated { capacity: 8 }));
        assert!(!pool.release());
        assert_eq!(pool.current_count(), 8);
    }

    #[test]
    fn test_release_after_exhaustion_reads_low() {
        let pool: TokenPool = TokenPool::new(8);
        while pool.try_acquire() {}
        assert!(pool.release());
        assert_eq!(pool.current_count(), 1);
        assert_eq!(pool.level(), IndicatorLevel::Low);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let pool: TokenPool = TokenPool::new(8);
        for _ in 0..5 {
            pool.try_acquire();
        }
        assert_eq!(pool.reset_to_full(), 3);
        assert_eq!(pool.reset_to_full(), 8);
        assert_eq!(pool.current_count(), 8);
    }

    #[test]
    fn test_cell_backend_same_semantics() {
        let pool: TokenPool<CellBackend> = TokenPool::new(2);
        assert!(pool.try_acquire());
        assert!(pool.try_acquire());
        assert!(!pool.try_acquire());
        assert!(pool.release());
        assert_eq!(pool.snapshot(), PoolSnapshot::new(2, 1));
        pool.reset_to_full();
        assert!(!pool.release());
    }

    #[test]
    fn test_concurrent_acquire_never_oversubscribes() {
        let pool: Arc<TokenPool> = Arc::new(TokenPool::new(8));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || (0..100).filter(|_| pool.try_acquire()).count())
            })
            .collect();

        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 8);
        assert_eq!(pool.current_count(), 0);
    }
}
