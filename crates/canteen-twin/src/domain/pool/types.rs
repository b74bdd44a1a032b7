//! Core Types for Token Accounting

use std::fmt;

/// Tokens in a freshly booted dispenser.
pub const DEFAULT_CAPACITY: u32 = 8;

/// Status indicator category derived from the available count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorLevel {
    /// Every token is available (idle dispenser)
    Full,
    /// No token left; entrance requests are dropped
    Empty,
    /// Exactly one token left
    Low,
    /// Anything in between
    Normal,
}

impl IndicatorLevel {
    /// Classify an available count.
    ///
    /// `Full` takes precedence, so a one-token pool that is full reads
    /// `Full`, not `Low`.
    pub const fn classify(available: u32, capacity: u32) -> Self {
        if available == capacity {
            Self::Full
        } else if available == 0 {
            Self::Empty
        } else if available == 1 {
            Self::Low
        } else {
            Self::Normal
        }
    }

    /// Lowercase label used in logs and on the terminal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Empty => "empty",
            Self::Low => "low",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for IndicatorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consistent view of the pool at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Fixed number of tokens
    pub capacity: u32,
    /// Tokens currently available
    pub available: u32,
}

impl PoolSnapshot {
    /// Build a snapshot, clamping `available` into `0..=capacity`.
    pub const fn new(capacity: u32, available: u32) -> Self {
        let available = if available > capacity { capacity } else { available };
        Self {
            capacity,
            available,
        }
    }

    /// Tokens currently handed out.
    pub const fn in_use(&self) -> u32 {
        self.capacity - self.available
    }

    /// Indicator category for this state.
    pub const fn level(&self) -> IndicatorLevel {
        IndicatorLevel::classify(self.available, self.capacity)
    }
}

/// Rejected pool operations.
///
/// Both are expected business outcomes. Worker roles absorb them; the
/// display keeps showing the unchanged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Acquire attempted with no token available
    #[error("token pool exhausted (0 of {capacity} available)")]
    Exhausted {
        /// Pool capacity
        capacity: u32,
    },

    /// Release attempted with every token already available
    #[error("token pool saturated ({capacity} of {capacity} available)")]
    Saturated {
        /// Pool capacity
        capacity: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all_levels() {
        assert_eq!(IndicatorLevel::classify(8, 8), IndicatorLevel::Full);
        assert_eq!(IndicatorLevel::classify(0, 8), IndicatorLevel::Empty);
        assert_eq!(IndicatorLevel::classify(1, 8), IndicatorLevel::Low);
        for available in 2..8 {
            assert_eq!(IndicatorLevel::classify(available, 8), IndicatorLevel::Normal);
        }
    }

    #[test]
    fn test_full_wins_for_single_token_pool() {
        assert_eq!(IndicatorLevel::classify(1, 1), IndicatorLevel::Full);
        assert_eq!(IndicatorLevel::classify(0, 1), IndicatorLevel::Empty);
    }

    #[test]
    fn test_snapshot_accounting() {
        let snapshot = PoolSnapshot::new(8, 3);
        assert_eq!(snapshot.in_use(), 5);
        assert_eq!(snapshot.available + snapshot.in_use(), snapshot.capacity);
        assert_eq!(snapshot.level(), IndicatorLevel::Normal);
    }

    #[test]
    fn test_snapshot_clamps() {
        let snapshot = PoolSnapshot::new(8, 12);
        assert_eq!(snapshot.available, 8);
        assert_eq!(snapshot.in_use(), 0);
    }

    #[test]
    fn test_error_display() {
        let err = PoolError::Exhausted { capacity: 8 };
        assert_eq!(err.to_string(), "token pool exhausted (0 of 8 available)");
    }
}
