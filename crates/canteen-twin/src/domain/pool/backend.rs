//! Pool Backend Abstraction
//!
//! The engine expresses every mutation as load + compare-exchange (or an
//! unconditional swap for reset). A backend only has to provide those three
//! primitives over one `u32` cell; the bounded-counter logic lives once, in
//! `TokenPool`.

/// Storage for the `available` counter.
pub trait PoolBackend {
    /// Create a backend holding `initial`.
    fn with_value(initial: u32) -> Self
    where
        Self: Sized;

    /// Read the current value.
    fn load(&self) -> u32;

    /// Replace `current` with `new` if the cell still holds `current`.
    ///
    /// # Errors
    /// Returns the value actually found when it differs from `current`.
    fn compare_exchange(&self, current: u32, new: u32) -> Result<u32, u32>;

    /// Unconditionally store `value`, returning the previous value.
    fn swap(&self, value: u32) -> u32;
}
