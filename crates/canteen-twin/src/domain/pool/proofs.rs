//! Kani Proofs for TokenPool
//!
//! Run against `CellBackend` so the solver only explores counter values,
//! not memory orderings.

use super::*;

/// Any short sequence of operations keeps `available` inside `0..=capacity`.
#[kani::proof]
#[kani::unwind(6)]
fn proof_bounded_counter() {
    let capacity: u32 = kani::any();
    kani::assume(capacity >= 1 && capacity <= 8);
    let pool: VerificationPool = TokenPool::new(capacity);

    for _ in 0..4 {
        let op: u8 = kani::any();
        match op % 3 {
            0 => {
                pool.try_acquire();
            }
            1 => {
                pool.release();
            }
            _ => {
                pool.reset_to_full();
            }
        }
        let available = pool.current_count();
        kani::assert(available <= capacity, "available never exceeds capacity");
        kani::assert(
            available + pool.in_use() == capacity,
            "available + in use == capacity",
        );
    }
}

/// A failed acquire leaves the pool untouched.
#[kani::proof]
fn proof_exhausted_acquire_has_no_effect() {
    let pool: VerificationPool = TokenPool::new(1);
    kani::assert(pool.try_acquire(), "first acquire succeeds");
    kani::assert(!pool.try_acquire(), "second acquire fails");
    kani::assert(pool.current_count() == 0, "count unchanged by failure");
}

/// Reset is idempotent from any reachable state.
#[kani::proof]
#[kani::unwind(10)]
fn proof_reset_idempotent() {
    let pool: VerificationPool = TokenPool::new(8);
    let taken: u8 = kani::any();
    kani::assume(taken <= 8);
    for _ in 0..taken {
        pool.try_acquire();
    }
    pool.reset_to_full();
    let once = pool.current_count();
    pool.reset_to_full();
    kani::assert(once == 8 && pool.current_count() == once, "reset is idempotent");
}
