//! Recycling pool for driver allocations.
//!
//! The pool is a plain free list: releasing a driver parks its
//! allocation, acquiring pops one if available and allocates otherwise.
//! It is thread-local, matching the single-threaded execution model of
//! the bridge; every operation started on a thread reuses that thread's
//! drivers.
//!
//! Only diagnostics are public. Acquisition and release follow the
//! single-owner handoff enforced by the driver itself and are not
//! exposed.

use crate::driver::{RawDriver, SharedDriver};

use std::cell::RefCell;
use std::rc::Rc;

/// Default upper bound on parked driver allocations.
const DEFAULT_CAPACITY: usize = 64;

struct FreeList {
    drivers: Vec<SharedDriver>,
    capacity: usize,
}

thread_local! {
    /// Thread-local free list of recycled drivers.
    static DRIVER_POOL: RefCell<FreeList> = RefCell::new(FreeList {
        drivers: Vec::new(),
        capacity: DEFAULT_CAPACITY,
    });
}

/// Pops a parked driver, or allocates a fresh one if the pool is empty.
pub(crate) fn acquire() -> SharedDriver {
    DRIVER_POOL
        .with(|cell| cell.borrow_mut().drivers.pop())
        .unwrap_or_else(|| Rc::new(RefCell::new(RawDriver::new())))
}

/// Parks a reset driver for reuse.
///
/// If the pool is already at capacity the allocation is dropped
/// instead, so a burst of operations does not pin memory forever.
pub(crate) fn release(driver: SharedDriver) {
    DRIVER_POOL.with(|cell| {
        let mut pool = cell.borrow_mut();

        if pool.drivers.len() < pool.capacity {
            pool.drivers.push(driver);
        }
    });
}

/// Returns the number of drivers currently parked in this thread's
/// pool.
///
/// Intended for diagnostics and tests; the value changes whenever an
/// operation suspends for the first time or has its outcome read.
pub fn size() -> usize {
    DRIVER_POOL.with(|cell| cell.borrow().drivers.len())
}

/// Returns the maximum number of drivers the pool will retain.
pub fn capacity() -> usize {
    DRIVER_POOL.with(|cell| cell.borrow().capacity)
}

/// Sets the maximum number of drivers retained for reuse.
///
/// Drivers already parked beyond the new capacity are dropped. A
/// capacity of zero disables pooling entirely.
pub fn set_capacity(capacity: usize) {
    DRIVER_POOL.with(|cell| {
        let mut pool = cell.borrow_mut();

        pool.capacity = capacity;
        pool.drivers.truncate(capacity);
    });
}
