use crate::driver::Driver;
use crate::error::TaskError;
use crate::task::Task;

use std::cell::Cell;
use std::num::NonZeroU64;

thread_local! {
    /// Monotonic source of lazily assigned builder identities.
    static NEXT_DEBUG_ID: Cell<u64> = const { Cell::new(1) };
}

/// Per-invocation state shared between a builder's clones.
///
/// Holds at most one of three things at a time: nothing (the operation
/// is still running synchronously), a stashed terminal outcome (the
/// operation completed without ever suspending), or a driver (the
/// operation suspended at least once and everything terminal now goes
/// through the driver).
pub(super) struct BuilderCore<T: 'static> {
    pub(super) driver: Option<Driver<T>>,
    pub(super) result: Option<T>,
    pub(super) error: Option<TaskError>,
    debug_id: Option<NonZeroU64>,
}

impl<T: 'static> BuilderCore<T> {
    pub(super) fn new() -> Self {
        Self {
            driver: None,
            result: None,
            error: None,
            debug_id: None,
        }
    }

    /// Records a synchronous success.
    ///
    /// # Panics
    ///
    /// Panics if a terminal outcome was already recorded.
    pub(super) fn stash_result(&mut self, value: T) {
        assert!(
            self.result.is_none() && self.error.is_none(),
            "asynchronous operation completed twice"
        );

        self.result = Some(value);
    }

    /// Records a synchronous failure.
    ///
    /// # Panics
    ///
    /// Panics if a terminal outcome was already recorded.
    pub(super) fn stash_error(&mut self, error: TaskError) {
        assert!(
            self.result.is_none() && self.error.is_none(),
            "asynchronous operation completed twice"
        );

        self.error = Some(error);
    }

    /// Produces the future handle for the invocation, if the operation
    /// has either suspended or completed.
    ///
    /// A suspended operation yields a pending handle bound to the
    /// driver; a synchronously completed one yields a handle embedding
    /// the stashed outcome directly.
    pub(super) fn handle(&self) -> Option<Task<T>>
    where
        T: Clone,
    {
        self.shared_handle()
            .or_else(|| self.result.clone().map(Task::from_value))
    }

    /// Produces the handle for a suspended or failed operation.
    ///
    /// Only the stashed-result read needs to copy the value; these two
    /// branches hand out shared references and work for any result
    /// type.
    pub(super) fn shared_handle(&self) -> Option<Task<T>> {
        if let Some(driver) = &self.driver {
            Some(Task::pending(driver.clone()))
        } else if let Some(error) = &self.error {
            Some(Task::from_error(error.clone()))
        } else {
            None
        }
    }

    /// Moves the stashed synchronous result out of the builder.
    pub(super) fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    /// Returns the builder's diagnostic identity, assigning one on
    /// first use.
    pub(super) fn debug_id(&mut self) -> u64 {
        match self.debug_id {
            Some(id) => id.get(),
            None => {
                let id = NEXT_DEBUG_ID.with(|cell| {
                    let id = cell.get();
                    cell.set(id + 1);
                    id
                });

                self.debug_id = NonZeroU64::new(id);
                id
            }
        }
    }
}
