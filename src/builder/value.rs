use super::core::BuilderCore;
use crate::driver::Driver;
use crate::error::TaskError;
use crate::machine::{Awaitable, StateMachine};
use crate::task::Task;

use std::cell::RefCell;
use std::rc::Rc;

/// Builder for a value-returning asynchronous operation.
///
/// One builder is created per invocation. The machine that implements
/// the operation carries a clone of the builder into its steps and
/// reports its lifecycle through it; the invoking code keeps the
/// original to run [`start`](Self::start) and read
/// [`task`](Self::task).
///
/// As long as the operation completes without suspending, the builder
/// stashes the outcome on the stack-side state and the resulting
/// [`Task`] embeds it directly; no driver is acquired and nothing is
/// allocated. The first real suspension lazily acquires a pooled
/// driver, and the machine is bound to it exactly once.
pub struct TaskBuilder<T: 'static> {
    pub(super) core: Rc<RefCell<BuilderCore<T>>>,
}

impl<T: 'static> Clone for TaskBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: 'static> TaskBuilder<T> {
    /// Creates the builder for a new invocation.
    pub fn new() -> Self {
        Self {
            core: Rc::new(RefCell::new(BuilderCore::new())),
        }
    }

    /// Runs the machine's first step synchronously on the caller's
    /// thread.
    ///
    /// If the step suspended, the machine is moved into the driver the
    /// suspension acquired; otherwise the machine is finished and is
    /// dropped here without any driver ever existing.
    pub fn start<M: StateMachine>(&self, machine: M) {
        let mut machine = machine;
        machine.step();

        let driver = self.core.borrow().driver.clone();
        if let Some(driver) = driver {
            driver.install(Box::new(machine));
        }
    }

    /// Registers the operation's continuation with an awaited
    /// operation.
    ///
    /// Called by the machine at every suspension point, before
    /// returning from its step. The driver is acquired on the first
    /// call of the invocation and reused by every later one.
    pub fn await_on_completed<A>(&self, awaitable: &mut A)
    where
        A: Awaitable + ?Sized,
    {
        let resume = {
            let mut core = self.core.borrow_mut();
            core.driver.get_or_insert_with(Driver::acquire).resume_handle()
        };

        awaitable.on_completed(resume);
    }

    /// Marks terminal success.
    ///
    /// # Panics
    ///
    /// Panics if the operation already completed.
    pub fn set_result(&self, value: T) {
        let driver = self.core.borrow().driver.clone();

        match driver {
            Some(driver) => driver.set_result(value),
            None => self.core.borrow_mut().stash_result(value),
        }
    }

    /// Marks terminal failure.
    ///
    /// The error is stored verbatim and re-surfaced to whoever reads
    /// the task result.
    ///
    /// # Panics
    ///
    /// Panics if the operation already completed.
    pub fn set_error(&self, error: TaskError) {
        let driver = self.core.borrow().driver.clone();

        match driver {
            Some(driver) => driver.set_error(error),
            None => self.core.borrow_mut().stash_error(error),
        }
    }

    /// Does nothing.
    ///
    /// The machine is only ever captured through the driver's binding
    /// step, so there is no second boxed copy to record here. The
    /// method exists so a generated calling sequence can be wired
    /// one-to-one.
    pub fn set_state_machine(&self) {}

    /// Produces the future handle for this invocation.
    ///
    /// The builder keeps its state, so the handle can be read again;
    /// a synchronously stashed result is copied into every read. For
    /// result types that cannot be cloned, use
    /// [`into_task`](Self::into_task) instead.
    ///
    /// # Panics
    ///
    /// Panics if called before the operation has either suspended or
    /// completed; a value-returning operation has nothing observable at
    /// that point.
    pub fn task(&self) -> Task<T>
    where
        T: Clone,
    {
        self.core
            .borrow()
            .handle()
            .expect("task requested before the operation was started")
    }

    /// Produces the future handle, consuming this builder handle.
    ///
    /// Unlike [`task`](Self::task) this places no bound on the result
    /// type: a pending handle shares the driver, and a synchronously
    /// stashed result is moved out rather than copied.
    ///
    /// # Panics
    ///
    /// Panics if called before the operation has either suspended or
    /// completed.
    pub fn into_task(self) -> Task<T> {
        let mut core = self.core.borrow_mut();

        if let Some(task) = core.shared_handle() {
            return task;
        }

        core.take_result()
            .map(Task::from_value)
            .expect("task requested before the operation was started")
    }

    /// Returns a stable identity for this invocation, assigned lazily.
    ///
    /// Intended for diagnostic tooling only; it has no effect on
    /// control flow.
    pub fn debug_id(&self) -> u64 {
        self.core.borrow_mut().debug_id()
    }
}

impl<T: 'static> Default for TaskBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
