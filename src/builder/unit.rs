use super::value::TaskBuilder;
use crate::error::TaskError;
use crate::machine::{Awaitable, StateMachine};
use crate::task::Task;

/// Builder for an asynchronous operation that produces no value.
///
/// Identical to [`TaskBuilder`] except for the shape of
/// [`set_result`](Self::set_result) and one read-side difference:
/// [`task`](Self::task) read before the operation has recorded anything
/// yields the canonical completed handle, since a void operation with
/// no error has nothing observable to wait for.
#[derive(Clone)]
pub struct UnitTaskBuilder {
    inner: TaskBuilder<()>,
}

impl UnitTaskBuilder {
    /// Creates the builder for a new invocation.
    pub fn new() -> Self {
        Self {
            inner: TaskBuilder::new(),
        }
    }

    /// Runs the machine's first step synchronously on the caller's
    /// thread.
    pub fn start<M: StateMachine>(&self, machine: M) {
        self.inner.start(machine);
    }

    /// Registers the operation's continuation with an awaited
    /// operation.
    pub fn await_on_completed<A>(&self, awaitable: &mut A)
    where
        A: Awaitable + ?Sized,
    {
        self.inner.await_on_completed(awaitable);
    }

    /// Marks terminal success.
    ///
    /// # Panics
    ///
    /// Panics if the operation already completed.
    pub fn set_result(&self) {
        self.inner.set_result(());
    }

    /// Marks terminal failure.
    ///
    /// # Panics
    ///
    /// Panics if the operation already completed.
    pub fn set_error(&self, error: TaskError) {
        self.inner.set_error(error);
    }

    /// Does nothing; see [`TaskBuilder::set_state_machine`].
    pub fn set_state_machine(&self) {}

    /// Produces the future handle for this invocation.
    ///
    /// Unlike the value-returning builder, reading the handle before
    /// the operation has suspended or completed is well-defined and
    /// yields an already-completed handle.
    pub fn task(&self) -> Task<()> {
        self.inner
            .core
            .borrow()
            .handle()
            .unwrap_or_else(Task::completed)
    }

    /// Returns a stable identity for this invocation, assigned lazily.
    pub fn debug_id(&self) -> u64 {
        self.inner.debug_id()
    }
}

impl Default for UnitTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}
