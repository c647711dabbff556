//! Seams between the bridge and its external collaborators.
//!
//! A code-generation or transform layer expresses each asynchronous
//! operation as a [`StateMachine`]: an object that advances one
//! resumption step at a time. The bridge never inspects the machine's
//! shape; it only needs the ability to re-enter it.
//!
//! The operations a machine waits on implement [`Awaitable`], the
//! registration point for the driver's resume callback. The frame
//! scheduler that eventually completes the awaited operation invokes
//! that callback on the same logical thread.

use crate::driver::Resume;

/// An explicit asynchronous state machine.
///
/// Each call to [`step`](Self::step) runs the computation until it
/// either reaches its next suspension point or completes. A machine
/// owns everything it needs to make progress, typically including a
/// clone of the builder that created it, so that it can report
/// suspension and completion through the builder's lifecycle calls:
///
/// - suspension: `builder.await_on_completed(&mut awaitable)` followed
///   by returning from `step`,
/// - success: `builder.set_result(value)`,
/// - failure: `builder.set_error(error)`.
///
/// Exactly one terminal call must be made over the machine's lifetime.
pub trait StateMachine: 'static {
    /// Advances the computation to its next suspension point or to
    /// completion.
    fn step(&mut self);
}

/// An operation that can be awaited.
///
/// Implementors store or forward the [`Resume`] callback and invoke it
/// exactly once, when the operation completes. Invoking it from within
/// `on_completed` itself (an operation that turns out to be already
/// complete) is allowed and resumes the machine before control returns
/// to the caller.
pub trait Awaitable {
    /// Registers the continuation to invoke once the operation
    /// completes.
    fn on_completed(&mut self, resume: Resume);
}
