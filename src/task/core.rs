use super::status::TaskStatus;
use crate::driver::Driver;
use crate::error::TaskError;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A handle to an in-flight or completed asynchronous operation.
///
/// An operation that completed before anyone looked at it embeds its
/// outcome directly in the handle; one that is still pending holds a
/// reference to the driver that will eventually carry the outcome.
/// Either way the handle is a small value that can be cloned and passed
/// around freely.
///
/// The outcome itself is delivered exactly once: awaiting the handle
/// (or calling [`try_result`](Self::try_result)) moves the value or
/// error out. A second extraction, including through another clone of
/// the same pending handle, panics.
pub struct Task<T: 'static> {
    inner: Inner<T>,
}

enum Inner<T: 'static> {
    Completed(Option<Result<T, TaskError>>),
    Pending(Driver<T>),
}

impl<T: Clone + 'static> Clone for Task<T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::Completed(slot) => Inner::Completed(slot.clone()),
            Inner::Pending(driver) => Inner::Pending(driver.clone()),
        };

        Self { inner }
    }
}

impl<T: 'static> Task<T> {
    /// Creates an already-successful handle.
    pub fn from_value(value: T) -> Self {
        Self {
            inner: Inner::Completed(Some(Ok(value))),
        }
    }

    /// Creates an already-failed handle.
    pub fn from_error(error: TaskError) -> Self {
        Self {
            inner: Inner::Completed(Some(Err(error))),
        }
    }

    /// Creates a pending handle bound to a driver.
    pub(crate) fn pending(driver: Driver<T>) -> Self {
        Self {
            inner: Inner::Pending(driver),
        }
    }

    /// Reports the task's current state without consuming the outcome.
    ///
    /// # Panics
    ///
    /// Panics if the outcome has already been extracted.
    pub fn status(&self) -> TaskStatus {
        match &self.inner {
            Inner::Completed(Some(Ok(_))) => TaskStatus::Succeeded,
            Inner::Completed(Some(Err(_))) => TaskStatus::Faulted,
            Inner::Completed(None) => panic!("task result already taken"),
            Inner::Pending(driver) => driver.status(),
        }
    }

    /// Returns `true` once a terminal outcome exists.
    pub fn is_completed(&self) -> bool {
        self.status().is_completed()
    }

    /// Extracts the outcome if the operation has completed.
    ///
    /// Returns `None` while the operation is still pending. This never
    /// suspends, so top-level callers can poll a handle from a frame
    /// loop until it resolves. Extracting the outcome of a pending
    /// handle releases the underlying driver back to the pool.
    ///
    /// # Panics
    ///
    /// Panics if the outcome has already been extracted.
    pub fn try_result(&mut self) -> Option<Result<T, TaskError>> {
        match &mut self.inner {
            Inner::Completed(slot) => {
                Some(slot.take().expect("task result already taken"))
            }
            Inner::Pending(driver) => driver.try_take(),
        }
    }
}

impl Task<()> {
    /// The canonical handle for an operation that is already done and
    /// produced nothing observable.
    pub fn completed() -> Self {
        Self::from_value(())
    }
}

/// A task holds no self-references, so pinning one never restricts
/// moving it, whatever the result type is.
impl<T: 'static> Unpin for Task<T> {}

impl<T: 'static> Future for Task<T> {
    /// The operation's value, or the error it failed with.
    type Output = Result<T, TaskError>;

    /// Polls the task.
    ///
    /// An embedded or already-written outcome resolves immediately.
    /// Otherwise the caller's waker is registered as the driver's
    /// single observer and the task suspends; the driver wakes it when
    /// the operation reaches its terminal state.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match &mut this.inner {
            Inner::Completed(slot) => {
                Poll::Ready(slot.take().expect("task result already taken"))
            }
            Inner::Pending(driver) => {
                if let Some(result) = driver.try_take() {
                    return Poll::Ready(result);
                }

                driver.register_observer(cx.waker().clone());

                Poll::Pending
            }
        }
    }
}
