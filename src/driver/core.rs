use super::state::Phase;
use crate::error::TaskError;
use crate::machine::StateMachine;
use crate::pool;
use crate::task::TaskStatus;

use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;
use std::task::Waker;

/// Terminal outcome slot of a driver.
///
/// The success value is stored erased so that one driver allocation
/// can be recycled across operations with different result types.
enum Outcome {
    Pending,
    Success(Box<dyn Any>),
    Failure(TaskError),
}

impl Outcome {
    fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

/// The pooled continuation driver.
///
/// A `RawDriver` owns a suspended computation's resume capability (the
/// boxed machine), its single terminal outcome, and the single
/// downstream observer. It is acquired from the pool at the first real
/// suspension of an operation, exclusively owned by that operation
/// until the outcome has been extracted, and then reset and parked for
/// reuse by an unrelated operation.
///
/// The generation counter is bumped on every release; callbacks and
/// handles tagged with an older generation become inert instead of
/// corrupting whatever operation owns the slot next.
pub(crate) struct RawDriver {
    phase: Phase,
    machine: Option<Box<dyn StateMachine>>,
    outcome: Outcome,
    observer: Option<Waker>,
    generation: u64,
}

impl RawDriver {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Free,
            machine: None,
            outcome: Outcome::Pending,
            observer: None,
            generation: 0,
        }
    }

    /// Clears every slot and invalidates outstanding handles.
    ///
    /// Called exactly once per acquisition, when the outcome leaves the
    /// driver. The machine slot is already empty by then; clearing it
    /// here as well keeps a corrupted driver from extending a machine's
    /// lifetime into the pool.
    fn reset(&mut self) {
        self.machine = None;
        self.observer = None;
        self.outcome = Outcome::Pending;
        self.phase = Phase::Free;
        self.generation += 1;
    }
}

pub(crate) type SharedDriver = Rc<RefCell<RawDriver>>;

/// Installs a machine into its driver after a step has returned.
///
/// Rebinding happens outside the machine's own `step` call, so a resume
/// that fired mid-step is only visible here as the `Notified` phase; in
/// that case the machine is stepped again immediately instead of being
/// parked. If the step produced a terminal outcome (or the outcome has
/// already been extracted and the slot recycled), the machine is simply
/// dropped.
///
/// No borrow of the driver is held while the machine runs, which keeps
/// re-entrant calls from the machine back into the driver safe.
fn install(shared: &SharedDriver, generation: u64, mut machine: Box<dyn StateMachine>) {
    loop {
        {
            let mut raw = shared.borrow_mut();

            if raw.generation != generation || raw.phase == Phase::Completed {
                break;
            }

            match raw.phase {
                Phase::Stepping => {
                    raw.machine = Some(machine);
                    raw.phase = Phase::Suspended;
                    return;
                }
                Phase::Notified => raw.phase = Phase::Stepping,
                Phase::Suspended | Phase::Free | Phase::Completed => {
                    panic!("machine installed on a driver in an unexpected state")
                }
            }
        }

        machine.step();
    }
}

/// Zero-argument resume callback bound to one driver acquisition.
///
/// A `Resume` is handed to whatever is being awaited; the scheduler
/// that completes the awaited operation invokes it to re-enter the
/// suspended machine. Invoking it after the operation has completed is
/// a no-op, as is invoking a stale handle whose driver has since been
/// returned to the pool.
#[derive(Clone)]
pub struct Resume {
    driver: SharedDriver,
    generation: u64,
}

impl Resume {
    /// Re-enters the suspended machine.
    ///
    /// If the machine is currently mid-step (the awaited operation
    /// completed synchronously, or re-entrantly during the step), the
    /// driver is marked notified and the machine is stepped again once
    /// its current step returns.
    pub fn invoke(&self) {
        let mut machine = {
            let mut raw = self.driver.borrow_mut();

            if raw.generation != self.generation {
                return;
            }

            match raw.phase {
                Phase::Suspended => {
                    raw.phase = Phase::Stepping;
                    raw.machine
                        .take()
                        .expect("suspended driver without a bound machine")
                }
                Phase::Stepping => {
                    raw.phase = Phase::Notified;
                    return;
                }
                Phase::Notified | Phase::Completed | Phase::Free => return,
            }
        };

        machine.step();
        install(&self.driver, self.generation, machine);
    }
}

/// Typed view over one acquisition of a [`RawDriver`].
///
/// Every `Driver<T>` clone refers to the same acquisition; the
/// generation tag captured at acquire time detects any use after the
/// slot has gone back to the pool.
pub(crate) struct Driver<T> {
    shared: SharedDriver,
    generation: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Driver<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            generation: self.generation,
            _marker: PhantomData,
        }
    }
}

impl<T: 'static> Driver<T> {
    /// Acquires a driver from the pool for a newly suspending
    /// operation.
    ///
    /// The driver starts in the `Stepping` phase: the machine that
    /// triggered the acquisition is still executing on the caller's
    /// stack and will be installed once its step returns.
    pub(crate) fn acquire() -> Self {
        let shared = pool::acquire();
        let generation = {
            let mut raw = shared.borrow_mut();
            debug_assert!(raw.phase == Phase::Free, "acquired driver was not free");

            raw.phase = Phase::Stepping;
            raw.generation
        };

        Self {
            shared,
            generation,
            _marker: PhantomData,
        }
    }

    /// Returns the resume callback for this acquisition.
    pub(crate) fn resume_handle(&self) -> Resume {
        Resume {
            driver: self.shared.clone(),
            generation: self.generation,
        }
    }

    /// Binds the machine to the driver, exactly once per acquisition.
    pub(crate) fn install(&self, machine: Box<dyn StateMachine>) {
        install(&self.shared, self.generation, machine);
    }

    /// Writes the terminal success outcome.
    pub(crate) fn set_result(&self, value: T) {
        self.complete(Outcome::Success(Box::new(value)));
    }

    /// Writes the terminal failure outcome.
    pub(crate) fn set_error(&self, error: TaskError) {
        self.complete(Outcome::Failure(error));
    }

    /// Writes the terminal outcome and notifies the observer.
    ///
    /// # Panics
    ///
    /// Panics if the operation already completed, or if the driver has
    /// been returned to the pool. Both indicate a miswired protocol and
    /// are not recoverable.
    fn complete(&self, outcome: Outcome) {
        let (machine, observer) = {
            let mut raw = self.shared.borrow_mut();
            assert!(
                raw.generation == self.generation,
                "completion signalled on a driver that has been returned to the pool"
            );
            assert!(
                raw.phase != Phase::Completed,
                "asynchronous operation completed twice"
            );

            raw.outcome = outcome;
            raw.phase = Phase::Completed;

            // The machine must never be re-entered past this point.
            (raw.machine.take(), raw.observer.take())
        };

        drop(machine);

        if let Some(waker) = observer {
            waker.wake();
        }
    }

    /// Reports the current outcome without extracting it.
    pub(crate) fn status(&self) -> TaskStatus {
        let raw = self.shared.borrow();
        assert!(
            raw.generation == self.generation,
            "task result already taken"
        );

        match raw.outcome {
            Outcome::Pending => TaskStatus::Pending,
            Outcome::Success(_) => TaskStatus::Succeeded,
            Outcome::Failure(_) => TaskStatus::Faulted,
        }
    }

    /// Registers the single downstream observer.
    ///
    /// A later registration replaces an earlier one; the driver only
    /// ever notifies one observer.
    pub(crate) fn register_observer(&self, waker: Waker) {
        let mut raw = self.shared.borrow_mut();
        assert!(
            raw.generation == self.generation,
            "task result already taken"
        );

        raw.observer = Some(waker);
    }

    /// Extracts the terminal outcome if one has been written.
    ///
    /// Extraction is the release point: the driver is reset and parked
    /// back in the pool before the outcome is handed to the caller.
    ///
    /// # Panics
    ///
    /// Panics if the outcome was already extracted through another
    /// handle to the same acquisition.
    pub(crate) fn try_take(&self) -> Option<Result<T, TaskError>> {
        let outcome = {
            let mut raw = self.shared.borrow_mut();
            assert!(
                raw.generation == self.generation,
                "task result already taken"
            );

            if raw.outcome.is_pending() {
                return None;
            }

            let outcome = mem::replace(&mut raw.outcome, Outcome::Pending);
            raw.reset();

            outcome
        };

        pool::release(self.shared.clone());

        Some(match outcome {
            Outcome::Success(value) => Ok(*value
                .downcast::<T>()
                .expect("task outcome stored with a mismatched type")),
            Outcome::Failure(error) => Err(error),
            Outcome::Pending => unreachable!(),
        })
    }
}
