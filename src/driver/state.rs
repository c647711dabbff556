/// Lifecycle states of a pooled driver.
///
/// A driver moves through these states strictly on one logical thread,
/// so the state is a plain enum rather than an atomic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Phase {
    /// Parked in the pool, owned by nobody.
    ///
    /// The machine, observer, and outcome slots are all cleared.
    Free,

    /// The machine is executing a step and is not currently installed.
    ///
    /// This is the state immediately after acquisition (the machine is
    /// still running on the caller's stack) and during every later
    /// re-entry.
    Stepping,

    /// The machine is installed and waiting for its resume callback.
    Suspended,

    /// A resume arrived while the machine was mid-step.
    ///
    /// The machine is stepped again as soon as its current step
    /// returns and it is re-installed.
    Notified,

    /// A terminal outcome has been written.
    ///
    /// The machine has been dropped and will not be re-entered. The
    /// driver stays in this state until its single observer extracts
    /// the outcome, which releases it back to the pool.
    Completed,
}
