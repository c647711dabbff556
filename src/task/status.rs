/// Observable state of a task.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskStatus {
    /// The operation has not produced a terminal outcome yet.
    Pending,

    /// The operation completed with a value.
    Succeeded,

    /// The operation completed with an error.
    Faulted,
}

impl TaskStatus {
    /// Returns `true` for either terminal state.
    pub fn is_completed(self) -> bool {
        self != TaskStatus::Pending
    }
}
