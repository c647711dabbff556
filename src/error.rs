use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// A shared, clonable application error carried by a task outcome.
///
/// `TaskError` stores the original error object verbatim and re-surfaces
/// it unwrapped to whoever reads the task result. Cloning is cheap: all
/// clones point at the same underlying error.
///
/// This type only carries application-level failures. Protocol misuse
/// (completing an operation twice, touching a driver that has been
/// returned to the pool) is a programming error and panics instead.
#[derive(Clone)]
pub struct TaskError {
    inner: Rc<dyn Error + 'static>,
}

impl TaskError {
    /// Wraps an application error.
    ///
    /// The error is stored as-is and can be recovered with
    /// [`downcast_ref`](Self::downcast_ref).
    pub fn new<E>(error: E) -> Self
    where
        E: Error + 'static,
    {
        Self {
            inner: Rc::new(error),
        }
    }

    /// Creates an error from a plain message.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// builder.set_error(TaskError::msg("asset not found"));
    /// ```
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(Message(message.into())),
        }
    }

    /// Returns a reference to the original error object.
    pub fn get(&self) -> &(dyn Error + 'static) {
        &*self.inner
    }

    /// Attempts to view the original error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl Error for TaskError {
    /// Exposes the wrapped error as the source.
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.inner)
    }
}

/// Message-only error used by [`TaskError::msg`].
#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for Message {}
