use cadre::{Awaitable, Resume, StateMachine, Task, TaskBuilder, TaskError, TaskStatus};

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, PartialEq)]
struct Boom(&'static str);

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boom: {}", self.0)
    }
}

impl Error for Boom {}

/// Awaitable that parks the continuation until the test fires it.
#[derive(Clone, Default)]
struct Signal {
    resume: Rc<RefCell<Option<Resume>>>,
}

impl Awaitable for Signal {
    fn on_completed(&mut self, resume: Resume) {
        *self.resume.borrow_mut() = Some(resume);
    }
}

impl Signal {
    fn fire(&self) {
        let resume = self.resume.borrow().clone().expect("no continuation registered");
        resume.invoke();
    }
}

fn poll_task<T: 'static>(task: &mut Task<T>) -> Poll<Result<T, TaskError>> {
    let mut cx = Context::from_waker(Waker::noop());
    Pin::new(task).poll(&mut cx)
}

#[test]
fn test_synchronous_error_is_surfaced_verbatim() {
    struct Fails {
        builder: TaskBuilder<u32>,
    }

    impl StateMachine for Fails {
        fn step(&mut self) {
            self.builder.set_error(TaskError::new(Boom("sync")));
        }
    }

    let builder = TaskBuilder::new();
    builder.start(Fails {
        builder: builder.clone(),
    });

    let mut task = builder.task();
    assert_eq!(task.status(), TaskStatus::Faulted);

    let error = task.try_result().unwrap().unwrap_err();
    assert_eq!(
        error.downcast_ref::<Boom>(),
        Some(&Boom("sync")),
        "the original error object should be preserved unwrapped"
    );
}

#[test]
fn test_error_after_suspension_is_raised_exactly_once() {
    struct FailsLater {
        builder: TaskBuilder<u32>,
        signal: Signal,
        steps: Rc<Cell<u32>>,
        resumed: bool,
    }

    impl StateMachine for FailsLater {
        fn step(&mut self) {
            self.steps.set(self.steps.get() + 1);

            if !self.resumed {
                self.resumed = true;
                self.builder.await_on_completed(&mut self.signal);
            } else {
                self.builder.set_error(TaskError::new(Boom("resumed")));
            }
        }
    }

    let signal = Signal::default();
    let builder = TaskBuilder::new();
    let steps = Rc::new(Cell::new(0));

    builder.start(FailsLater {
        builder: builder.clone(),
        signal: signal.clone(),
        steps: steps.clone(),
        resumed: false,
    });

    let mut task = builder.task();
    signal.fire();

    match poll_task(&mut task) {
        Poll::Ready(result) => {
            let error = result.unwrap_err();
            assert_eq!(error.downcast_ref::<Boom>(), Some(&Boom("resumed")));
        }
        Poll::Pending => panic!("task should be faulted after the resume"),
    }

    // The machine must not run again once the error has been raised.
    signal.fire();
    assert_eq!(steps.get(), 2, "resume after a terminal error must be inert");
}

#[test]
#[should_panic(expected = "completed twice")]
fn test_double_completion_through_the_driver_panics() {
    struct CompletesTwice {
        builder: TaskBuilder<u32>,
        signal: Signal,
        resumed: bool,
    }

    impl StateMachine for CompletesTwice {
        fn step(&mut self) {
            if !self.resumed {
                self.resumed = true;
                self.builder.await_on_completed(&mut self.signal);
            } else {
                self.builder.set_result(1);
                self.builder.set_result(2);
            }
        }
    }

    let signal = Signal::default();
    let builder = TaskBuilder::new();
    builder.start(CompletesTwice {
        builder: builder.clone(),
        signal: signal.clone(),
        resumed: false,
    });

    signal.fire();
}

#[test]
#[should_panic(expected = "completed twice")]
fn test_double_synchronous_completion_panics() {
    struct CompletesTwice {
        builder: TaskBuilder<u32>,
    }

    impl StateMachine for CompletesTwice {
        fn step(&mut self) {
            self.builder.set_result(1);
            self.builder.set_result(2);
        }
    }

    let builder = TaskBuilder::new();
    builder.start(CompletesTwice {
        builder: builder.clone(),
    });
}

#[test]
#[should_panic(expected = "task requested before the operation was started")]
fn test_reading_a_value_task_before_start_panics() {
    let builder = TaskBuilder::<u32>::new();
    let _ = builder.task();
}

#[test]
#[should_panic(expected = "task result already taken")]
fn test_extracting_a_result_twice_panics() {
    struct Immediate {
        builder: TaskBuilder<u32>,
    }

    impl StateMachine for Immediate {
        fn step(&mut self) {
            self.builder.set_result(3);
        }
    }

    let builder = TaskBuilder::new();
    builder.start(Immediate {
        builder: builder.clone(),
    });

    let mut task = builder.task();
    task.try_result().unwrap().unwrap();
    let _ = task.try_result();
}
