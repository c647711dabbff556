use cadre::{Awaitable, Resume, StateMachine, TaskBuilder, TaskStatus, UnitTaskBuilder, pool};

use std::cell::RefCell;
use std::rc::Rc;

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

/// Completes with its value on the first step, without suspending.
struct Immediate {
    builder: TaskBuilder<u32>,
    value: u32,
}

impl StateMachine for Immediate {
    fn step(&mut self) {
        self.builder.set_result(self.value);
    }
}

/// Suspends once on the signal, then completes.
struct SuspendOnce {
    builder: TaskBuilder<u32>,
    signal: Signal,
    resumed: bool,
}

impl StateMachine for SuspendOnce {
    fn step(&mut self) {
        if !self.resumed {
            self.resumed = true;
            self.builder.await_on_completed(&mut self.signal);
        } else {
            self.builder.set_result(7);
        }
    }
}

#[test]
fn test_synchronous_completion_yields_value_without_suspending() {
    let builder = TaskBuilder::new();
    builder.start(Immediate {
        builder: builder.clone(),
        value: 42,
    });

    let mut task = builder.task();

    assert_eq!(task.status(), TaskStatus::Succeeded);
    assert!(task.is_completed());

    let result = task.try_result().expect("task should be completed");
    assert_eq!(result.unwrap(), 42, "synchronous result should be returned as-is");
}

#[test]
fn test_synchronous_completion_never_touches_the_pool() {
    // Park one driver by running a suspending operation to completion.
    let signal = Signal::default();
    let builder = TaskBuilder::new();
    builder.start(SuspendOnce {
        builder: builder.clone(),
        signal: signal.clone(),
        resumed: false,
    });

    let mut task = builder.task();
    signal.fire();
    task.try_result()
        .expect("suspended operation should have completed")
        .unwrap();

    assert_eq!(pool::size(), 1, "completed operation should have parked its driver");

    // A synchronous operation must neither pop nor park anything.
    let builder = TaskBuilder::new();
    builder.start(Immediate {
        builder: builder.clone(),
        value: 1,
    });

    let mut task = builder.task();
    assert_eq!(task.try_result().unwrap().unwrap(), 1);

    assert_eq!(pool::size(), 1, "fast path must not acquire a driver");
}

#[test]
fn test_repeated_reads_of_a_synchronous_result_agree() {
    let builder = TaskBuilder::new();
    builder.start(Immediate {
        builder: builder.clone(),
        value: 9,
    });

    let mut first = builder.task();
    let mut second = builder.task();

    assert_eq!(first.try_result().unwrap().unwrap(), 9);
    assert_eq!(
        second.try_result().unwrap().unwrap(),
        9,
        "every handle read from the builder should carry the same result"
    );
}

#[test]
fn test_into_task_works_without_cloneable_results() {
    // Deliberately not Clone.
    struct Opaque(u32);

    struct ImmediateOpaque {
        builder: TaskBuilder<Opaque>,
        value: Option<Opaque>,
    }

    impl StateMachine for ImmediateOpaque {
        fn step(&mut self) {
            let value = self.value.take().expect("machine stepped past completion");
            self.builder.set_result(value);
        }
    }

    struct SuspendOpaque {
        builder: TaskBuilder<Opaque>,
        signal: Signal,
        resumed: bool,
    }

    impl StateMachine for SuspendOpaque {
        fn step(&mut self) {
            if !self.resumed {
                self.resumed = true;
                self.builder.await_on_completed(&mut self.signal);
            } else {
                self.builder.set_result(Opaque(8));
            }
        }
    }

    // Synchronous completion: the stashed value is moved out.
    let builder = TaskBuilder::new();
    builder.start(ImmediateOpaque {
        builder: builder.clone(),
        value: Some(Opaque(5)),
    });

    let mut task = builder.into_task();
    assert_eq!(task.try_result().unwrap().unwrap().0, 5);

    // Suspension: the pending handle shares the driver.
    let signal = Signal::default();
    let builder = TaskBuilder::new();
    builder.start(SuspendOpaque {
        builder: builder.clone(),
        signal: signal.clone(),
        resumed: false,
    });

    let mut task = builder.into_task();
    assert_eq!(task.status(), TaskStatus::Pending);

    signal.fire();
    assert_eq!(task.try_result().unwrap().unwrap().0, 8);
}

#[test]
fn test_unit_builder_task_is_completed_before_anything_happens() {
    let builder = UnitTaskBuilder::new();

    let mut task = builder.task();

    assert_eq!(task.status(), TaskStatus::Succeeded);
    assert!(task.try_result().unwrap().is_ok());
}

#[test]
fn test_unit_builder_completes_synchronously() {
    struct Done {
        builder: UnitTaskBuilder,
    }

    impl StateMachine for Done {
        fn step(&mut self) {
            self.builder.set_result();
        }
    }

    let builder = UnitTaskBuilder::new();
    builder.start(Done {
        builder: builder.clone(),
    });

    let mut task = builder.task();
    assert!(task.try_result().unwrap().is_ok());
}

#[test]
fn test_debug_id_is_lazy_and_stable() {
    let a = TaskBuilder::<u32>::new();
    let b = TaskBuilder::<u32>::new();

    let id_a = a.debug_id();
    let id_b = b.debug_id();

    assert_eq!(a.debug_id(), id_a, "identity should be stable across reads");
    assert_ne!(id_a, id_b, "each builder should get its own identity");
}
