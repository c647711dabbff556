//! # Cadre
//!
//! **Cadre** is a pooled task primitive for single-threaded,
//! frame-driven execution environments such as a game engine's
//! per-frame update loop.
//!
//! Instead of boxing a future for every asynchronous call, Cadre
//! bridges an explicit state machine to a small, copyable [`Task`]
//! handle through a per-invocation builder:
//!
//! - operations that complete without suspending allocate **nothing**;
//!   the outcome travels inline in the handle,
//! - operations that suspend acquire a **pooled driver** on their first
//!   suspension and bind their machine to it exactly once; the driver
//!   goes back to the pool as soon as its outcome has been read.
//!
//! Everything runs on one logical thread of control. There are no
//! locks, no atomics, and no internal scheduler; resumption is driven
//! from outside, by whatever loop completes the awaited operations.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadre::{StateMachine, TaskBuilder};
//!
//! struct LoadConfig {
//!     builder: TaskBuilder<Config>,
//!     read: FileRead,
//!     started: bool,
//! }
//!
//! impl StateMachine for LoadConfig {
//!     fn step(&mut self) {
//!         if !self.started {
//!             self.started = true;
//!             self.builder.await_on_completed(&mut self.read);
//!         } else {
//!             self.builder.set_result(parse(self.read.bytes()));
//!         }
//!     }
//! }
//!
//! let builder = TaskBuilder::new();
//! builder.start(LoadConfig::new(builder.clone(), path));
//! let task = builder.task();
//! ```
//!
//! ## Modules
//!
//! - [`pool`] — diagnostics for the driver recycling pool

mod builder;
mod driver;
mod error;
mod machine;
mod task;

pub mod pool;

pub use builder::{TaskBuilder, UnitTaskBuilder};
pub use driver::Resume;
pub use error::TaskError;
pub use machine::{Awaitable, StateMachine};
pub use task::{Task, TaskStatus};
