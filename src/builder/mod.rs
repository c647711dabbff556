//! Per-invocation builders implementing the suspension protocol.
//!
//! A builder is the glue between a machine and the task handle its
//! caller receives. It is driven through a fixed calling sequence:
//! [`start`](TaskBuilder::start) once, zero or more
//! [`await_on_completed`](TaskBuilder::await_on_completed) calls
//! interleaved with machine steps, and exactly one terminal
//! [`set_result`](TaskBuilder::set_result) or
//! [`set_error`](TaskBuilder::set_error).
//!
//! Two variants exist, one per result shape: [`TaskBuilder`] for
//! value-returning operations and [`UnitTaskBuilder`] for void ones.

mod core;
mod unit;
mod value;

pub use self::unit::UnitTaskBuilder;
pub use self::value::TaskBuilder;
