//! Task handles.
//!
//! This module defines the externally observable result of an
//! asynchronous operation: a lightweight [`Task`] value that either
//! embeds a completed outcome or refers to the driver of a still
//! pending one, plus the [`TaskStatus`] inspection type.

mod core;
mod status;

pub use self::core::Task;
pub use self::status::TaskStatus;
