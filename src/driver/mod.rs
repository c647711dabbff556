//! The pooled continuation driver.
//!
//! A driver owns a suspended operation's resume capability and its
//! single terminal outcome. Drivers are heap-resident but recycled
//! through the [`pool`](crate::pool), so steady-state suspension does
//! not allocate.
//!
//! Ownership is a strict handoff: pool → operation → pool. While an
//! operation is in flight the driver is exclusively its own; once the
//! outcome has been extracted by the single observer, the driver is
//! reset and parked again. Generation tags on outstanding handles make
//! use-after-return inert rather than corrupting.

mod core;
mod state;

pub(crate) use self::core::{Driver, RawDriver, SharedDriver};

pub use self::core::Resume;
