//! tablet-dispatch library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the trace-replay binary in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::capabilities::resolve_capabilities;
pub use application::dispatch::{DispatchInitError, NotificationSink, TabletDispatcher};
