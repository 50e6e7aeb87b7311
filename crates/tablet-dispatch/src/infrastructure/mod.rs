//! Infrastructure layer of the dispatcher crate.
//!
//! Everything that faces the outside world: the device transport boundary
//! (with its mock), the optional stylus database providers, notification
//! sink implementations, trace replay, and configuration storage.
//!
//! The dispatcher in `application` depends on the *traits* defined here, not
//! on the concrete implementations.

pub mod database;
pub mod replay;
pub mod sink;
pub mod storage;
pub mod transport;
