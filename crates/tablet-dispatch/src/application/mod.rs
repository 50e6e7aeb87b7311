//! Application layer of the dispatcher crate.
//!
//! - **`dispatch`** – the per-device state machine that turns the raw event
//!   stream into ordered proximity / axis / button notifications. This is
//!   the critical path; it runs on every hardware event.
//! - **`capabilities`** – derives a freshly seen tool's axis and button
//!   capability set, from the stylus database when possible and from tool
//!   type heuristics otherwise.
//!
//! Both depend only on traits and `tablet-core` domain types; the concrete
//! transport, database, and sink are injected at construction time.

pub mod capabilities;
pub mod dispatch;
