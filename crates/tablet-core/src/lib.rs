//! # tablet-core
//!
//! Domain types and per-frame computations for the tablet event dispatcher.
//!
//! A graphics tablet reports its state as an interrupt-driven stream of tiny
//! per-field events: one absolute-axis sample here, one key transition there,
//! closed off by a synchronization marker. Nothing in that stream is directly
//! consumable — axis samples arrive in hardware units, button edges are only
//! meaningful relative to the previous frame, and the identity of the stylus
//! producing them is spread across three separate reports. This crate holds
//! the pure building blocks that turn the stream into sense:
//!
//! - **`events`** – the raw event model and the evdev-style code tables,
//!   plus the high-level [`Notification`] values the dispatcher emits.
//! - **`axes`** – the closed [`Axis`] enumeration, bounded axis sets,
//!   calibrated sample info, and the normalization rules.
//! - **`buttons`** – the tracked-button allow-list and the pressed/released
//!   diff between consecutive frames.
//! - **`tools`** – stylus identity and the serial-scoped [`ToolRegistry`].
//!
//! It has zero dependencies on OS APIs or device transports; the companion
//! `tablet-dispatch` crate supplies the per-device state machine and the
//! pluggable collaborators around it.

pub mod axes;
pub mod buttons;
pub mod events;
pub mod tools;

// Re-export the most-used types at the crate root so callers can write
// `tablet_core::Axis` instead of `tablet_core::axes::Axis`.
pub use axes::{
    mirror_position, normalize_tilt, normalize_unit, AbsInfo, Axis, AxisSet, AxisValues,
    CalibrationError,
};
pub use buttons::{ButtonCode, ButtonSet, ButtonState};
pub use events::{ButtonChange, EventCategory, Notification, ProximityState, RawEvent};
pub use tools::{Tool, ToolCapabilities, ToolRegistry, ToolType};
