//! Raw event model and high-level notification types.
//!
//! A tablet transport delivers [`RawEvent`]s one at a time: per-field absolute
//! axis samples, key transitions, miscellaneous reports, and synchronization
//! markers. The dispatcher coalesces them and emits [`Notification`]s, the
//! semantically meaningful output of this stack.
//!
//! The event `category` is carried as its raw numeric value rather than a
//! closed enum: a misbehaving transport can hand us any 16-bit value, and the
//! dispatcher wants to log such events instead of making them unrepresentable.
//! [`EventCategory::from_raw`] is the single classification point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::axes::{AxisSet, AxisValues};
use crate::buttons::ButtonCode;
use crate::tools::Tool;

pub mod codes;

/// The recognized top-level categories of a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    /// `EV_SYN` – frame boundary.
    Synchronize,
    /// `EV_KEY` – tool presence, contact, and button transitions.
    Key,
    /// `EV_ABS` – absolute axis samples.
    Absolute,
    /// `EV_MSC` – miscellaneous reports (tool serial numbers).
    Misc,
}

impl EventCategory {
    /// Classifies a raw category value.
    ///
    /// Returns `None` for any category a tablet is not expected to report;
    /// the caller decides how loudly to complain.
    pub fn from_raw(raw: u16) -> Option<EventCategory> {
        match raw {
            codes::EV_SYN => Some(EventCategory::Synchronize),
            codes::EV_KEY => Some(EventCategory::Key),
            codes::EV_ABS => Some(EventCategory::Absolute),
            codes::EV_MSC => Some(EventCategory::Misc),
            _ => None,
        }
    }

    /// Returns the raw numeric value of this category.
    pub fn to_raw(self) -> u16 {
        match self {
            EventCategory::Synchronize => codes::EV_SYN,
            EventCategory::Key => codes::EV_KEY,
            EventCategory::Absolute => codes::EV_ABS,
            EventCategory::Misc => codes::EV_MSC,
        }
    }
}

/// One raw hardware event, exactly as the transport delivered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event timestamp in microseconds.
    pub time: u64,
    /// Raw event category (`EV_*`).
    pub category: u16,
    /// Category-specific code (`ABS_*`, `BTN_*`, `MSC_*`).
    pub code: u16,
    /// Raw value: axis sample, key state (0/1), or report payload.
    pub value: i32,
}

impl RawEvent {
    /// An absolute axis sample.
    pub fn absolute(time: u64, code: u16, value: i32) -> RawEvent {
        RawEvent { time, category: codes::EV_ABS, code, value }
    }

    /// A key transition; `pressed` maps to value 1/0.
    pub fn key(time: u64, code: u16, pressed: bool) -> RawEvent {
        RawEvent { time, category: codes::EV_KEY, code, value: i32::from(pressed) }
    }

    /// A miscellaneous report.
    pub fn misc(time: u64, code: u16, value: i32) -> RawEvent {
        RawEvent { time, category: codes::EV_MSC, code, value }
    }

    /// A frame-terminating synchronization marker.
    pub fn sync(time: u64) -> RawEvent {
        RawEvent { time, category: codes::EV_SYN, code: codes::SYN_REPORT, value: 0 }
    }
}

/// Direction of a proximity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityState {
    In,
    Out,
}

/// Edge of a button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonChange {
    Pressed,
    Released,
}

/// A coalesced, high-level notification emitted at a frame flush.
///
/// Every variant carries the tool handle and the full current axis-value
/// snapshot; `changed` restricts which values the consumer should treat as
/// having moved this frame.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A tool entered or left the sensing range of the tablet.
    Proximity {
        time: u64,
        tool: Arc<Tool>,
        state: ProximityState,
        changed: AxisSet,
        axes: AxisValues,
    },
    /// One or more axis values moved while the tool stayed in proximity.
    AxisUpdate {
        time: u64,
        tool: Arc<Tool>,
        changed: AxisSet,
        axes: AxisValues,
    },
    /// A tracked button changed state.
    Button {
        time: u64,
        tool: Arc<Tool>,
        axes: AxisValues,
        button: ButtonCode,
        change: ButtonChange,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_raw_values() {
        for category in [
            EventCategory::Synchronize,
            EventCategory::Key,
            EventCategory::Absolute,
            EventCategory::Misc,
        ] {
            assert_eq!(EventCategory::from_raw(category.to_raw()), Some(category));
        }
    }

    #[test]
    fn test_unknown_categories_are_rejected() {
        // EV_REL and EV_LED are real kernel categories, just not tablet ones.
        for raw in [0x02, 0x11, 0x1f, 0xffff] {
            assert_eq!(EventCategory::from_raw(raw), None, "{raw:#x}");
        }
    }

    #[test]
    fn test_key_constructor_encodes_state_as_value() {
        let down = RawEvent::key(1, codes::BTN_STYLUS, true);
        let up = RawEvent::key(2, codes::BTN_STYLUS, false);

        assert_eq!(down.value, 1);
        assert_eq!(up.value, 0);
        assert_eq!(down.category, codes::EV_KEY);
    }

    #[test]
    fn test_sync_constructor_uses_syn_report() {
        let sync = RawEvent::sync(42);
        assert_eq!(sync.category, codes::EV_SYN);
        assert_eq!(sync.code, codes::SYN_REPORT);
    }
}
