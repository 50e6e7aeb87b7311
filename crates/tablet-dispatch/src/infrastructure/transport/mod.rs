//! Device transport boundary.
//!
//! The transport is whatever delivers raw events and answers static questions
//! about the physical device: which axes and buttons it exposes, the
//! calibrated range and current raw value of each axis, and its USB identity.
//! On a live system this is a kernel event device; in tests and trace replay
//! it is [`mock::MockTablet`].
//!
//! The dispatcher reads axis values through this interface at flush time, not
//! at event time — the transport is expected to keep `AbsInfo::value` current
//! as samples arrive, the way an event-device library does.

use tablet_core::{AbsInfo, Axis, ButtonCode};

pub mod mock;

/// USB vendor/product identity of the device, used for database lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub vendor: u16,
    pub product: u16,
}

/// Capability and calibration queries against one physical tablet.
///
/// The production implementation wraps an event device; tests use
/// [`mock::MockTablet`].
pub trait DeviceTransport: Send + Sync {
    /// Whether the device physically reports this axis.
    fn has_axis(&self, axis: Axis) -> bool;

    /// Whether the device physically exposes this button.
    fn has_button(&self, button: ButtonCode) -> bool;

    /// Calibrated range and current raw value for an axis the device
    /// reports, `None` otherwise.
    fn abs_info(&self, axis: Axis) -> Option<AbsInfo>;

    /// Vendor/product identity of the device.
    fn device_id(&self) -> DeviceId;
}
