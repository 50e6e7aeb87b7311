//! Mock tablet transport for unit testing and trace replay.
//!
//! Lets tests describe a device (supported axes with calibration, exposed
//! buttons, USB identity) and keep its raw axis values current while feeding
//! events to the dispatcher, without any kernel device behind it.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tablet_core::events::codes;
use tablet_core::{AbsInfo, Axis, ButtonCode, EventCategory, RawEvent};

use super::{DeviceId, DeviceTransport};

/// A configurable in-memory implementation of [`DeviceTransport`].
pub struct MockTablet {
    inner: Mutex<Inner>,
}

struct Inner {
    axes: HashMap<Axis, AbsInfo>,
    buttons: HashSet<ButtonCode>,
    id: DeviceId,
}

impl MockTablet {
    /// Creates a tablet with no axes, no buttons, and a zero USB identity.
    pub fn new() -> MockTablet {
        MockTablet {
            inner: Mutex::new(Inner {
                axes: HashMap::new(),
                buttons: HashSet::new(),
                id: DeviceId { vendor: 0, product: 0 },
            }),
        }
    }

    /// Adds an axis with the given calibration; the current value starts at
    /// `minimum`.
    pub fn with_axis(self, axis: Axis, minimum: i32, maximum: i32) -> MockTablet {
        self.inner.lock().expect("lock poisoned").axes.insert(
            axis,
            AbsInfo { minimum, maximum, value: minimum },
        );
        self
    }

    /// Exposes a button on the device.
    pub fn with_button(self, button: ButtonCode) -> MockTablet {
        self.inner
            .lock()
            .expect("lock poisoned")
            .buttons
            .insert(button);
        self
    }

    /// Sets the USB vendor/product identity.
    pub fn with_id(self, vendor: u16, product: u16) -> MockTablet {
        self.inner.lock().expect("lock poisoned").id = DeviceId { vendor, product };
        self
    }

    /// Overwrites the current raw value of a configured axis.
    ///
    /// Panics if the axis was never configured — a test describing an event
    /// for an axis its device does not have is broken.
    pub fn set_axis_value(&self, axis: Axis, value: i32) {
        let mut inner = self.inner.lock().expect("lock poisoned");
        let info = inner
            .axes
            .get_mut(&axis)
            .unwrap_or_else(|| panic!("axis {axis:?} not configured on this mock"));
        info.value = value;
    }

    /// Applies a raw event to the mock's state, mirroring what an event-device
    /// library does before handing the event to a dispatcher: absolute samples
    /// for configured axes update the stored current value, everything else is
    /// left alone.
    pub fn apply(&self, event: &RawEvent) {
        if EventCategory::from_raw(event.category) != Some(EventCategory::Absolute) {
            return;
        }
        if event.code == codes::ABS_MISC {
            return;
        }
        if let Some(axis) = Axis::from_code(event.code) {
            let mut inner = self.inner.lock().expect("lock poisoned");
            if let Some(info) = inner.axes.get_mut(&axis) {
                info.value = event.value;
            }
        }
    }
}

impl Default for MockTablet {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceTransport for MockTablet {
    fn has_axis(&self, axis: Axis) -> bool {
        self.inner.lock().expect("lock poisoned").axes.contains_key(&axis)
    }

    fn has_button(&self, button: ButtonCode) -> bool {
        self.inner.lock().expect("lock poisoned").buttons.contains(&button)
    }

    fn abs_info(&self, axis: Axis) -> Option<AbsInfo> {
        self.inner.lock().expect("lock poisoned").axes.get(&axis).copied()
    }

    fn device_id(&self) -> DeviceId {
        self.inner.lock().expect("lock poisoned").id
    }
}
