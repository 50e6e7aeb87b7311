//! Recording notification sink for unit and integration testing.
//!
//! Captures every notification as a [`Notification`] value so tests can
//! assert on exact emission order and content without any consumer behind it.

use std::sync::{Arc, Mutex};

use tablet_core::{
    AxisSet, AxisValues, ButtonChange, ButtonCode, Notification, ProximityState, Tool,
};

use crate::application::dispatch::NotificationSink;

/// A [`NotificationSink`] that appends everything it receives to an
/// internal list.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink::default()
    }

    /// Drains and returns everything recorded so far, in emission order.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().expect("lock poisoned"))
    }

    /// Number of notifications currently recorded.
    pub fn len(&self) -> usize {
        self.notifications.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("lock poisoned")
            .push(notification);
    }
}

impl NotificationSink for RecordingSink {
    fn proximity(
        &self,
        time: u64,
        tool: &Arc<Tool>,
        state: ProximityState,
        changed: AxisSet,
        axes: &AxisValues,
    ) {
        self.push(Notification::Proximity {
            time,
            tool: Arc::clone(tool),
            state,
            changed,
            axes: *axes,
        });
    }

    fn axis_update(&self, time: u64, tool: &Arc<Tool>, changed: AxisSet, axes: &AxisValues) {
        self.push(Notification::AxisUpdate {
            time,
            tool: Arc::clone(tool),
            changed,
            axes: *axes,
        });
    }

    fn button(
        &self,
        time: u64,
        tool: &Arc<Tool>,
        axes: &AxisValues,
        button: ButtonCode,
        change: ButtonChange,
    ) {
        self.push(Notification::Button {
            time,
            tool: Arc::clone(tool),
            axes: *axes,
            button,
            change,
        });
    }
}
