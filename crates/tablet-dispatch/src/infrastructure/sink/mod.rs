//! Notification sink implementations.
//!
//! The [`NotificationSink`] trait itself lives with the dispatcher in
//! `application::dispatch`; this module provides the stock consumers: a
//! recording double for tests and a tracing-backed sink for headless runs.

use std::sync::Arc;

use tracing::info;

use tablet_core::{Axis, AxisSet, AxisValues, ButtonChange, ButtonCode, ProximityState, Tool};

use crate::application::dispatch::NotificationSink;

pub mod recording;

/// A sink that logs every notification at info level. Used by the trace
/// replay binary, where the log *is* the output.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn proximity(
        &self,
        time: u64,
        tool: &Arc<Tool>,
        state: ProximityState,
        changed: AxisSet,
        axes: &AxisValues,
    ) {
        info!(
            time,
            tool = ?tool.tool_type(),
            serial = tool.serial(),
            ?state,
            changed = changed.len(),
            x = axes.get(Axis::X),
            y = axes.get(Axis::Y),
            "proximity"
        );
    }

    fn axis_update(&self, time: u64, tool: &Arc<Tool>, changed: AxisSet, axes: &AxisValues) {
        info!(
            time,
            tool = ?tool.tool_type(),
            changed = changed.len(),
            x = axes.get(Axis::X),
            y = axes.get(Axis::Y),
            pressure = axes.get(Axis::Pressure),
            "axes"
        );
    }

    fn button(
        &self,
        time: u64,
        tool: &Arc<Tool>,
        _axes: &AxisValues,
        button: ButtonCode,
        change: ButtonChange,
    ) {
        info!(time, tool = ?tool.tool_type(), ?button, ?change, "button");
    }
}
