//! TabletDispatcher: the per-device event state machine.
//!
//! This is the heart of the stack. It consumes the transport's raw event
//! stream one event at a time, accumulates pending per-frame state (changed
//! axes, button edges, tool identity fields), and on each synchronization
//! marker flushes the frame as an ordered sequence of proximity, axis, and
//! button notifications.
//!
//! # Architecture
//!
//! The dispatcher depends only on traits ([`DeviceTransport`],
//! [`StylusDatabase`], [`NotificationSink`]) and domain types from
//! `tablet-core`. All collaborators are injected at construction time, so the
//! whole state machine is unit-testable with a mock device and a recording
//! sink.
//!
//! Processing is synchronous and run-to-completion: every event is fully
//! absorbed (and, for synchronization markers, every notification emitted)
//! before the next event is accepted. One dispatcher serves one physical
//! device and is never shared across threads; the only cross-device state is
//! the shared tool registry for serialized styli.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use tablet_core::events::codes;
use tablet_core::{
    mirror_position, normalize_tilt, normalize_unit, Axis, AxisSet, AxisValues, ButtonChange,
    ButtonCode, ButtonState, CalibrationError, EventCategory, ProximityState, RawEvent, Tool,
    ToolRegistry, ToolType,
};

use crate::application::capabilities::resolve_capabilities;
use crate::infrastructure::database::StylusDatabase;
use crate::infrastructure::transport::DeviceTransport;

/// Error type for dispatcher construction.
///
/// Everything here is a transport contract violation; a dispatcher either
/// initializes cleanly or the device is unusable as a tablet.
#[derive(Debug, Error)]
pub enum DispatchInitError {
    /// An advertised axis has an empty calibration range.
    #[error("unusable device calibration: {0}")]
    Calibration(#[from] CalibrationError),

    /// The transport claims an axis but returns no calibration for it.
    #[error("device reports axis {axis:?} but provides no calibration data")]
    MissingCalibration { axis: Axis },
}

/// Consumer interface for the coalesced high-level notifications.
///
/// All three calls carry the tool handle and the full current axis-value
/// snapshot; `changed` restricts which values actually moved this frame.
/// Implementations must not call back into the dispatcher.
pub trait NotificationSink: Send + Sync {
    /// A tool entered or left the sensing range.
    fn proximity(
        &self,
        time: u64,
        tool: &Arc<Tool>,
        state: ProximityState,
        changed: AxisSet,
        axes: &AxisValues,
    );

    /// Axis values moved while the tool stayed in proximity.
    fn axis_update(&self, time: u64, tool: &Arc<Tool>, changed: AxisSet, axes: &AxisValues);

    /// A tracked button changed state.
    fn button(
        &self,
        time: u64,
        tool: &Arc<Tool>,
        axes: &AxisValues,
        button: ButtonCode,
        change: ButtonChange,
    );
}

/// The pending-condition flags accumulated between synchronization markers.
///
/// Scattered event handlers only ever *set* these; the flush state machine is
/// the single place that clears them.
#[derive(Debug, Clone, Copy, Default)]
struct StatusFlags {
    entering_proximity: bool,
    leaving_proximity: bool,
    out_of_proximity: bool,
    stylus_in_contact: bool,
    axes_updated: bool,
    buttons_pressed: bool,
    buttons_released: bool,
}

/// Left-handed (rotated) orientation state.
///
/// `want_enabled` may lag `enabled`: orientation never changes while a tool
/// is in proximity, or the tool would jump position mid-stroke.
#[derive(Debug, Clone, Copy, Default)]
struct LeftHandedState {
    enabled: bool,
    want_enabled: bool,
    /// Whether the hardware supports rotated use at all.
    reversible: bool,
}

/// The per-device tablet event dispatcher.
///
/// Created once when a device is recognized as a tablet, dropped when the
/// device is removed. Dropping it releases the device-local tools; tools in
/// the shared registry outlive it by design.
pub struct TabletDispatcher {
    transport: Arc<dyn DeviceTransport>,
    sink: Arc<dyn NotificationSink>,
    database: Arc<dyn StylusDatabase>,

    /// Cross-device registry for tools with a hardware serial.
    shared_tools: Arc<ToolRegistry>,
    /// Device-local registry for tools without one.
    local_tools: ToolRegistry,

    status: StatusFlags,
    /// The axes this device physically reports, fixed at init.
    axis_caps: AxisSet,
    changed_axes: AxisSet,
    axes: AxisValues,
    buttons: ButtonState,

    current_tool_type: Option<ToolType>,
    current_tool_id: u32,
    current_tool_serial: u32,

    left_handed: LeftHandedState,
}

impl TabletDispatcher {
    /// Creates a dispatcher for one tablet device.
    ///
    /// Queries the transport for the device's axis capabilities and validates
    /// every calibration range up front. Also consults the database for
    /// reversible-orientation support; an unknown or unreachable database
    /// assumes the hardware is reversible.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchInitError`] when the transport violates its
    /// calibration contract. That is fatal for this device — per-event
    /// processing never re-checks ranges.
    pub fn new(
        transport: Arc<dyn DeviceTransport>,
        database: Arc<dyn StylusDatabase>,
        sink: Arc<dyn NotificationSink>,
        shared_tools: Arc<ToolRegistry>,
    ) -> Result<TabletDispatcher, DispatchInitError> {
        let mut axis_caps = AxisSet::EMPTY;
        for axis in Axis::ALL {
            if !transport.has_axis(axis) {
                continue;
            }
            let info = transport
                .abs_info(axis)
                .ok_or(DispatchInitError::MissingCalibration { axis })?;
            info.validate(axis)?;
            axis_caps.insert(axis);
        }

        let reversible = query_reversible(transport.as_ref(), database.as_ref());

        Ok(TabletDispatcher {
            transport,
            sink,
            database,
            shared_tools,
            local_tools: ToolRegistry::new(),
            status: StatusFlags {
                out_of_proximity: true,
                // The first frame of the first tool must carry a full
                // snapshot, so everything starts marked changed.
                axes_updated: true,
                ..StatusFlags::default()
            },
            axis_caps,
            changed_axes: axis_caps,
            axes: AxisValues::default(),
            buttons: ButtonState::default(),
            current_tool_type: None,
            current_tool_id: 0,
            current_tool_serial: 0,
            left_handed: LeftHandedState {
                reversible,
                ..LeftHandedState::default()
            },
        })
    }

    /// The axes this device reports, as captured at initialization.
    pub fn axis_capabilities(&self) -> AxisSet {
        self.axis_caps
    }

    /// Whether left-handed orientation is currently applied.
    pub fn is_left_handed(&self) -> bool {
        self.left_handed.enabled
    }

    /// Requests left-handed (rotated) orientation.
    ///
    /// Takes effect immediately if no tool is in proximity, otherwise at the
    /// next proximity-out. Ignored with a warning on non-reversible hardware.
    pub fn set_left_handed(&mut self, enabled: bool) {
        if !self.left_handed.reversible {
            warn!("device is not reversible, ignoring left-handed request");
            return;
        }
        self.left_handed.want_enabled = enabled;
        self.apply_pending_left_handed();
    }

    /// Absorbs one raw event.
    ///
    /// Synchronization markers trigger the frame flush; everything else only
    /// mutates pending state.
    pub fn process(&mut self, event: &RawEvent) {
        match EventCategory::from_raw(event.category) {
            Some(EventCategory::Absolute) => self.process_absolute(event),
            Some(EventCategory::Key) => self.process_key(event),
            Some(EventCategory::Misc) => self.process_misc(event),
            Some(EventCategory::Synchronize) => self.flush(event.time),
            None => {
                error!(
                    "unexpected event category {:#x} (code {:#x})",
                    event.category, event.code
                );
            }
        }
    }

    // ── Event classification ──────────────────────────────────────────────────

    fn process_absolute(&mut self, event: &RawEvent) {
        if let Some(axis) = Axis::from_code(event.code) {
            self.changed_axes.insert(axis);
            self.status.axes_updated = true;
            return;
        }

        match event.code {
            // The hardware tool id, usable for a database lookup later.
            codes::ABS_MISC => {
                self.current_tool_id = event.value as u32;
            }
            // Touch-strip and 4D-mouse data; real hardware sends these but
            // this subsystem does not interpret them.
            codes::ABS_RX | codes::ABS_RY | codes::ABS_RZ | codes::ABS_THROTTLE => {
                info!("unhandled absolute axis {:#x}", event.code);
            }
            // Anything else means the transport and this dispatcher disagree
            // about the protocol.
            _ => {
                error!("invalid ABS event code {:#x}", event.code);
            }
        }
    }

    fn process_key(&mut self, event: &RawEvent) {
        let pressed = event.value != 0;
        match event.code {
            codes::BTN_TOOL_PEN..=codes::BTN_TOOL_LENS => {
                self.update_tool(ToolType::from_key_code(event.code), pressed);
            }
            codes::BTN_TOUCH => {
                // Contact signal first, then ordinary button tracking for the
                // same code.
                self.status.stylus_in_contact = pressed;
                self.update_button(event.code, pressed);
            }
            _ => self.update_button(event.code, pressed),
        }
    }

    fn process_misc(&mut self, event: &RawEvent) {
        match event.code {
            codes::MSC_SERIAL => {
                // -1 is the "no serial available" sentinel and must not
                // clobber a serial we already saw.
                if event.value != -1 {
                    self.current_tool_serial = event.value as u32;
                }
            }
            _ => {
                info!("unhandled MSC event code {:#x}", event.code);
            }
        }
    }

    fn update_tool(&mut self, tool_type: ToolType, entering: bool) {
        if entering {
            self.current_tool_type = Some(tool_type);
            // Per-axis deltas from the previous tool are meaningless for a
            // newly proximate one; its first frame is a full snapshot.
            self.mark_all_axes_changed();
            self.status.entering_proximity = true;
            self.status.out_of_proximity = false;
        } else {
            self.status.leaving_proximity = true;
        }
    }

    fn update_button(&mut self, code: u16, pressed: bool) {
        let Some(button) = ButtonCode::from_raw(code) else {
            info!("unhandled button {code:#x}");
            return;
        };
        self.buttons.set(button, pressed);
        if pressed {
            self.status.buttons_pressed = true;
        } else {
            self.status.buttons_released = true;
        }
    }

    fn mark_all_axes_changed(&mut self) {
        let caps = self.axis_caps;
        for axis in caps.iter() {
            self.changed_axes.insert(axis);
        }
        self.status.axes_updated = true;
    }

    // ── Frame flush ───────────────────────────────────────────────────────────

    /// Flushes the accumulated frame: resolves the active tool, sanitizes and
    /// publishes axes, reports button edges (releases before presses), and
    /// performs end-of-frame rollover.
    fn flush(&mut self, time: u64) {
        let Some(tool_type) = self.current_tool_type else {
            // No tool has ever been reported; nothing can be attributed yet.
            self.buttons.snapshot();
            return;
        };
        let tool = self.resolve_tool(tool_type);

        if self.status.leaving_proximity {
            // Every held button must be reported released before the tool
            // disappears.
            self.buttons.clear_current();
            self.status.buttons_released = true;
        } else if self.status.axes_updated || self.status.entering_proximity {
            self.sanitize_axes();
            self.notify_axes(time, &tool);
            self.status.entering_proximity = false;
            self.status.axes_updated = false;
        }

        if self.status.buttons_released {
            self.notify_buttons(time, &tool, ButtonChange::Released);
            self.status.buttons_released = false;
        }

        if self.status.buttons_pressed {
            self.notify_buttons(time, &tool, ButtonChange::Pressed);
            self.status.buttons_pressed = false;
        }

        if self.status.leaving_proximity {
            self.changed_axes.clear();
            self.sink.proximity(
                time,
                &tool,
                ProximityState::Out,
                self.changed_axes,
                &self.axes,
            );
            self.status.out_of_proximity = true;
            self.status.leaving_proximity = false;

            // Orientation may only change between proximity sessions.
            self.apply_pending_left_handed();
        }

        self.buttons.snapshot();
    }

    /// Resolves the active tool for this frame, creating it (and its
    /// capability set) on first sight. Serialized tools live in the shared
    /// registry, serial-0 tools in the device-local one.
    fn resolve_tool(&mut self, tool_type: ToolType) -> Arc<Tool> {
        let registry = if self.current_tool_serial != 0 {
            self.shared_tools.as_ref()
        } else {
            &self.local_tools
        };

        let transport = &self.transport;
        let database = &self.database;
        let tool_id = self.current_tool_id;
        registry.resolve(tool_type, tool_id, self.current_tool_serial, || {
            resolve_capabilities(tool_type, tool_id, transport.as_ref(), database.as_ref())
        })
    }

    /// Hardware-quirk compensation, applied before normalization.
    fn sanitize_axes(&mut self) {
        let distance = self.transport.abs_info(Axis::Distance);
        let pressure = self.transport.abs_info(Axis::Pressure);

        // Distance and pressure are mutually exclusive: a distance reading
        // while the pen presses down is the pad hallucinating.
        if let (Some(distance), Some(pressure)) = (distance, pressure) {
            if self.changed_axes.contains(Axis::Distance)
                && distance.value > distance.minimum
                && pressure.value > pressure.minimum
            {
                self.changed_axes.remove(Axis::Distance);
                self.axes.set(Axis::Distance, 0.0);
                return;
            }
        }

        // Pressure without contact is noise. Publish exactly one zero at the
        // edge, then suppress the repeats.
        if self.changed_axes.contains(Axis::Pressure) && !self.status.stylus_in_contact {
            if self.axes.get(Axis::Pressure) == 0.0 {
                self.changed_axes.remove(Axis::Pressure);
            } else {
                self.axes.set(Axis::Pressure, 0.0);
            }
        }
    }

    /// Normalizes every changed axis and emits the frame's axis
    /// notification, then resets the changed set.
    fn notify_axes(&mut self, time: u64, tool: &Arc<Tool>) {
        let mut update_needed = false;
        let changed = self.changed_axes;
        for axis in changed.iter() {
            let Some(info) = self.transport.abs_info(axis) else {
                error!("axis {axis:?} marked changed without calibration data");
                continue;
            };
            let value = match axis {
                Axis::X | Axis::Y => {
                    if self.left_handed.enabled {
                        f64::from(mirror_position(&info))
                    } else {
                        f64::from(info.value)
                    }
                }
                Axis::Pressure | Axis::Distance => normalize_unit(&info),
                Axis::TiltX | Axis::TiltY => normalize_tilt(&info),
            };
            self.axes.set(axis, value);
            update_needed = true;
        }

        // Tablets half-detecting a tool near the proximity edge send axis
        // events with garbage values; nothing is published until the tool is
        // properly in proximity.
        if update_needed
            && !self.status.out_of_proximity
            && !self.status.leaving_proximity
        {
            if self.status.entering_proximity {
                self.sink.proximity(
                    time,
                    tool,
                    ProximityState::In,
                    self.changed_axes,
                    &self.axes,
                );
            } else {
                self.sink
                    .axis_update(time, tool, self.changed_axes, &self.axes);
            }
        }

        self.changed_axes.clear();
    }

    /// Emits one button notification per changed code for the given edge.
    fn notify_buttons(&mut self, time: u64, tool: &Arc<Tool>, change: ButtonChange) {
        let set = match change {
            ButtonChange::Pressed => self.buttons.pressed(),
            ButtonChange::Released => self.buttons.released(),
        };
        for button in set.iter() {
            self.sink.button(time, tool, &self.axes, button, change);
        }
    }

    fn apply_pending_left_handed(&mut self) {
        if self.left_handed.enabled == self.left_handed.want_enabled {
            return;
        }
        if !self.status.out_of_proximity {
            return;
        }
        self.left_handed.enabled = self.left_handed.want_enabled;
        debug!(enabled = self.left_handed.enabled, "applied left-handed change");
    }
}

/// Asks the database whether this tablet is physically reversible.
///
/// Unknown models and database failures assume reversibility: refusing a
/// left-handed setup on hardware we cannot identify helps nobody.
fn query_reversible(transport: &dyn DeviceTransport, database: &dyn StylusDatabase) -> bool {
    let id = transport.device_id();
    match database.lookup_tablet(id.vendor, id.product) {
        Ok(Some(entry)) => entry.reversible,
        Ok(None) => {
            info!(
                "tablet {:04x}:{:04x} unknown to the stylus database, assuming reversible",
                id.vendor, id.product
            );
            true
        }
        Err(err) => {
            error!("stylus database error: {err}, assuming reversible");
            true
        }
    }
}
