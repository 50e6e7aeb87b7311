//! Recorded-trace replay support.
//!
//! A trace file is a self-contained TOML description of one device and the
//! raw event stream it produced:
//!
//! ```toml
//! [device]
//! vendor = 1386
//! product = 222
//! buttons = ["touch", "stylus", "stylus2"]
//!
//! [[device.axis]]
//! axis = "x"
//! minimum = 0
//! maximum = 44704
//!
//! [[event]]
//! kind = "tool"
//! time = 1000
//! tool = "pen"
//! entering = true
//!
//! [[event]]
//! kind = "axis"
//! time = 1000
//! axis = "x"
//! value = 20002
//!
//! [[event]]
//! kind = "sync"
//! time = 1000
//! ```
//!
//! Replaying a trace drives the full dispatcher stack without a kernel
//! device: the loader builds a [`MockTablet`] from the device section, and
//! the runner applies each event to the mock before handing it to the
//! dispatcher, exactly as an event-device library keeps its state current.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use tablet_core::events::codes;
use tablet_core::{Axis, ButtonCode, RawEvent, ToolType};

use crate::infrastructure::transport::mock::MockTablet;

/// Error type for trace loading.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The trace file could not be read.
    #[error("I/O error reading trace at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trace content is not valid trace TOML.
    #[error("failed to parse trace TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A parsed trace file.
#[derive(Debug, Deserialize)]
pub struct TraceFile {
    pub device: DeviceSpec,
    #[serde(default, rename = "event")]
    pub events: Vec<EventSpec>,
}

/// The device description heading a trace.
#[derive(Debug, Deserialize)]
pub struct DeviceSpec {
    #[serde(default)]
    pub vendor: u16,
    #[serde(default)]
    pub product: u16,
    #[serde(default, rename = "axis")]
    pub axes: Vec<AxisSpec>,
    #[serde(default)]
    pub buttons: Vec<ButtonCode>,
}

/// One axis with its calibration range.
#[derive(Debug, Deserialize)]
pub struct AxisSpec {
    pub axis: Axis,
    pub minimum: i32,
    pub maximum: i32,
}

/// One recorded raw event, in a shape friendlier to hand-written TOML than
/// bare category/code numbers.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventSpec {
    /// An absolute axis sample.
    Axis { time: u64, axis: Axis, value: i32 },
    /// A tool entering or leaving proximity.
    Tool { time: u64, tool: ToolType, entering: bool },
    /// A contact or button transition.
    Button { time: u64, button: ButtonCode, pressed: bool },
    /// A tool serial-number report.
    Serial { time: u64, serial: i32 },
    /// A hardware tool-id report.
    ToolId { time: u64, id: i32 },
    /// A frame boundary.
    Sync { time: u64 },
}

impl EventSpec {
    /// Lowers this description to the raw wire event it stands for.
    pub fn to_raw(&self) -> RawEvent {
        match *self {
            EventSpec::Axis { time, axis, value } => RawEvent::absolute(time, axis.to_code(), value),
            EventSpec::Tool { time, tool, entering } => {
                RawEvent::key(time, tool.to_key_code(), entering)
            }
            EventSpec::Button { time, button, pressed } => {
                RawEvent::key(time, button.to_raw(), pressed)
            }
            EventSpec::Serial { time, serial } => RawEvent::misc(time, codes::MSC_SERIAL, serial),
            EventSpec::ToolId { time, id } => RawEvent::absolute(time, codes::ABS_MISC, id),
            EventSpec::Sync { time } => RawEvent::sync(time),
        }
    }
}

/// Loads and parses a trace file.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] if the file cannot be read and
/// [`ReplayError::Parse`] if it is not valid trace TOML.
pub fn load_trace(path: &Path) -> Result<TraceFile, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

/// Parses trace TOML from a string. Used by `load_trace` and by tests.
pub fn parse_trace(text: &str) -> Result<TraceFile, ReplayError> {
    Ok(toml::from_str(text)?)
}

/// Builds a mock transport matching the trace's device description.
pub fn build_tablet(device: &DeviceSpec) -> MockTablet {
    let mut tablet = MockTablet::new().with_id(device.vendor, device.product);
    for axis_spec in &device.axes {
        tablet = tablet.with_axis(axis_spec.axis, axis_spec.minimum, axis_spec.maximum);
    }
    for button in &device.buttons {
        tablet = tablet.with_button(*button);
    }
    tablet
}
