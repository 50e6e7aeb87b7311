//! Tablet axes: the closed axis enumeration, bounded axis sets, calibrated
//! sample info, and the pure normalization rules.
//!
//! Axis values cross the dispatcher in two representations. Raw samples are
//! `i32` values inside a calibrated `[minimum, maximum]` range supplied by the
//! transport ([`AbsInfo`]). Published values are `f64`: pressure and distance
//! map linearly onto `[0.0, 1.0]`, tilt onto `[-1.0, 1.0]`, and X/Y pass the
//! raw integer through unchanged (mirrored when left-handed mode is active).
//!
//! A calibrated range with `maximum <= minimum` is a transport contract
//! violation. It is rejected once, at device initialization, via
//! [`AbsInfo::validate`] — never silently divided by at event time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::codes;

/// The measurement channels a tablet tool can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Pressure,
    Distance,
    TiltX,
    TiltY,
}

impl Axis {
    /// Every axis, in stable iteration order.
    pub const ALL: [Axis; 6] = [
        Axis::X,
        Axis::Y,
        Axis::Pressure,
        Axis::Distance,
        Axis::TiltX,
        Axis::TiltY,
    ];

    /// Number of axes in the enumeration.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable index of this axis, `0..Axis::COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Maps a raw `ABS_*` code to an axis.
    ///
    /// Returns `None` for codes outside the six-axis mapping; the dispatcher
    /// treats recognized-but-unhandled codes (wheel and 4D-mouse data)
    /// separately from genuinely unknown ones.
    pub fn from_code(code: u16) -> Option<Axis> {
        match code {
            codes::ABS_X => Some(Axis::X),
            codes::ABS_Y => Some(Axis::Y),
            codes::ABS_PRESSURE => Some(Axis::Pressure),
            codes::ABS_DISTANCE => Some(Axis::Distance),
            codes::ABS_TILT_X => Some(Axis::TiltX),
            codes::ABS_TILT_Y => Some(Axis::TiltY),
            _ => None,
        }
    }

    /// Returns the raw `ABS_*` code for this axis.
    pub fn to_code(self) -> u16 {
        match self {
            Axis::X => codes::ABS_X,
            Axis::Y => codes::ABS_Y,
            Axis::Pressure => codes::ABS_PRESSURE,
            Axis::Distance => codes::ABS_DISTANCE,
            Axis::TiltX => codes::ABS_TILT_X,
            Axis::TiltY => codes::ABS_TILT_Y,
        }
    }
}

/// Error raised when a device advertises an unusable axis calibration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalibrationError {
    /// `maximum <= minimum`: the range is empty and normalization would
    /// divide by zero (or worse, invert).
    #[error("axis {axis:?} reports an empty calibration range {minimum}..={maximum}")]
    EmptyRange {
        axis: Axis,
        minimum: i32,
        maximum: i32,
    },
}

/// A calibrated absolute-axis sample: the device-reported range plus the
/// current raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsInfo {
    pub minimum: i32,
    pub maximum: i32,
    pub value: i32,
}

impl AbsInfo {
    /// The width of the calibrated range as a float.
    pub fn range(&self) -> f64 {
        f64::from(self.maximum) - f64::from(self.minimum)
    }

    /// Checks the transport contract `maximum > minimum`.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::EmptyRange`] when the range is empty. This
    /// is a fatal configuration error at device-initialization time.
    pub fn validate(&self, axis: Axis) -> Result<(), CalibrationError> {
        if self.maximum > self.minimum {
            Ok(())
        } else {
            Err(CalibrationError::EmptyRange {
                axis,
                minimum: self.minimum,
                maximum: self.maximum,
            })
        }
    }
}

/// Linear map of a pressure or distance sample onto `[0.0, 1.0]`.
pub fn normalize_unit(info: &AbsInfo) -> f64 {
    f64::from(info.value - info.minimum) / info.range()
}

/// Linear map of a tilt sample onto `[-1.0, 1.0]`.
pub fn normalize_tilt(info: &AbsInfo) -> f64 {
    normalize_unit(info) * 2.0 - 1.0
}

/// Mirrors an X/Y position inside its calibrated range, for left-handed
/// (rotated) tablet orientation.
pub fn mirror_position(info: &AbsInfo) -> i32 {
    info.maximum - (info.value - info.minimum)
}

/// A bounded set of axes with O(1) membership, iterated in [`Axis::ALL`]
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSet {
    bits: u8,
}

impl AxisSet {
    /// The empty set.
    pub const EMPTY: AxisSet = AxisSet { bits: 0 };

    pub fn insert(&mut self, axis: Axis) {
        self.bits |= 1 << axis.index();
    }

    pub fn remove(&mut self, axis: Axis) {
        self.bits &= !(1 << axis.index());
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.bits & (1 << axis.index()) != 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of axes in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates the members in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|axis| self.contains(*axis))
    }
}

impl FromIterator<Axis> for AxisSet {
    fn from_iter<I: IntoIterator<Item = Axis>>(iter: I) -> AxisSet {
        let mut set = AxisSet::EMPTY;
        for axis in iter {
            set.insert(axis);
        }
        set
    }
}

/// Current published value of every axis, indexed by [`Axis`].
///
/// X and Y hold raw device coordinates; the remaining axes hold normalized
/// values. Starts zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisValues {
    values: [f64; Axis::COUNT],
}

impl AxisValues {
    pub fn get(&self, axis: Axis) -> f64 {
        self.values[axis.index()]
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        self.values[axis.index()] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(minimum: i32, maximum: i32, value: i32) -> AbsInfo {
        AbsInfo { minimum, maximum, value }
    }

    #[test]
    fn test_axis_codes_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_code(axis.to_code()), Some(axis));
        }
    }

    #[test]
    fn test_unhandled_abs_codes_do_not_map_to_axes() {
        for code in [
            codes::ABS_RX,
            codes::ABS_RY,
            codes::ABS_RZ,
            codes::ABS_THROTTLE,
            codes::ABS_MISC,
        ] {
            assert_eq!(Axis::from_code(code), None, "{code:#x}");
        }
    }

    #[test]
    fn test_normalize_unit_maps_range_endpoints() {
        // Round-trip property: minimum -> 0.0, maximum -> 1.0.
        assert_eq!(normalize_unit(&info(0, 100, 0)), 0.0);
        assert_eq!(normalize_unit(&info(0, 100, 100)), 1.0);
        assert_eq!(normalize_unit(&info(-50, 50, 0)), 0.5);
    }

    #[test]
    fn test_normalize_tilt_maps_range_endpoints() {
        assert_eq!(normalize_tilt(&info(-64, 63, -64)), -1.0);
        assert_eq!(normalize_tilt(&info(-64, 63, 63)), 1.0);
        assert_eq!(normalize_tilt(&info(-60, 60, 0)), 0.0);
    }

    #[test]
    fn test_normalization_is_monotonic_in_the_raw_value() {
        let mut previous_unit = f64::NEG_INFINITY;
        let mut previous_tilt = f64::NEG_INFINITY;
        for raw in -64..=63 {
            let unit = normalize_unit(&info(-64, 63, raw));
            let tilt = normalize_tilt(&info(-64, 63, raw));
            assert!(unit > previous_unit, "unit not monotonic at {raw}");
            assert!(tilt > previous_tilt, "tilt not monotonic at {raw}");
            assert!((0.0..=1.0).contains(&unit));
            assert!((-1.0..=1.0).contains(&tilt));
            previous_unit = unit;
            previous_tilt = tilt;
        }
    }

    #[test]
    fn test_mirror_position_reflects_within_the_range() {
        // A symmetric range mirrors around its midpoint.
        assert_eq!(mirror_position(&info(0, 1000, 0)), 1000);
        assert_eq!(mirror_position(&info(0, 1000, 1000)), 0);
        assert_eq!(mirror_position(&info(0, 1000, 250)), 750);
        // Non-zero minimum: value 120 sits 20 above minimum, mirror is max - 20.
        assert_eq!(mirror_position(&info(100, 500, 120)), 480);
    }

    #[test]
    fn test_validate_rejects_empty_ranges() {
        assert_eq!(
            info(10, 10, 10).validate(Axis::Pressure),
            Err(CalibrationError::EmptyRange {
                axis: Axis::Pressure,
                minimum: 10,
                maximum: 10,
            })
        );
        assert!(info(50, 0, 0).validate(Axis::X).is_err());
        assert!(info(0, 1, 0).validate(Axis::X).is_ok());
    }

    #[test]
    fn test_axis_set_membership_and_iteration_order() {
        // Arrange
        let mut set = AxisSet::EMPTY;

        // Act – insert out of enumeration order
        set.insert(Axis::TiltY);
        set.insert(Axis::X);
        set.insert(Axis::Pressure);

        // Assert – iteration follows Axis::ALL order regardless
        let collected: Vec<Axis> = set.iter().collect();
        assert_eq!(collected, vec![Axis::X, Axis::Pressure, Axis::TiltY]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(Axis::X));
        assert!(!set.contains(Axis::Distance));
    }

    #[test]
    fn test_axis_set_remove_and_clear() {
        let mut set: AxisSet = [Axis::X, Axis::Y].into_iter().collect();

        set.remove(Axis::X);
        assert!(!set.contains(Axis::X));
        assert!(set.contains(Axis::Y));

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_axis_values_default_to_zero() {
        let mut values = AxisValues::default();
        for axis in Axis::ALL {
            assert_eq!(values.get(axis), 0.0);
        }

        values.set(Axis::Pressure, 0.75);
        assert_eq!(values.get(Axis::Pressure), 0.75);
        assert_eq!(values.get(Axis::Distance), 0.0);
    }
}
