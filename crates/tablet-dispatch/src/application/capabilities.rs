//! Tool capability resolution.
//!
//! Runs once per newly created tool. The database path derives the button
//! set and pressure-axis grant from the stylus model record; the fallback
//! path derives them from the tool type alone. Neither path ever grants a
//! capability the device transport does not report — resolution only narrows.

use tracing::{debug, error};

use tablet_core::{Axis, ButtonCode, ToolCapabilities, ToolType};

use crate::infrastructure::database::{StylusDatabase, StylusEntry, StylusKind};
use crate::infrastructure::transport::DeviceTransport;

/// The pressure-style axes a tool can carry beyond X/Y. Position itself is
/// implied by proximity and is not part of the per-tool capability set.
const PRESSURE_AXES: [Axis; 4] = [Axis::Pressure, Axis::Distance, Axis::TiltX, Axis::TiltY];

/// Derives the capability set for a tool that just came into existence.
///
/// Database misses and errors are logged and degrade to the type-based
/// heuristic; they never fail the caller.
pub fn resolve_capabilities(
    tool_type: ToolType,
    tool_id: u32,
    device: &dyn DeviceTransport,
    database: &dyn StylusDatabase,
) -> ToolCapabilities {
    match database.lookup_stylus(tool_id) {
        Ok(Some(entry)) => from_database(&entry, device),
        Ok(None) => {
            debug!(tool_id, "stylus not in database, using type heuristics");
            from_tool_type(tool_type, device)
        }
        Err(err) => {
            error!("stylus database lookup failed: {err}");
            from_tool_type(tool_type, device)
        }
    }
}

/// Database path: the model record states the button count and class.
fn from_database(entry: &StylusEntry, device: &dyn DeviceTransport) -> ToolCapabilities {
    let mut caps = ToolCapabilities::default();

    if entry.kind == StylusKind::Puck {
        // Pucks enumerate buttons from left-click upward.
        let count = (entry.buttons as usize).min(ButtonCode::POINTER.len());
        for button in &ButtonCode::POINTER[..count] {
            grant_button(&mut caps, *button, device);
        }
    } else {
        if entry.buttons >= 2 {
            grant_button(&mut caps, ButtonCode::Stylus2, device);
        }
        if entry.buttons >= 1 {
            grant_button(&mut caps, ButtonCode::Stylus, device);
        }
        grant_button(&mut caps, ButtonCode::Touch, device);
    }

    if entry.kind.is_pressure_sensitive() {
        for axis in PRESSURE_AXES {
            grant_axis(&mut caps, axis, device);
        }
    }

    caps
}

/// Fallback path: the tool type alone decides the family, the device bounds
/// everything.
fn from_tool_type(tool_type: ToolType, device: &dyn DeviceTransport) -> ToolCapabilities {
    let mut caps = ToolCapabilities::default();

    if tool_type.is_pen_family() {
        for axis in PRESSURE_AXES {
            grant_axis(&mut caps, axis, device);
        }
        grant_button(&mut caps, ButtonCode::Stylus, device);
        grant_button(&mut caps, ButtonCode::Stylus2, device);
        grant_button(&mut caps, ButtonCode::Touch, device);
    } else if tool_type.is_mouse_family() {
        for button in [
            ButtonCode::Left,
            ButtonCode::Middle,
            ButtonCode::Right,
            ButtonCode::Side,
            ButtonCode::Extra,
        ] {
            grant_button(&mut caps, button, device);
        }
    }

    caps
}

fn grant_axis(caps: &mut ToolCapabilities, axis: Axis, device: &dyn DeviceTransport) {
    if device.has_axis(axis) {
        caps.axes.insert(axis);
    }
}

fn grant_button(caps: &mut ToolCapabilities, button: ButtonCode, device: &dyn DeviceTransport) {
    if device.has_button(button) {
        caps.buttons.insert(button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::{
        DatabaseError, HeuristicStylusDatabase, TabletEntry,
    };
    use crate::infrastructure::transport::mock::MockTablet;

    /// A database whose every lookup fails, for the degraded path.
    struct BrokenDatabase;

    impl StylusDatabase for BrokenDatabase {
        fn lookup_tablet(
            &self,
            _vendor: u16,
            _product: u16,
        ) -> Result<Option<TabletEntry>, DatabaseError> {
            Err(DatabaseError::Backend("injected failure".to_string()))
        }

        fn lookup_stylus(&self, _tool_id: u32) -> Result<Option<StylusEntry>, DatabaseError> {
            Err(DatabaseError::Backend("injected failure".to_string()))
        }
    }

    /// A database knowing exactly one stylus model.
    struct OneStylus(StylusEntry);

    impl StylusDatabase for OneStylus {
        fn lookup_tablet(
            &self,
            _vendor: u16,
            _product: u16,
        ) -> Result<Option<TabletEntry>, DatabaseError> {
            Ok(None)
        }

        fn lookup_stylus(&self, tool_id: u32) -> Result<Option<StylusEntry>, DatabaseError> {
            Ok((tool_id == 0x802).then(|| self.0.clone()))
        }
    }

    fn pen_tablet() -> MockTablet {
        MockTablet::new()
            .with_axis(Axis::X, 0, 10000)
            .with_axis(Axis::Y, 0, 10000)
            .with_axis(Axis::Pressure, 0, 2047)
            .with_axis(Axis::Distance, 0, 63)
            .with_button(ButtonCode::Touch)
            .with_button(ButtonCode::Stylus)
            .with_button(ButtonCode::Stylus2)
    }

    #[test]
    fn test_heuristic_pen_gets_pressure_axes_and_stylus_buttons() {
        let device = pen_tablet();

        let caps =
            resolve_capabilities(ToolType::Pen, 0, &device, &HeuristicStylusDatabase);

        assert!(caps.axes.contains(Axis::Pressure));
        assert!(caps.axes.contains(Axis::Distance));
        // The device exposes no tilt, so the tool must not claim it.
        assert!(!caps.axes.contains(Axis::TiltX));
        assert!(caps.buttons.contains(ButtonCode::Stylus));
        assert!(caps.buttons.contains(ButtonCode::Touch));
        assert!(!caps.buttons.contains(ButtonCode::Left));
    }

    #[test]
    fn test_heuristic_mouse_gets_pointer_buttons_and_no_pressure() {
        let device = pen_tablet()
            .with_button(ButtonCode::Left)
            .with_button(ButtonCode::Right);

        let caps =
            resolve_capabilities(ToolType::Mouse, 0, &device, &HeuristicStylusDatabase);

        assert!(caps.axes.is_empty());
        assert!(caps.buttons.contains(ButtonCode::Left));
        assert!(caps.buttons.contains(ButtonCode::Right));
        // Middle is in the mouse set but absent from the device.
        assert!(!caps.buttons.contains(ButtonCode::Middle));
        assert!(!caps.buttons.contains(ButtonCode::Stylus));
    }

    #[test]
    fn test_heuristic_finger_gets_nothing() {
        let device = pen_tablet();

        let caps =
            resolve_capabilities(ToolType::Finger, 0, &device, &HeuristicStylusDatabase);

        assert!(caps.axes.is_empty());
        assert!(caps.buttons.is_empty());
    }

    #[test]
    fn test_database_stylus_gates_buttons_on_model_count() {
        let device = pen_tablet();
        let db = OneStylus(StylusEntry {
            name: "One-button pen".to_string(),
            buttons: 1,
            kind: StylusKind::Inking,
        });

        let caps = resolve_capabilities(ToolType::Pen, 0x802, &device, &db);

        assert!(caps.buttons.contains(ButtonCode::Stylus));
        assert!(!caps.buttons.contains(ButtonCode::Stylus2), "model has one button");
        assert!(caps.buttons.contains(ButtonCode::Touch));
        assert!(caps.axes.contains(Axis::Pressure));
    }

    #[test]
    fn test_database_puck_enumerates_pointer_buttons_without_pressure() {
        let device = MockTablet::new()
            .with_axis(Axis::X, 0, 10000)
            .with_axis(Axis::Y, 0, 10000)
            .with_axis(Axis::Pressure, 0, 1023)
            .with_button(ButtonCode::Left)
            .with_button(ButtonCode::Right)
            .with_button(ButtonCode::Middle)
            .with_button(ButtonCode::Side);
        let db = OneStylus(StylusEntry {
            name: "4D Mouse".to_string(),
            buttons: 3,
            kind: StylusKind::Puck,
        });

        let caps = resolve_capabilities(ToolType::Mouse, 0x802, &device, &db);

        assert!(caps.buttons.contains(ButtonCode::Left));
        assert!(caps.buttons.contains(ButtonCode::Right));
        assert!(caps.buttons.contains(ButtonCode::Middle));
        assert!(!caps.buttons.contains(ButtonCode::Side), "beyond the model's count");
        assert!(caps.axes.is_empty(), "pucks are not pressure-sensitive");
    }

    #[test]
    fn test_unknown_tool_id_falls_back_to_type_heuristics() {
        let device = pen_tablet();
        let db = OneStylus(StylusEntry {
            name: "Grip Pen".to_string(),
            buttons: 2,
            kind: StylusKind::General,
        });

        // 0x123 is not in the database; the pen heuristic applies.
        let caps = resolve_capabilities(ToolType::Pen, 0x123, &device, &db);

        assert!(caps.axes.contains(Axis::Pressure));
        assert!(caps.buttons.contains(ButtonCode::Stylus2));
    }

    #[test]
    fn test_database_failure_falls_back_to_type_heuristics() {
        let device = pen_tablet();

        let caps = resolve_capabilities(ToolType::Eraser, 0x802, &device, &BrokenDatabase);

        assert!(caps.axes.contains(Axis::Pressure));
        assert!(caps.buttons.contains(ButtonCode::Stylus));
    }
}
