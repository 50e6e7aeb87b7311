//! Tool identity: the closed tool-type enumeration, per-tool capability sets,
//! and the search-or-create registry that gives one physical stylus one
//! `Tool` value for as long as anything still references it.
//!
//! Serial numbers decide the identity scope. A tool reporting a non-zero
//! serial is globally unique hardware and lives in a registry shared across
//! every device; a tool without a serial cannot be proven identical across
//! devices or proximity sessions, so it is keyed by type alone inside the one
//! dispatcher that saw it. Both scopes use the same [`ToolRegistry`] type —
//! the serial value selects the matching rule.
//!
//! Ownership is `Arc`-based: the registry holds one reference, every frame
//! that names the tool as active holds another, and the tool is reclaimed
//! when the last owner drops. There is no eviction while a dispatcher lives.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::axes::{Axis, AxisSet};
use crate::buttons::{ButtonCode, ButtonSet};
use crate::events::codes;

/// The kind of physical tool in proximity. There is no "none" — a `Tool`
/// exists only once a concrete type has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    Pen,
    Eraser,
    Brush,
    Pencil,
    Airbrush,
    Finger,
    Mouse,
    Lens,
}

impl ToolType {
    /// Converts a `BTN_TOOL_*` key code to a tool type.
    ///
    /// # Panics
    ///
    /// Panics on any code outside `BTN_TOOL_PEN..=BTN_TOOL_LENS`. Callers
    /// gate on that contiguous range before converting, so reaching the
    /// panic means a classification bug, not bad transport input.
    pub fn from_key_code(code: u16) -> ToolType {
        match code {
            codes::BTN_TOOL_PEN => ToolType::Pen,
            codes::BTN_TOOL_RUBBER => ToolType::Eraser,
            codes::BTN_TOOL_BRUSH => ToolType::Brush,
            codes::BTN_TOOL_PENCIL => ToolType::Pencil,
            codes::BTN_TOOL_AIRBRUSH => ToolType::Airbrush,
            codes::BTN_TOOL_FINGER => ToolType::Finger,
            codes::BTN_TOOL_MOUSE => ToolType::Mouse,
            codes::BTN_TOOL_LENS => ToolType::Lens,
            _ => unreachable!("key code {code:#x} is not a tool-presence code"),
        }
    }

    /// Returns the `BTN_TOOL_*` key code for this type.
    pub fn to_key_code(self) -> u16 {
        match self {
            ToolType::Pen => codes::BTN_TOOL_PEN,
            ToolType::Eraser => codes::BTN_TOOL_RUBBER,
            ToolType::Brush => codes::BTN_TOOL_BRUSH,
            ToolType::Pencil => codes::BTN_TOOL_PENCIL,
            ToolType::Airbrush => codes::BTN_TOOL_AIRBRUSH,
            ToolType::Finger => codes::BTN_TOOL_FINGER,
            ToolType::Mouse => codes::BTN_TOOL_MOUSE,
            ToolType::Lens => codes::BTN_TOOL_LENS,
        }
    }

    /// Pen-family tools report pressure-style axes; mouse-family tools do not.
    pub fn is_pen_family(self) -> bool {
        matches!(
            self,
            ToolType::Pen
                | ToolType::Eraser
                | ToolType::Brush
                | ToolType::Pencil
                | ToolType::Airbrush
        )
    }

    /// Mouse-family tools (puck and lens cursor) carry pointer buttons.
    pub fn is_mouse_family(self) -> bool {
        matches!(self, ToolType::Mouse | ToolType::Lens)
    }
}

/// The axes and buttons a tool can actually deliver, as derived once at tool
/// creation. Never wider than what the owning device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolCapabilities {
    pub axes: AxisSet,
    pub buttons: ButtonSet,
}

/// One physical stylus/tool instance.
///
/// Immutable after creation; shared by reference wherever it is the active
/// tool of a frame.
#[derive(Debug)]
pub struct Tool {
    tool_type: ToolType,
    tool_id: u32,
    serial: u32,
    capabilities: ToolCapabilities,
}

impl Tool {
    /// Creates a tool with an already-resolved capability set.
    pub fn new(
        tool_type: ToolType,
        tool_id: u32,
        serial: u32,
        capabilities: ToolCapabilities,
    ) -> Tool {
        Tool { tool_type, tool_id, serial, capabilities }
    }

    pub fn tool_type(&self) -> ToolType {
        self.tool_type
    }

    /// Hardware tool id, meaningful only for database lookups.
    pub fn tool_id(&self) -> u32 {
        self.tool_id
    }

    /// Hardware serial number; 0 means identity is device-local.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn has_serial(&self) -> bool {
        self.serial != 0
    }

    pub fn capabilities(&self) -> &ToolCapabilities {
        &self.capabilities
    }

    pub fn supports_axis(&self, axis: Axis) -> bool {
        self.capabilities.axes.contains(axis)
    }

    pub fn supports_button(&self, code: ButtonCode) -> bool {
        self.capabilities.buttons.contains(code)
    }
}

/// A search-or-create list of shared [`Tool`]s.
///
/// The same type backs both identity scopes: a process-wide registry for
/// serialized tools (wrap it in an `Arc` and hand a handle to every
/// dispatcher) and a per-dispatcher registry for serial-0 tools. Lookups are
/// serialized internally so dispatchers on separate threads can share the
/// global instance.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Mutex<Vec<Arc<Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> ToolRegistry {
        ToolRegistry { tools: Mutex::new(Vec::new()) }
    }

    /// Returns the tool for `(tool_type, serial)`, creating it on first sight.
    ///
    /// With a non-zero serial the match is on type and serial; without one it
    /// is on type alone. `make_capabilities` runs only when a new tool is
    /// actually created, since capability resolution may consult a database.
    pub fn resolve(
        &self,
        tool_type: ToolType,
        tool_id: u32,
        serial: u32,
        make_capabilities: impl FnOnce() -> ToolCapabilities,
    ) -> Arc<Tool> {
        let mut tools = self.tools.lock().expect("lock poisoned");

        let existing = tools.iter().find(|tool| {
            tool.tool_type() == tool_type && (serial == 0 || tool.serial() == serial)
        });
        if let Some(tool) = existing {
            return Arc::clone(tool);
        }

        let tool = Arc::new(Tool::new(tool_type, tool_id, serial, make_capabilities()));
        tools.push(Arc::clone(&tool));
        tool
    }

    /// Number of tools currently registered.
    pub fn len(&self) -> usize {
        self.tools.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_caps() -> ToolCapabilities {
        ToolCapabilities::default()
    }

    #[test]
    fn test_tool_codes_round_trip() {
        for tool_type in [
            ToolType::Pen,
            ToolType::Eraser,
            ToolType::Brush,
            ToolType::Pencil,
            ToolType::Airbrush,
            ToolType::Finger,
            ToolType::Mouse,
            ToolType::Lens,
        ] {
            assert_eq!(ToolType::from_key_code(tool_type.to_key_code()), tool_type);
        }
    }

    #[test]
    #[should_panic(expected = "not a tool-presence code")]
    fn test_from_key_code_panics_outside_the_tool_range() {
        ToolType::from_key_code(codes::BTN_STYLUS);
    }

    #[test]
    fn test_serialized_resolve_matches_type_and_serial() {
        // Arrange
        let registry = ToolRegistry::new();
        let first = registry.resolve(ToolType::Pen, 0x802, 12345, no_caps);

        // Act – same identity, then same type with a different serial
        let same = registry.resolve(ToolType::Pen, 0x802, 12345, no_caps);
        let other = registry.resolve(ToolType::Pen, 0x802, 99999, no_caps);

        // Assert
        assert!(Arc::ptr_eq(&first, &same), "identical serial must share the tool");
        assert!(!Arc::ptr_eq(&first, &other), "a new serial is a new tool");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unserialized_resolve_matches_type_alone() {
        let registry = ToolRegistry::new();
        let first = registry.resolve(ToolType::Pen, 0, 0, no_caps);

        // A second serial-0 pen is the same device-local tool, whatever its id.
        let again = registry.resolve(ToolType::Pen, 7, 0, no_caps);
        let eraser = registry.resolve(ToolType::Eraser, 0, 0, no_caps);

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &eraser));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_capabilities_are_computed_once_per_tool() {
        let registry = ToolRegistry::new();
        let mut calls = 0;

        registry.resolve(ToolType::Pen, 0, 42, || {
            calls += 1;
            ToolCapabilities::default()
        });
        registry.resolve(ToolType::Pen, 0, 42, || {
            calls += 1;
            ToolCapabilities::default()
        });

        assert_eq!(calls, 1, "lookup hits must not recompute capabilities");
    }

    #[test]
    fn test_tools_outlive_one_owner_through_shared_references() {
        let registry = Arc::new(ToolRegistry::new());
        let tool = registry.resolve(ToolType::Eraser, 0, 777, no_caps);

        // Dropping one handle leaves the registry's reference intact.
        drop(tool);
        let again = registry.resolve(ToolType::Eraser, 0, 777, no_caps);
        assert_eq!(again.serial(), 777);
        assert_eq!(registry.len(), 1);
    }
}
