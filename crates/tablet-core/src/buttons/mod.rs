//! Tracked buttons: the closed button allow-list, bounded button sets, and the
//! press/release diff computed between consecutive frames.
//!
//! Only the codes in [`ButtonCode`] participate in notification logic. Any
//! other key code observed in the raw stream is the transport's business, not
//! ours; the dispatcher logs it and moves on.

use serde::{Deserialize, Serialize};

use crate::events::codes;

/// The fixed allow-list of trackable button codes.
///
/// The first eight are the standard pointer buttons in `BTN_LEFT..` order —
/// puck-style tools enumerate their buttons from this sequence. `Touch`
/// doubles as the stylus-in-contact signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonCode {
    Left,
    Right,
    Middle,
    Side,
    Extra,
    Forward,
    Back,
    Task,
    Touch,
    Stylus,
    Stylus2,
}

impl ButtonCode {
    /// Every tracked code, in stable iteration order.
    pub const ALL: [ButtonCode; 11] = [
        ButtonCode::Left,
        ButtonCode::Right,
        ButtonCode::Middle,
        ButtonCode::Side,
        ButtonCode::Extra,
        ButtonCode::Forward,
        ButtonCode::Back,
        ButtonCode::Task,
        ButtonCode::Touch,
        ButtonCode::Stylus,
        ButtonCode::Stylus2,
    ];

    /// The pointer buttons in hardware code order, for enumerating puck-style
    /// tool capabilities ("left-click plus N-1 more").
    pub const POINTER: [ButtonCode; 8] = [
        ButtonCode::Left,
        ButtonCode::Right,
        ButtonCode::Middle,
        ButtonCode::Side,
        ButtonCode::Extra,
        ButtonCode::Forward,
        ButtonCode::Back,
        ButtonCode::Task,
    ];

    /// Stable index of this code, `0..ButtonCode::ALL.len()`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Maps a raw `BTN_*` code onto the allow-list.
    ///
    /// Returns `None` for every untracked code — including legitimate hardware
    /// buttons this subsystem deliberately ignores.
    pub fn from_raw(code: u16) -> Option<ButtonCode> {
        match code {
            codes::BTN_LEFT => Some(ButtonCode::Left),
            codes::BTN_RIGHT => Some(ButtonCode::Right),
            codes::BTN_MIDDLE => Some(ButtonCode::Middle),
            codes::BTN_SIDE => Some(ButtonCode::Side),
            codes::BTN_EXTRA => Some(ButtonCode::Extra),
            codes::BTN_FORWARD => Some(ButtonCode::Forward),
            codes::BTN_BACK => Some(ButtonCode::Back),
            codes::BTN_TASK => Some(ButtonCode::Task),
            codes::BTN_TOUCH => Some(ButtonCode::Touch),
            codes::BTN_STYLUS => Some(ButtonCode::Stylus),
            codes::BTN_STYLUS2 => Some(ButtonCode::Stylus2),
            _ => None,
        }
    }

    /// Returns the raw `BTN_*` code.
    pub fn to_raw(self) -> u16 {
        match self {
            ButtonCode::Left => codes::BTN_LEFT,
            ButtonCode::Right => codes::BTN_RIGHT,
            ButtonCode::Middle => codes::BTN_MIDDLE,
            ButtonCode::Side => codes::BTN_SIDE,
            ButtonCode::Extra => codes::BTN_EXTRA,
            ButtonCode::Forward => codes::BTN_FORWARD,
            ButtonCode::Back => codes::BTN_BACK,
            ButtonCode::Task => codes::BTN_TASK,
            ButtonCode::Touch => codes::BTN_TOUCH,
            ButtonCode::Stylus => codes::BTN_STYLUS,
            ButtonCode::Stylus2 => codes::BTN_STYLUS2,
        }
    }
}

/// A bounded set of tracked buttons with O(1) membership, iterated in
/// [`ButtonCode::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSet {
    bits: u16,
}

impl ButtonSet {
    /// The empty set.
    pub const EMPTY: ButtonSet = ButtonSet { bits: 0 };

    pub fn insert(&mut self, code: ButtonCode) {
        self.bits |= 1 << code.index();
    }

    pub fn remove(&mut self, code: ButtonCode) {
        self.bits &= !(1 << code.index());
    }

    pub fn contains(&self, code: ButtonCode) -> bool {
        self.bits & (1 << code.index()) != 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of buttons in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// The buttons present in `self` but absent from `other`.
    pub fn difference(&self, other: &ButtonSet) -> ButtonSet {
        ButtonSet { bits: self.bits & !other.bits }
    }

    /// Iterates the members in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = ButtonCode> + '_ {
        ButtonCode::ALL.into_iter().filter(|code| self.contains(*code))
    }
}

impl FromIterator<ButtonCode> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = ButtonCode>>(iter: I) -> ButtonSet {
        let mut set = ButtonSet::EMPTY;
        for code in iter {
            set.insert(code);
        }
        set
    }
}

/// Current and previous-frame button state.
///
/// The dispatcher mutates `current` as key events arrive; the flush snapshots
/// it into `previous` at the end of every frame, making [`pressed`] and
/// [`released`] well-defined deltas between consecutive synchronization
/// markers.
///
/// [`pressed`]: ButtonState::pressed
/// [`released`]: ButtonState::released
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    current: ButtonSet,
    previous: ButtonSet,
}

impl ButtonState {
    /// Records a press or release in the current frame.
    pub fn set(&mut self, code: ButtonCode, pressed: bool) {
        if pressed {
            self.current.insert(code);
        } else {
            self.current.remove(code);
        }
    }

    /// Buttons down now that were up at the last snapshot.
    pub fn pressed(&self) -> ButtonSet {
        self.current.difference(&self.previous)
    }

    /// Buttons up now that were down at the last snapshot.
    pub fn released(&self) -> ButtonSet {
        self.previous.difference(&self.current)
    }

    /// Drops every currently-held button, so the next [`released`] diff
    /// reports all of them. Used when a tool leaves proximity.
    ///
    /// [`released`]: ButtonState::released
    pub fn clear_current(&mut self) {
        self.current.clear();
    }

    /// End-of-frame rollover: current state becomes the comparison baseline.
    pub fn snapshot(&mut self) {
        self.previous = self.current;
    }
}
