//! Raw evdev-style event codes recognized by the dispatcher.
//!
//! These mirror the Linux input event numbering so that recorded traces and
//! kernel-facing transports agree on the wire values. Only the codes a tablet
//! can legitimately report are listed; everything else is handled through the
//! logged-and-ignored paths of the dispatcher.

/// Event category values (the `type` field of a raw event).
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;

/// Synchronization marker terminating a hardware frame.
pub const SYN_REPORT: u16 = 0x00;

// ── Absolute axes ─────────────────────────────────────────────────────────────

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_PRESSURE: u16 = 0x18;
pub const ABS_DISTANCE: u16 = 0x19;
pub const ABS_TILT_X: u16 = 0x1a;
pub const ABS_TILT_Y: u16 = 0x1b;

/// Touch-strip data, reported by pad sub-devices of some tablets.
pub const ABS_RX: u16 = 0x03;
pub const ABS_RY: u16 = 0x04;
/// Rotation axis of the obsolete 4D mouse.
pub const ABS_RZ: u16 = 0x05;
/// Second-wheel data of the obsolete 4D mouse.
pub const ABS_THROTTLE: u16 = 0x06;
/// Hardware tool identifier used for stylus database lookups.
pub const ABS_MISC: u16 = 0x28;

// ── Tool presence keys ────────────────────────────────────────────────────────

// The eight tool codes form a contiguous range; `BTN_TOOL_PEN..=BTN_TOOL_LENS`
// is used as the range guard before type conversion.
pub const BTN_TOOL_PEN: u16 = 0x140;
pub const BTN_TOOL_RUBBER: u16 = 0x141;
pub const BTN_TOOL_BRUSH: u16 = 0x142;
pub const BTN_TOOL_PENCIL: u16 = 0x143;
pub const BTN_TOOL_AIRBRUSH: u16 = 0x144;
pub const BTN_TOOL_FINGER: u16 = 0x145;
pub const BTN_TOOL_MOUSE: u16 = 0x146;
pub const BTN_TOOL_LENS: u16 = 0x147;

// ── Buttons ───────────────────────────────────────────────────────────────────

pub const BTN_LEFT: u16 = 0x110;
pub const BTN_RIGHT: u16 = 0x111;
pub const BTN_MIDDLE: u16 = 0x112;
pub const BTN_SIDE: u16 = 0x113;
pub const BTN_EXTRA: u16 = 0x114;
pub const BTN_FORWARD: u16 = 0x115;
pub const BTN_BACK: u16 = 0x116;
pub const BTN_TASK: u16 = 0x117;

/// Tip contact. Doubles as a trackable button and as the in-contact signal.
pub const BTN_TOUCH: u16 = 0x14a;
pub const BTN_STYLUS: u16 = 0x14b;
pub const BTN_STYLUS2: u16 = 0x14c;

// ── Miscellaneous ─────────────────────────────────────────────────────────────

/// Tool serial number report. A raw value of -1 means "no serial available".
pub const MSC_SERIAL: u16 = 0x00;
