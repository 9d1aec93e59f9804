//! Canonical control codes.
//!
//! The renderer only understands a fixed set of controls. Every binding profile is
//! seeded from [`canonical()`], which assigns each control a default physical code,
//! a short label and an axis flag.
//!
//! ## Code conventions
//! - [`VirtualCode::UNMAPPED`] (`0`) is the lookup-miss sentinel and never names a control.
//! - Canonical controls use `1..=21` in the order listed below.
//! - The default physical code of each control equals its virtual code, so a fresh
//!   profile is the identity mapping over the canonical set.
//!
//! ## Controls
//! - Face buttons: `a`, `b`, `x`, `y`
//! - Shoulders: `lb`, `rb`; triggers `lt`, `rt` (axes)
//! - System: `start`, `back`, `guide`
//! - D-pad: `dpad_up`, `dpad_down`, `dpad_left`, `dpad_right`
//! - Stick clicks: `analog_left`, `analog_right`
//! - Sticks: `lx`, `ly`, `rx`, `ry` (axes)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical control identifier understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualCode(pub u16);

/// Raw signal identifier as reported by a device driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalCode(pub u16);

impl VirtualCode {
    /// Returned by lookups for physical codes that were never bound.
    pub const UNMAPPED: VirtualCode = VirtualCode(0);

    pub const PAD_A: VirtualCode = VirtualCode(1);
    pub const PAD_B: VirtualCode = VirtualCode(2);
    pub const PAD_X: VirtualCode = VirtualCode(3);
    pub const PAD_Y: VirtualCode = VirtualCode(4);
    pub const PAD_GUIDE: VirtualCode = VirtualCode(5);
    pub const PAD_LT: VirtualCode = VirtualCode(6);
    pub const PAD_RT: VirtualCode = VirtualCode(7);
    pub const PAD_LB: VirtualCode = VirtualCode(8);
    pub const PAD_RB: VirtualCode = VirtualCode(9);
    pub const PAD_START: VirtualCode = VirtualCode(10);
    pub const PAD_BACK: VirtualCode = VirtualCode(11);
    pub const PAD_DPAD_UP: VirtualCode = VirtualCode(12);
    pub const PAD_DPAD_DOWN: VirtualCode = VirtualCode(13);
    pub const PAD_DPAD_LEFT: VirtualCode = VirtualCode(14);
    pub const PAD_DPAD_RIGHT: VirtualCode = VirtualCode(15);
    pub const PAD_L_ANALOG: VirtualCode = VirtualCode(16);
    pub const PAD_R_ANALOG: VirtualCode = VirtualCode(17);
    pub const PAD_LX: VirtualCode = VirtualCode(18);
    pub const PAD_LY: VirtualCode = VirtualCode(19);
    pub const PAD_RX: VirtualCode = VirtualCode(20);
    pub const PAD_RY: VirtualCode = VirtualCode(21);

    /// `true` for the lookup-miss sentinel.
    #[inline]
    pub fn is_unmapped(self) -> bool {
        self == Self::UNMAPPED
    }

    /// Label of the canonical control, if this code names one.
    pub fn label(self) -> Option<&'static str> {
        by_virtual(self).map(|c| c.label)
    }
}

impl fmt::Display for VirtualCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None if self.is_unmapped() => f.write_str("unmapped"),
            None => write!(f, "#{}", self.0),
        }
    }
}

/// Error returned when a label names no canonical control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown control label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for VirtualCode {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        by_label(s)
            .map(|c| c.virtual_code)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for PhysicalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for PhysicalCode {
    fn from(raw: u16) -> Self {
        PhysicalCode(raw)
    }
}

/// One row of the built-in control table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalCode {
    /// Physical code bound to this control in a fresh profile.
    pub default_physical: PhysicalCode,
    /// Short stable label (also used for parsing).
    pub label: &'static str,
    pub virtual_code: VirtualCode,
    /// Continuous analog signal rather than a digital one.
    pub is_axis: bool,
}

const fn row(virtual_code: VirtualCode, label: &'static str, is_axis: bool) -> CanonicalCode {
    CanonicalCode {
        default_physical: PhysicalCode(virtual_code.0),
        label,
        virtual_code,
        is_axis,
    }
}

static CANONICAL: [CanonicalCode; 21] = [
    row(VirtualCode::PAD_A, "a", false),
    row(VirtualCode::PAD_B, "b", false),
    row(VirtualCode::PAD_X, "x", false),
    row(VirtualCode::PAD_Y, "y", false),
    row(VirtualCode::PAD_GUIDE, "guide", false),
    row(VirtualCode::PAD_LT, "lt", true),
    row(VirtualCode::PAD_RT, "rt", true),
    row(VirtualCode::PAD_RB, "rb", false),
    row(VirtualCode::PAD_START, "start", false),
    row(VirtualCode::PAD_BACK, "back", false),
    row(VirtualCode::PAD_DPAD_UP, "dpad_up", false),
    row(VirtualCode::PAD_DPAD_DOWN, "dpad_down", false),
    row(VirtualCode::PAD_DPAD_LEFT, "dpad_left", false),
    row(VirtualCode::PAD_LB, "lb", false),
    row(VirtualCode::PAD_DPAD_RIGHT, "dpad_right", false),
    row(VirtualCode::PAD_L_ANALOG, "analog_left", false),
    row(VirtualCode::PAD_R_ANALOG, "analog_right", false),
    row(VirtualCode::PAD_LX, "lx", true),
    row(VirtualCode::PAD_LY, "ly", true),
    row(VirtualCode::PAD_RX, "rx", true),
    row(VirtualCode::PAD_RY, "ry", true),
];

/// The full canonical table, in declaration order.
#[inline]
pub fn canonical() -> &'static [CanonicalCode] {
    &CANONICAL
}

/// Looks up a canonical control by virtual code.
pub fn by_virtual(code: VirtualCode) -> Option<&'static CanonicalCode> {
    CANONICAL.iter().find(|c| c.virtual_code == code)
}

/// Looks up a canonical control by label (case-insensitive).
pub fn by_label(label: &str) -> Option<&'static CanonicalCode> {
    let label = label.trim();
    CANONICAL.iter().find(|c| c.label.eq_ignore_ascii_case(label))
}
