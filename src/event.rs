//! Raw and canonical input events.
//!
//! Capture layers report small device-local deltas ([`InputKind`]) whose channel index is
//! the raw physical code. [`Remapper`](crate::remap::Remapper) turns them into
//! [`ControlEvent`]s addressed by canonical [`VirtualCode`]s.
//!
//! ## Value conventions
//! - **Axes:** normalized to `[-1.0, 1.0]` (triggers `[0.0, 1.0]` where the source allows).
//! - **Buttons:** press/release edges.

use crate::codes::{PhysicalCode, VirtualCode};

/// Per-device raw input change.
#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    /// A continuous channel changed.
    AxisMoved { axis: u16, value: f32 },

    /// A button transitioned to pressed.
    ButtonPressed { button: u16 },

    /// A button transitioned to released.
    ButtonReleased { button: u16 },
}

impl InputKind {
    /// The raw code this delta is reported on.
    #[inline]
    pub fn physical_code(&self) -> PhysicalCode {
        match *self {
            InputKind::AxisMoved { axis, .. } => PhysicalCode(axis),
            InputKind::ButtonPressed { button } | InputKind::ButtonReleased { button } => {
                PhysicalCode(button)
            }
        }
    }
}

/// Canonical control change consumed by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    Axis { code: VirtualCode, value: f32 },
    Pressed { code: VirtualCode },
    Released { code: VirtualCode },
}

impl ControlEvent {
    pub fn code(&self) -> VirtualCode {
        match *self {
            ControlEvent::Axis { code, .. }
            | ControlEvent::Pressed { code }
            | ControlEvent::Released { code } => code,
        }
    }
}
