//! Raw device deltas → canonical control events.
//!
//! Per event: resolve the device's profile in the registry, translate the physical
//! code, then shape the value by the entry's axis flag:
//!
//! | entry   | raw delta        | output                                   |
//! |---------|------------------|------------------------------------------|
//! | axis    | `AxisMoved`      | `Axis` with the same value               |
//! | axis    | button press     | `Axis` at `1.0`                          |
//! | axis    | button release   | `Axis` at `0.0`                          |
//! | digital | button edge      | `Pressed` / `Released`                   |
//! | digital | `AxisMoved`      | `Pressed` past [`AXIS_PRESS_THRESHOLD`], else `Released` |
//!
//! Devices with no profile and codes that translate to
//! [`VirtualCode::UNMAPPED`](crate::codes::VirtualCode::UNMAPPED) produce nothing.

use crate::binding::BindingProfile;
use crate::device::Device;
use crate::event::{ControlEvent, InputKind};
use crate::registry::BindingRegistry;

/// Magnitude at which an axis driving a digital control counts as pressed.
pub const AXIS_PRESS_THRESHOLD: f32 = 0.5;

/// Borrowing view over a registry for the input-polling path.
#[derive(Debug, Clone, Copy)]
pub struct Remapper<'a> {
    registry: &'a BindingRegistry,
}

impl<'a> Remapper<'a> {
    pub fn new(registry: &'a BindingRegistry) -> Self {
        Self { registry }
    }

    /// Translates one delta reported by `device_id`.
    pub fn translate(&self, device_id: &str, kind: &InputKind) -> Option<ControlEvent> {
        let profile = self.registry.resolve(device_id)?;
        translate_with(profile, kind)
    }

    /// Polls `device` and translates everything it reported.
    pub fn drain(&self, device: &mut dyn Device) -> Vec<ControlEvent> {
        let events = device.poll();
        let Some(profile) = device.profile(self.registry) else {
            tracing::trace!(device = device.id(), dropped = events.len(), "no binding profile");
            return Vec::new();
        };
        events
            .iter()
            .filter_map(|kind| translate_with(profile, kind))
            .collect()
    }
}

/// Translates one delta through a specific profile.
pub fn translate_with(profile: &BindingProfile, kind: &InputKind) -> Option<ControlEvent> {
    let entry = profile.entry(kind.physical_code())?;
    let code = entry.virtual_code;
    if code.is_unmapped() {
        return None;
    }

    let event = match (entry.is_axis, kind) {
        (true, InputKind::AxisMoved { value, .. }) => ControlEvent::Axis {
            code,
            value: *value,
        },
        (true, InputKind::ButtonPressed { .. }) => ControlEvent::Axis { code, value: 1.0 },
        (true, InputKind::ButtonReleased { .. }) => ControlEvent::Axis { code, value: 0.0 },
        (false, InputKind::AxisMoved { value, .. }) if value.abs() >= AXIS_PRESS_THRESHOLD => {
            ControlEvent::Pressed { code }
        }
        (false, InputKind::AxisMoved { .. }) => ControlEvent::Released { code },
        (false, InputKind::ButtonPressed { .. }) => ControlEvent::Pressed { code },
        (false, InputKind::ButtonReleased { .. }) => ControlEvent::Released { code },
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::VirtualDevice;
    use crate::codes::{PhysicalCode, VirtualCode};
    use crate::diagnostics::DiagnosticLog;

    fn registry_for(device_id: &str, profile: BindingProfile) -> BindingRegistry {
        let mut registry = BindingRegistry::with_diagnostics(DiagnosticLog::new());
        let mut profile = profile;
        profile.add_device(device_id);
        registry.add(profile);
        registry
    }

    fn axis(axis: u16, value: f32) -> InputKind {
        InputKind::AxisMoved { axis, value }
    }

    #[test]
    fn default_profile_passes_codes_through() {
        let registry = registry_for("pad-1", BindingProfile::new());
        let remap = Remapper::new(&registry);

        assert_eq!(
            remap.translate("pad-1", &InputKind::ButtonPressed { button: 1 }),
            Some(ControlEvent::Pressed {
                code: VirtualCode::PAD_A,
            })
        );
        assert_eq!(
            remap.translate("pad-1", &axis(18, -0.3)),
            Some(ControlEvent::Axis {
                code: VirtualCode::PAD_LX,
                value: -0.3,
            })
        );
    }

    #[test]
    fn shape_follows_entry_axis_flag() {
        let mut profile = BindingProfile::new();
        profile.bind(PhysicalCode(40), VirtualCode::PAD_LT, true);
        profile.bind(PhysicalCode(41), VirtualCode::PAD_DPAD_UP, false);
        let registry = registry_for("pad-1", profile);
        let remap = Remapper::new(&registry);

        assert_eq!(
            remap.translate("pad-1", &InputKind::ButtonPressed { button: 40 }),
            Some(ControlEvent::Axis {
                code: VirtualCode::PAD_LT,
                value: 1.0,
            })
        );
        assert_eq!(
            remap.translate("pad-1", &axis(41, -0.9)),
            Some(ControlEvent::Pressed {
                code: VirtualCode::PAD_DPAD_UP,
            })
        );
        assert_eq!(
            remap.translate("pad-1", &axis(41, 0.1)),
            Some(ControlEvent::Released {
                code: VirtualCode::PAD_DPAD_UP,
            })
        );
    }

    #[test]
    fn unknown_device_and_unmapped_codes_are_dropped() {
        let mut profile = BindingProfile::new();
        profile.bind(PhysicalCode(2), VirtualCode::UNMAPPED, false);
        let registry = registry_for("pad-1", profile);
        let remap = Remapper::new(&registry);

        assert_eq!(remap.translate("pad-2", &InputKind::ButtonPressed { button: 1 }), None);
        assert_eq!(remap.translate("pad-1", &InputKind::ButtonPressed { button: 2 }), None);
        assert_eq!(remap.translate("pad-1", &InputKind::ButtonPressed { button: 700 }), None);
    }

    #[test]
    fn drain_uses_device_id() {
        let mut profile = BindingProfile::new();
        profile.bind(PhysicalCode(1), VirtualCode::PAD_B, false);
        let registry = registry_for("virtual:0", profile);

        let mut dev = VirtualDevice::new("virtual:0", "Virtual Pad");
        dev.press(PhysicalCode(1));
        dev.release(PhysicalCode(1));
        dev.press(PhysicalCode(900));

        let out = Remapper::new(&registry).drain(&mut dev);
        assert_eq!(
            out,
            vec![
                ControlEvent::Pressed {
                    code: VirtualCode::PAD_B,
                },
                ControlEvent::Released {
                    code: VirtualCode::PAD_B,
                },
            ]
        );

        let mut stranger = VirtualDevice::new("virtual:1", "Other");
        stranger.press(PhysicalCode(1));
        assert!(Remapper::new(&registry).drain(&mut stranger).is_empty());
    }
}
