use crate::codes::{self, PhysicalCode, VirtualCode};
use crate::device::Device;
use crate::event::InputKind;
use std::collections::VecDeque;

/// A controller driven from code instead of hardware.
///
/// [`press`](Self::press), [`release`](Self::release) and [`move_axis`](Self::move_axis)
/// report raw physical codes as a capture layer would. The `*_control` methods script a
/// stock controller: each canonical control is reported under its default physical code,
/// so a default profile passes it straight through and an override shows up as a remap.
#[derive(Debug, Default)]
pub struct VirtualDevice {
    id: String,
    name: String,
    queue: VecDeque<InputKind>,
}

impl VirtualDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            queue: VecDeque::new(),
        }
    }

    pub fn press(&mut self, physical: PhysicalCode) {
        self.queue.push_back(InputKind::ButtonPressed { button: physical.0 });
    }

    pub fn release(&mut self, physical: PhysicalCode) {
        self.queue.push_back(InputKind::ButtonReleased { button: physical.0 });
    }

    pub fn move_axis(&mut self, physical: PhysicalCode, value: f32) {
        self.queue.push_back(InputKind::AxisMoved {
            axis: physical.0,
            value,
        });
    }

    /// Presses the physical input a stock controller wires to `control`.
    ///
    /// Returns `false`, queuing nothing, when `control` is not in the canonical table.
    pub fn press_control(&mut self, control: VirtualCode) -> bool {
        self.script(control, |dev, physical| dev.press(physical))
    }

    pub fn release_control(&mut self, control: VirtualCode) -> bool {
        self.script(control, |dev, physical| dev.release(physical))
    }

    /// Press immediately followed by release.
    pub fn tap_control(&mut self, control: VirtualCode) -> bool {
        self.script(control, |dev, physical| {
            dev.press(physical);
            dev.release(physical);
        })
    }

    pub fn move_control(&mut self, control: VirtualCode, value: f32) -> bool {
        self.script(control, |dev, physical| dev.move_axis(physical, value))
    }

    /// Queues the resting state of every canonical control: axes at `0.0`, buttons released.
    pub fn neutral(&mut self) {
        for c in codes::canonical() {
            if c.is_axis {
                self.move_axis(c.default_physical, 0.0);
            } else {
                self.release(c.default_physical);
            }
        }
    }

    /// Deltas queued since the last poll.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn script<F>(&mut self, control: VirtualCode, emit: F) -> bool
    where
        F: FnOnce(&mut Self, PhysicalCode),
    {
        match codes::by_virtual(control) {
            Some(c) => {
                emit(self, c.default_physical);
                true
            }
            None => false,
        }
    }
}

impl Device for VirtualDevice {
    fn poll(&mut self) -> Vec<InputKind> {
        self.queue.drain(..).collect()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}
