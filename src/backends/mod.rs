//! Input backends for `padbind`.
//!
//! Platform capture (HID, XInput, Raw Input) lives in the host. The only backend shipped
//! here is [`virtual_input`], a hand-fed [`Device`](crate::device::Device) for tests,
//! demos and hosts that already own their capture loop.

pub mod virtual_input;

pub use virtual_input::VirtualDevice;
