//! padbind — per-device gamepad binding profiles.
//!
//! Remaps raw controller codes onto the canonical controls a renderer understands and
//! persists those remappings per device in `~/.config/gamepad_bindings.json`.
//!
//! ```no_run
//! use padbind::{BindingRegistry, PhysicalCode};
//!
//! let mut registry = BindingRegistry::new();
//! registry.load_default();
//!
//! if let Some(profile) = registry.resolve("045e:02ea") {
//!     let code = profile.translate(PhysicalCode(5));
//!     println!("{} -> {}", 5, code);
//! }
//! ```

pub mod backends;
pub mod binding;
pub mod codec;
pub mod codes;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod registry;
pub mod remap;

pub use binding::*;
pub use codec::{default_store_path, BindRecord, ProfileRecord, SaveOptions};
pub use codes::{CanonicalCode, PhysicalCode, VirtualCode};
pub use device::*;
pub use diagnostics::{Diagnostic, DiagnosticLog, Diagnostics, Severity, TracingDiagnostics};
pub use error::*;
pub use event::*;
pub use registry::*;
pub use remap::Remapper;
