use crate::binding::BindingProfile;
use crate::event::InputKind;
use crate::registry::BindingRegistry;

/// A controller reporting raw input deltas, implemented by capture layers.
///
/// Codes in the reported [`InputKind`]s are physical codes. `id` is the string
/// profiles list under `devices` in the store, and it is what picks the profile
/// those codes are translated through.
pub trait Device {
    /// Deltas since the last poll, oldest first.
    fn poll(&mut self) -> Vec<InputKind>;
    fn name(&self) -> &str;
    fn id(&self) -> &str;

    /// The profile that claims this device; the first loaded claim wins.
    fn profile<'r>(&self, registry: &'r BindingRegistry) -> Option<&'r BindingProfile> {
        registry.resolve(self.id())
    }
}
