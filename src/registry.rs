//! The loaded set of binding profiles.
//!
//! [`BindingRegistry`] owns every profile, answers "which profile governs device X"
//! and drives load/save against the JSON store.
//!
//! # Semantics
//! - Profiles keep store order. [`BindingRegistry::resolve`] returns the **first**
//!   profile claiming a device, so when two profiles claim the same id the one loaded
//!   first wins. [`BindingRegistry::conflicts`] lists such ids for an editor to fix.
//! - [`BindingRegistry::load`] replaces the profile list and never fails: an
//!   unreadable or malformed store leaves the registry empty, a malformed element is
//!   skipped, and each case is reported to the injected [`Diagnostics`].
//! - [`BindingRegistry::save`] writes every profile in order. An unloaded registry
//!   saves an empty array.
//!
//! # Threading
//! The registry does no locking. Callers sharing it between an input-polling path
//! and an editing UI must serialize access themselves (for example behind a `Mutex`).

use crate::binding::BindingProfile;
use crate::codec::{self, ProfileRecord, SaveOptions};
use crate::diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics};
use crate::error::{LoadError, SaveError};
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Whether `load` has been called yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryState {
    #[default]
    Unloaded,
    Loaded,
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Profiles now in the registry.
    pub loaded: usize,
    /// Array elements that were not usable profile records.
    pub skipped: usize,
}

/// Outcome of a save that reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub profiles: usize,
    pub requested: usize,
    pub written: usize,
}

impl SaveReport {
    /// `false` after a short write under [`SaveOptions::best_effort`].
    pub fn is_complete(&self) -> bool {
        self.requested == self.written
    }
}

/// Ordered collection of binding profiles.
pub struct BindingRegistry {
    profiles: Vec<BindingProfile>,
    state: RegistryState,
    options: SaveOptions,
    diagnostics: Box<dyn Diagnostics>,
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("profiles", &self.profiles)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingRegistry {
    /// Empty, unloaded registry reporting through `tracing`.
    pub fn new() -> Self {
        Self::with_diagnostics(TracingDiagnostics)
    }

    pub fn with_diagnostics(diagnostics: impl Diagnostics + 'static) -> Self {
        Self {
            profiles: Vec::new(),
            state: RegistryState::Unloaded,
            options: SaveOptions::default(),
            diagnostics: Box::new(diagnostics),
        }
    }

    pub fn with_save_options(mut self, options: SaveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn save_options(&self) -> SaveOptions {
        self.options
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    // ---- load ----

    /// Loads the store at `~/.config/gamepad_bindings.json`.
    pub fn load_default(&mut self) -> LoadReport {
        let Some(path) = codec::default_store_path() else {
            self.profiles.clear();
            self.state = RegistryState::Loaded;
            self.diagnostics.report(
                Diagnostic::warning("Couldn't load gamepad bindings")
                    .with_detail("no home directory"),
            );
            return LoadReport::default();
        };
        self.load(&path)
    }

    /// Replaces the profile list with the contents of `path`.
    ///
    /// Never fails. An unreadable or malformed store is reported as a warning and
    /// leaves the registry empty.
    pub fn load(&mut self, path: &Path) -> LoadReport {
        match self.try_load(path) {
            Ok(report) => report,
            Err(err) => self.absorb(err, Some(path)),
        }
    }

    /// Like [`load`](Self::load) but hands store-level failures to the caller.
    ///
    /// The registry is empty and `Loaded` afterwards in either case.
    pub fn try_load(&mut self, path: &Path) -> Result<LoadReport, LoadError> {
        self.profiles.clear();
        self.state = RegistryState::Loaded;
        let bytes = codec::read_store(path)?;
        let report = self.load_bytes(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "loaded gamepad bindings"
        );
        Ok(report)
    }

    /// Replaces the profile list with a document read from `reader`.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> LoadReport {
        self.profiles.clear();
        self.state = RegistryState::Loaded;
        let mut bytes = Vec::new();
        if let Err(err) = reader.read_to_end(&mut bytes) {
            self.diagnostics
                .report(Diagnostic::warning("Couldn't load gamepad bindings").with_detail(err));
            return LoadReport::default();
        }
        match self.load_bytes(&bytes) {
            Ok(report) => report,
            Err(err) => self.absorb(err, None),
        }
    }

    fn load_bytes(&mut self, bytes: &[u8]) -> Result<LoadReport, LoadError> {
        let values = codec::decode_document(bytes)?;
        let mut report = LoadReport::default();

        for parsed in codec::parse_records(values) {
            match parsed {
                Ok(record) => {
                    self.profiles.push(BindingProfile::from_record(&record));
                    report.loaded += 1;
                }
                Err(issue) => {
                    self.diagnostics.report(
                        Diagnostic::warning("Skipped malformed gamepad binding")
                            .with_detail(&issue),
                    );
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    fn absorb(&mut self, err: LoadError, path: Option<&Path>) -> LoadReport {
        self.profiles.clear();
        let diagnostic = match (&err, path) {
            (LoadError::StoreUnavailable { source, .. }, Some(path)) => {
                Diagnostic::warning("Couldn't load gamepad bindings")
                    .with_detail(format_args!("{}: {}", path.display(), source))
            }
            (LoadError::StoreUnavailable { source, .. }, None) => {
                Diagnostic::warning("Couldn't load gamepad bindings").with_detail(source)
            }
            (LoadError::MalformedDocument(source), _) => {
                Diagnostic::warning("Json parse error").with_detail(source)
            }
            (LoadError::NotAnArray { found }, _) => Diagnostic::warning("Json parse error")
                .with_detail(format_args!("expected a top-level array, found {found}")),
        };
        self.diagnostics.report(diagnostic);
        LoadReport::default()
    }

    // ---- save ----

    /// Writes every profile to `~/.config/gamepad_bindings.json`.
    pub fn save_default(&self) -> Result<SaveReport, SaveError> {
        let Some(path) = codec::default_store_path() else {
            self.diagnostics.report(
                Diagnostic::warning("Couldn't save gamepad bindings")
                    .with_detail("no home directory"),
            );
            return Err(SaveError::StoreUnavailable {
                path: PathBuf::from(codec::STORE_FILE_NAME),
                source: io::Error::new(io::ErrorKind::NotFound, "no home directory"),
            });
        };
        self.save(&path)
    }

    /// Writes every profile to `path`.
    ///
    /// A store that can't be opened is reported as a warning and returned as
    /// [`SaveError::StoreUnavailable`]. A short write is always reported as an error;
    /// it fails the call only when [`SaveOptions::strict_writes`] is set.
    pub fn save(&self, path: &Path) -> Result<SaveReport, SaveError> {
        let bytes = self.encode()?;
        let written = match codec::write_store(path, &bytes, self.options) {
            Ok(written) => written,
            Err(err) => {
                let diagnostic = match &err {
                    SaveError::StoreUnavailable { source, .. } => {
                        Diagnostic::warning("Couldn't save gamepad bindings")
                            .with_detail(format_args!("{}: {}", path.display(), source))
                    }
                    other => Diagnostic::error("Couldn't write gamepad bindings")
                        .with_detail(format_args!("{}: {}", path.display(), other)),
                };
                self.diagnostics.report(diagnostic);
                return Err(err);
            }
        };
        self.check_written(bytes.len(), written, &path.display())
    }

    /// Writes the aggregate document to `writer`.
    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> Result<SaveReport, SaveError> {
        let bytes = self.encode()?;
        let written = codec::write_counted(&mut writer, &bytes).map_err(|err| {
            self.diagnostics
                .report(Diagnostic::error("Couldn't write gamepad bindings").with_detail(&err));
            SaveError::Io(err)
        })?;
        self.check_written(bytes.len(), written, &"writer")
    }

    /// The aggregate document as records, in registry order.
    pub fn to_records(&self) -> Vec<ProfileRecord> {
        self.profiles.iter().map(BindingProfile::to_record).collect()
    }

    fn encode(&self) -> Result<Vec<u8>, SaveError> {
        codec::encode_document(&self.to_records()).map_err(|err| {
            self.diagnostics
                .report(Diagnostic::error("Couldn't encode gamepad bindings").with_detail(&err));
            err
        })
    }

    fn check_written(
        &self,
        requested: usize,
        written: usize,
        store: &dyn fmt::Display,
    ) -> Result<SaveReport, SaveError> {
        if written != requested {
            self.diagnostics.report(
                Diagnostic::error("Couldn't write gamepad bindings")
                    .with_detail(format_args!("{store}: wrote {written} of {requested} bytes")),
            );
            if self.options.strict_writes {
                return Err(SaveError::ShortWrite { requested, written });
            }
        } else {
            tracing::debug!(
                %store,
                bytes = written,
                profiles = self.profiles.len(),
                "saved gamepad bindings"
            );
        }
        Ok(SaveReport {
            profiles: self.profiles.len(),
            requested,
            written,
        })
    }

    // ---- profiles ----

    /// First profile (in registry order) that claims `device_id`.
    pub fn resolve(&self, device_id: &str) -> Option<&BindingProfile> {
        self.profiles.iter().find(|p| p.claims(device_id))
    }

    pub fn resolve_mut(&mut self, device_id: &str) -> Option<&mut BindingProfile> {
        self.profiles.iter_mut().find(|p| p.claims(device_id))
    }

    /// Index of the profile [`resolve`](Self::resolve) would return.
    pub fn position(&self, device_id: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.claims(device_id))
    }

    /// Device ids claimed by more than one profile, with the claiming indices.
    ///
    /// Ids appear in first-claim order; indices are ascending.
    pub fn conflicts(&self) -> Vec<(String, Vec<usize>)> {
        let mut seen: Vec<(String, Vec<usize>)> = Vec::new();
        for (index, profile) in self.profiles.iter().enumerate() {
            for device in profile.devices() {
                match seen.iter_mut().find(|(id, _)| id == device) {
                    Some((_, owners)) => owners.push(index),
                    None => seen.push((device.clone(), vec![index])),
                }
            }
        }
        seen.retain(|(_, owners)| owners.len() > 1);
        seen
    }

    /// Appends a profile and returns its index.
    pub fn add(&mut self, profile: BindingProfile) -> usize {
        self.profiles.push(profile);
        self.profiles.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<BindingProfile> {
        (index < self.profiles.len()).then(|| self.profiles.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&BindingProfile> {
        self.profiles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BindingProfile> {
        self.profiles.get_mut(index)
    }

    pub fn profiles(&self) -> &[BindingProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BindingProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Drops every profile. The state is left as is.
    pub fn clear(&mut self) {
        self.profiles.clear();
    }
}

impl<'a> IntoIterator for &'a BindingRegistry {
    type Item = &'a BindingProfile;
    type IntoIter = std::slice::Iter<'a, BindingProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
