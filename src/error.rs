//! Error types for loading and saving the binding store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read a usable document from the store.
///
/// [`BindingRegistry::load`](crate::registry::BindingRegistry::load) absorbs both variants
/// into a warning and an empty registry; [`try_load`](crate::registry::BindingRegistry::try_load)
/// hands them to the caller.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't load gamepad bindings from {path}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("json parse error: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("json parse error: expected a top-level array, found {found}")]
    NotAnArray { found: &'static str },
}

impl LoadError {
    /// `true` when the store was readable but held the wrong shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedDocument(_) | Self::NotAnArray { .. })
    }
}

/// Failure to write the store.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("couldn't save gamepad bindings to {path}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't encode gamepad bindings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("couldn't write gamepad bindings: wrote {written} of {requested} bytes")]
    ShortWrite { requested: usize, written: usize },

    #[error("couldn't write gamepad bindings: {0}")]
    Io(#[from] io::Error),
}

/// One array element of the store that is not a usable profile record.
#[derive(Debug, Error)]
#[error("profile #{index} skipped: {reason}")]
pub struct ParseIssue {
    /// Position of the element in the top-level array.
    pub index: usize,
    #[source]
    pub reason: serde_json::Error,
}
