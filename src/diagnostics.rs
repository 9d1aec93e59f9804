//! Diagnostics sink for the binding store.
//!
//! The registry never fails loudly: unreadable stores, malformed entries and short
//! writes are reported here and otherwise absorbed. Hosts inject whichever sink
//! suits them. [`TracingDiagnostics`] forwards to `tracing` and is the default;
//! [`DiagnosticLog`] keeps entries in memory so an editing UI can show them.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// How serious a reported condition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// A single reported condition: a message plus an optional path or parser detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a path or diagnostic string.
    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

/// Receives every warning and error produced by the registry.
pub trait Diagnostics: Send {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let detail = diagnostic.detail.as_deref().unwrap_or_default();
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(detail, "{}", diagnostic.message),
            Severity::Error => tracing::error!(detail, "{}", diagnostic.message),
        }
    }
}

/// In-memory sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far, oldest first.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Drains the buffer.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Diagnostics for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
