//! Record of failed template compilations.
//!
//! A degraded template leaves the module loadable but without a render
//! function. The store keeps what went wrong so a test harness can surface it
//! after the fact. It is never cleared implicitly; call [`TemplateErrorStore::take`].

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::compiler::CompilerDiagnostic;

/// One failed template compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateFailure {
    /// Filename of the SFC
    pub filename: String,

    /// Diagnostics reported by the compiler
    pub diagnostics: Vec<CompilerDiagnostic>,
}

/// Shared, cloneable handle to recorded template failures.
#[derive(Debug, Clone, Default)]
pub struct TemplateErrorStore {
    failures: Arc<Mutex<Vec<TemplateFailure>>>,
}

impl TemplateErrorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure.
    pub fn record(&self, filename: impl Into<String>, diagnostics: Vec<CompilerDiagnostic>) {
        self.lock().push(TemplateFailure {
            filename: filename.into(),
            diagnostics,
        });
    }

    /// Remove and return every recorded failure.
    pub fn take(&self) -> Vec<TemplateFailure> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TemplateFailure>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }
}
