//! Error types for vize_passerelle.

use thiserror::Error;

use crate::compiler::CompilerDiagnostic;

/// Errors that abort loading a module.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A specifier could not be resolved against its parent URL
    #[error("Cannot resolve '{specifier}' against '{base}': {source}")]
    InvalidUrl {
        specifier: String,
        base: String,
        #[source]
        source: url::ParseError,
    },

    /// The module URL does not point at the local filesystem
    #[error("Not a file URL: {0}")]
    NotAFileUrl(String),

    /// The SFC compiler rejected the source
    #[error("Failed to compile {filename}: {message}")]
    Compile { filename: String, message: String },

    /// The compiled script could not be parsed to rewrite its default export
    #[error("Failed to rewrite default export in {filename}: {message}")]
    Rewrite { filename: String, message: String },

    /// Template compilation reported diagnostics and the policy is to fail
    #[error("Template compilation failed for {filename}: {}", join_diagnostics(.diagnostics))]
    Template {
        filename: String,
        diagnostics: Vec<CompilerDiagnostic>,
    },

    /// The compiler worker process misbehaved
    #[error("Compiler worker error: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

fn join_diagnostics(diagnostics: &[CompilerDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
