//! Error types for typegraph-ir
//!
//! Input anomalies are diagnostics, not errors. `TypegraphError` covers
//! contract violations, configuration, serialization and strict mode.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::indexes::IndexQueryError;
use crate::shared::models::Diagnostic;

/// Main error type for typegraph-ir operations
#[derive(Debug, Error)]
pub enum TypegraphError {
    /// A fragment violates the input contract (e.g. empty name)
    #[error("Invalid fragment in {file}: {reason}")]
    InvalidFragment { file: String, reason: String },

    /// Strict mode: the build produced diagnostics
    #[error("Strict mode: {count} diagnostic(s), first: {first}")]
    StrictMode { count: usize, first: Box<Diagnostic> },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Index query error: {0}")]
    Query(#[from] IndexQueryError),
}

impl TypegraphError {
    pub fn invalid_fragment(file: impl Into<String>, reason: impl Into<String>) -> Self {
        TypegraphError::InvalidFragment {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for typegraph operations
pub type Result<T> = std::result::Result<T, TypegraphError>;
