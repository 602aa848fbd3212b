// ── Core error types ──
//
// User-facing errors from bookcase-core. Field-level validation failures
// travel as `FieldErrors` inside `Invalid`; everything else is a storage
// or lookup fault that UI layers map to their own presentation.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::FieldErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage errors ───────────────────────────────────────────────
    #[error("Storage error for key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize book list: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Seed errors ──────────────────────────────────────────────────
    #[error("Cannot read seed file {}: {source}", path.display())]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Seed file {} is not a valid book list: {source}", path.display())]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Book not found: {identifier}")]
    NotFound { identifier: String },

    #[error("A book with id '{identifier}' already exists")]
    Conflict { identifier: String },

    #[error("Validation failed: {0}")]
    Invalid(FieldErrors),
}

impl CoreError {
    pub(crate) fn storage(key: &str, source: std::io::Error) -> Self {
        Self::Storage {
            key: key.to_owned(),
            source,
        }
    }

    /// Field errors carried by a validation failure, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}
