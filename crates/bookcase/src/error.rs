//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use bookcase_config::ConfigError;
use bookcase_core::{CoreError, FieldErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(bookcase::not_found),
        help("Run: bookcase {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(bookcase::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bookcase::validation))]
    Validation { field: String, reason: String },

    #[error("Book was not saved:\n{}", bullet_list(errors))]
    #[diagnostic(
        code(bookcase::invalid_book),
        help("Fix the fields above and run the command again.")
    )]
    InvalidBook { errors: FieldErrors },

    // ── Storage ──────────────────────────────────────────────────────

    #[error("Could not access catalog storage '{key}'")]
    #[diagnostic(
        code(bookcase::storage),
        help("Check that the data directory exists and is writable (see --data-dir).")
    )]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not load books from {path}: {reason}")]
    #[diagnostic(
        code(bookcase::seed),
        help("Seed and import files must contain a JSON array of books.")
    )]
    SeedFile { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration error: {reason}")]
    #[diagnostic(
        code(bookcase::config),
        help("Inspect the file with: bookcase config show")
    )]
    Config { reason: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(bookcase::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(bookcase::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(bookcase::json))]
    Json(#[from] serde_json::Error),
}

fn bullet_list(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  • {}: {message}", field.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidBook { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn book_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "book".into(),
            identifier: identifier.into(),
            list_command: "list".into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Storage { key, source } => CliError::Storage { key, source },

            CoreError::Serialization(e) => CliError::Json(e),

            CoreError::SeedRead { path, source } => CliError::SeedFile {
                path: path.display().to_string(),
                reason: source.to_string(),
            },

            CoreError::SeedParse { path, source } => CliError::SeedFile {
                path: path.display().to_string(),
                reason: source.to_string(),
            },

            CoreError::NotFound { identifier } => CliError::book_not_found(identifier),

            CoreError::Conflict { identifier } => CliError::Conflict {
                resource_type: "book".into(),
                identifier,
            },

            CoreError::Invalid(errors) => CliError::InvalidBook { errors },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcase_core::{BookForm, Field};

    #[test]
    fn validation_failures_exit_with_usage() {
        let errors = BookForm::new().submit().err().unwrap_or_default();
        let err = CliError::from(CoreError::Invalid(errors));
        assert_eq!(err.exit_code(), exit_code::USAGE);
        let text = err.to_string();
        assert!(text.contains("Title is required"));
        assert!(text.contains(Field::PurchaseLink.label()));
    }

    #[test]
    fn not_found_and_conflict_codes() {
        let nf = CliError::from(CoreError::NotFound {
            identifier: "9".into(),
        });
        assert_eq!(nf.exit_code(), exit_code::NOT_FOUND);
        let conflict = CliError::from(CoreError::Conflict {
            identifier: "9".into(),
        });
        assert_eq!(conflict.exit_code(), exit_code::CONFLICT);
    }
}
