//! # Error Types
//!
//! Structured error types for catalog_core. Each variant carries enough
//! context (paths, keys, reasons) to explain the failure without a backtrace.
//!
//! Most data conditions in the resolver are *not* errors: an unmatched member
//! is a silent no-op, an unknown grade is a sentinel, and a bad series file is
//! a diagnostic line. Errors are reserved for the inventory scan, settings
//! loading, namespace persistence and publishing before a selection.
//!
//! ## Example
//!
//! ```rust
//! use catalog_core::errors::{CatalogError, CatalogResult};
//!
//! fn require_suffix(suffix: &str) -> CatalogResult<()> {
//!     if suffix.contains(' ') {
//!         return Err(CatalogError::invalid_input("suffix", suffix, "Suffix must not contain spaces"));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for catalog_core operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Structured error type for catalog operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CatalogError {
    /// An input value is invalid (bad setting, malformed key, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The catalog directory does not exist
    #[error("Catalog directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// A catalog file is missing a required column
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    /// Publishing was requested before any member was resolved
    #[error("No section selected yet. Please choose a member first.")]
    NoSelection,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// CSV parse error
    #[error("CSV error in '{path}': {reason}")]
    CsvError { path: String, reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Namespace file written by an incompatible version
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CatalogError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<String>) -> Self {
        CatalogError::DirectoryNotFound { path: path.into() }
    }

    /// Create a MissingColumn error
    pub fn missing_column(column: impl Into<String>, path: impl Into<String>) -> Self {
        CatalogError::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CsvError
    pub fn csv_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::CsvError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the user can carry on by picking something else.
    ///
    /// A broken series file or a premature publish leaves the session usable;
    /// a missing catalog directory does not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingColumn { .. } | CatalogError::CsvError { .. } | CatalogError::NoSelection
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::InvalidInput { .. } => "INVALID_INPUT",
            CatalogError::DirectoryNotFound { .. } => "DIRECTORY_NOT_FOUND",
            CatalogError::MissingColumn { .. } => "MISSING_COLUMN",
            CatalogError::NoSelection => "NO_SELECTION",
            CatalogError::FileError { .. } => "FILE_ERROR",
            CatalogError::CsvError { .. } => "CSV_ERROR",
            CatalogError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CatalogError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CatalogError::missing_column("Description", "UB310.csv");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"MissingColumn\""));
        let roundtrip: CatalogError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CatalogError::NoSelection.error_code(), "NO_SELECTION");
        assert_eq!(CatalogError::directory_not_found("x").error_code(), "DIRECTORY_NOT_FOUND");
    }

    #[test]
    fn test_recoverable() {
        assert!(CatalogError::NoSelection.is_recoverable());
        assert!(CatalogError::csv_error("a.csv", "bad row").is_recoverable());
        assert!(!CatalogError::directory_not_found("missing").is_recoverable());
    }

    #[test]
    fn test_no_selection_message() {
        let msg = CatalogError::NoSelection.to_string();
        assert!(msg.contains("No section selected"));
    }
}
