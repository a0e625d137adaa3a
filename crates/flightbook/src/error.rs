//! Error types for flightbook.
//!
//! This module defines all error types used throughout the flightbook crate.
//! Cancel resolution outcomes (not found, ambiguous name) are not errors; they
//! are reported through [`crate::service::CancelOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Ledger Errors ===
    /// Failed to open the ledger file (or the rewrite temp file).
    #[error("failed to open ledger at {path}: {source}")]
    LedgerOpen {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed while reading lines from the ledger file.
    #[error("failed to read ledger at {path}: {source}")]
    LedgerRead {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to the ledger file (or the rewrite temp file).
    #[error("failed to write ledger at {path}: {source}")]
    LedgerWrite {
        /// Path to the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to swap the rewritten ledger into place.
    #[error("failed to replace ledger at {path}: {source}")]
    LedgerReplace {
        /// Path to the live ledger.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Request Errors ===
    /// A request was rejected before the ledger was touched.
    #[error("invalid input: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Admin credentials did not match.
    #[error("invalid admin credentials")]
    Unauthorized,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for flightbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means the ledger file could not be opened, read,
    /// written or replaced.
    #[must_use]
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            Self::LedgerOpen { .. }
                | Self::LedgerRead { .. }
                | Self::LedgerWrite { .. }
                | Self::LedgerReplace { .. }
                | Self::DirectoryCreate { .. }
        )
    }

    /// Check if this error is a rejected request.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
