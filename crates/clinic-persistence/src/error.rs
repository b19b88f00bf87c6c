//! Persistence error types.
//!
//! Every error carries enough context for a user-facing message plus an
//! optional remediation hint.

use std::path::PathBuf;

use clinic_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a clinic database file.
    #[error("Invalid database file format")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Database file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    #[error("Failed to serialize database")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize database")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The temp file could not be renamed over the target.
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::InvalidFormat { path, reason } => format!(
                "The file at {} is not a clinic database: {}",
                path.display(),
                reason
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => format!(
                "This database was written by a newer version (file version {found}, \
                 supported up to {max_supported})."
            ),
            Self::Serialization { .. } => "An error occurred while saving the database.".into(),
            Self::Deserialization { path, .. } => format!(
                "The database at {} could not be read. The file may be corrupted.",
                path.display()
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the database to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::LockPoisoned => "The database is in an inconsistent state.".into(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Pass the path of a database created with `init-db`.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Update to the latest release.".into()),
            Self::Deserialization { .. } => Some("Restore the file from a backup.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different location.".into())
            }
            Self::Serialization { .. } | Self::LockPoisoned => None,
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(error: PersistenceError) -> Self {
        StoreError::Backend(Box::new(error))
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
