//! Database loading.

use std::fs;
use std::path::Path;

use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, DatabaseFile, FORMAT_MARKER};

/// Load the database at `path`.
pub fn load_database(path: &Path) -> Result<DatabaseFile> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_database_bytes(&bytes, path)
}

/// Load the database at `path`, or start an empty one if the file is missing.
pub fn load_or_create(path: &Path) -> Result<DatabaseFile> {
    if path.exists() {
        load_database(path)
    } else {
        tracing::debug!(path = %path.display(), "database file missing, starting empty");
        Ok(DatabaseFile::new())
    }
}

/// Validate the header fields before decoding the tables.
fn parse_database_bytes(bytes: &[u8], path: &Path) -> Result<DatabaseFile> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|_| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "File is not valid JSON".to_string(),
        })?;

    if value.get("format").and_then(serde_json::Value::as_str) != Some(FORMAT_MARKER) {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("Missing \"format\": \"{FORMAT_MARKER}\" marker"),
        });
    }

    let version = value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "Missing schema version".to_string(),
        })?;
    let version = u32::try_from(version).unwrap_or(u32::MAX);

    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let database: DatabaseFile =
        serde_json::from_value(value).map_err(|source| PersistenceError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        users = database.tables.users.len(),
        appointments = database.tables.appointments.len(),
        "database loaded"
    );
    Ok(database)
}
