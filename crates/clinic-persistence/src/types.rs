//! On-disk database document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinic_core::StoreTables;

/// Current schema version.
///
/// The loader rejects files with a higher version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Value of the `format` field identifying a clinic database.
pub const FORMAT_MARKER: &str = "clinic-db";

/// Root document written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseFile {
    pub format: String,
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,
    pub tables: StoreTables,
}

impl DatabaseFile {
    pub fn new() -> Self {
        Self::with_tables(StoreTables::default())
    }

    pub fn with_tables(tables: StoreTables) -> Self {
        let now = Utc::now();
        Self {
            format: FORMAT_MARKER.to_string(),
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at: now,
            last_saved_at: now,
            tables,
        }
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.last_saved_at = Utc::now();
    }
}

impl Default for DatabaseFile {
    fn default() -> Self {
        Self::new()
    }
}
