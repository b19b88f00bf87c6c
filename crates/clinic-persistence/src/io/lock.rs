//! Cross-process exclusive lock on a sidecar `.lock` file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};

/// Held for the duration of a read-modify-write cycle on the database.
///
/// Released when dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the exclusive lock for `target` is held.
    pub fn acquire(target: &Path) -> Result<Self> {
        let path = lock_path(target);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| PersistenceError::Io {
                operation: "open lock",
                path: path.clone(),
                source: e,
            })?;
        file.lock().map_err(|e| PersistenceError::Io {
            operation: "lock",
            path: path.clone(),
            source: e,
        })?;
        tracing::trace!(path = %path.display(), "database lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(error) = self.file.unlock() {
            tracing::warn!(%error, path = %self.path.display(), "failed to release database lock");
        }
    }
}

/// `clinic.json` locks through `clinic.json.lock`.
pub fn lock_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
