//! File-backed store.
//!
//! The file on disk is the source of truth. Reads reload it; every
//! mutation takes an exclusive lock on `<db>.lock`, reloads, applies the
//! change and rewrites the file atomically before releasing the lock. Two
//! processes working on the same database therefore see each other's
//! writes, and the optimistic version check runs against the latest saved
//! state. A mutation whose save fails is rolled back in memory.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use clinic_core::{AppointmentStore, StoreError, StoreTables, UserStore};
use clinic_model::{Appointment, AppointmentId, NewAppointment, NewUser, User, UserId};

use crate::error::{PersistenceError, Result};
use crate::io::{FileLock, load_database, load_or_create, save_database};
use crate::types::DatabaseFile;

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    database: Mutex<DatabaseFile>,
}

impl JsonStore {
    /// Open the database at `path`. A missing file yields an empty store;
    /// nothing is written until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let database = load_or_create(&path)?;
        Ok(Self {
            path,
            database: Mutex::new(database),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current state to disk, creating the file if needed.
    pub fn flush(&self) -> Result<()> {
        let mut database = self.lock()?;
        let _file_lock = FileLock::acquire(&self.path)?;
        self.refresh(&mut database)?;
        save_database(&mut database, &self.path)
    }

    fn lock(&self) -> Result<MutexGuard<'_, DatabaseFile>> {
        self.database
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)
    }

    /// Replace the in-memory copy with the saved file, if there is one.
    fn refresh(&self, database: &mut DatabaseFile) -> Result<()> {
        if self.path.is_file() {
            *database = load_database(&self.path)?;
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&StoreTables) -> T) -> std::result::Result<T, StoreError> {
        let mut database = self.lock()?;
        self.refresh(&mut database)?;
        Ok(f(&database.tables))
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreTables) -> std::result::Result<T, StoreError>,
    ) -> std::result::Result<T, StoreError> {
        let mut database = self.lock()?;
        let _file_lock = FileLock::acquire(&self.path)?;
        self.refresh(&mut database)?;
        let before = database.tables.clone();
        let value = f(&mut database.tables)?;
        if let Err(error) = save_database(&mut database, &self.path) {
            database.tables = before;
            tracing::error!(%error, path = %self.path.display(), "save failed, change rolled back");
            return Err(error.into());
        }
        Ok(value)
    }
}

impl UserStore for JsonStore {
    fn get_user(&self, id: UserId) -> std::result::Result<User, StoreError> {
        self.read(|tables| tables.get_user(id))?
    }

    fn find_user_by_email(&self, email: &str) -> std::result::Result<Option<User>, StoreError> {
        self.read(|tables| tables.find_user_by_email(email))
    }

    fn insert_user(&self, user: NewUser) -> std::result::Result<User, StoreError> {
        self.mutate(|tables| tables.insert_user(user))
    }

    fn users(&self) -> std::result::Result<Vec<User>, StoreError> {
        self.read(|tables| tables.users.values().cloned().collect())
    }
}

impl AppointmentStore for JsonStore {
    fn get_appointment(&self, id: AppointmentId) -> std::result::Result<Appointment, StoreError> {
        self.read(|tables| tables.get_appointment(id))?
    }

    fn insert_appointment(
        &self,
        request: NewAppointment,
        at: DateTime<Utc>,
    ) -> std::result::Result<Appointment, StoreError> {
        self.mutate(|tables| tables.insert_appointment(request, at))
    }

    fn save_appointment(
        &self,
        appointment: Appointment,
    ) -> std::result::Result<Appointment, StoreError> {
        self.mutate(|tables| tables.save_appointment(appointment))
    }

    fn appointments(&self) -> std::result::Result<Vec<Appointment>, StoreError> {
        self.read(|tables| tables.appointments.values().cloned().collect())
    }
}
