//! In-process store backed by [`StoreTables`] behind a mutex.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use clinic_model::{Appointment, AppointmentId, NewAppointment, NewUser, User, UserId};

use crate::error::StoreError;
use crate::store::{AppointmentStore, StoreTables, UserStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<StoreTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: StoreTables) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        self.lock()?.get_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.find_user_by_email(email))
    }

    fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.lock()?.insert_user(user)
    }

    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }
}

impl AppointmentStore for MemoryStore {
    fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, StoreError> {
        self.lock()?.get_appointment(id)
    }

    fn insert_appointment(
        &self,
        request: NewAppointment,
        at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError> {
        self.lock()?.insert_appointment(request, at)
    }

    fn save_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        self.lock()?.save_appointment(appointment)
    }

    fn appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.lock()?.appointments.values().cloned().collect())
    }
}
