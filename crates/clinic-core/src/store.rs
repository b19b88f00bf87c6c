//! Store contracts and the table logic shared by store backends.
//!
//! Stores take `&self` and synchronize internally, so one handle can be
//! shared across request scopes. Appointment saves are optimistic: a save
//! succeeds only when the caller's `version` matches the stored one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinic_model::{Appointment, AppointmentId, NewAppointment, NewUser, User, UserId};

use crate::error::StoreError;

pub trait UserStore {
    fn get_user(&self, id: UserId) -> Result<User, StoreError>;

    /// Look up a user by email. The email is normalized before matching.
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user, assigning a fresh id. Fails on a duplicate email.
    fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// All users ordered by id.
    fn users(&self) -> Result<Vec<User>, StoreError>;
}

pub trait AppointmentStore {
    fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, StoreError>;

    /// Insert a `Requested` appointment.
    ///
    /// Fails with [`StoreError::SlotTaken`] when the doctor already holds an
    /// appointment at the same slot that still occupies it.
    fn insert_appointment(
        &self,
        request: NewAppointment,
        at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError>;

    /// Persist a modified appointment and return it with its version bumped.
    fn save_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    /// All appointments ordered by id.
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError>;
}

/// Convenience bound for handles that provide both stores.
pub trait ClinicStore: UserStore + AppointmentStore {}

impl<T: UserStore + AppointmentStore + ?Sized> ClinicStore for T {}

/// Users and appointments keyed by id, plus id counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTables {
    pub users: BTreeMap<UserId, User>,
    pub appointments: BTreeMap<AppointmentId, Appointment>,
    pub next_user_id: u64,
    pub next_appointment_id: u64,
}

impl StoreTables {
    pub fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        self.users
            .get(&id)
            .cloned()
            .ok_or(StoreError::UserNotFound(id))
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.users.values().find(|user| user.email == email).cloned()
    }

    pub fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        if self.find_user_by_email(&user.email).is_some() {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        let id = UserId::new(self.allocate_user_id());
        let user = user.into_user(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, StoreError> {
        self.appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::AppointmentNotFound(id))
    }

    pub fn insert_appointment(
        &mut self,
        request: NewAppointment,
        at: DateTime<Utc>,
    ) -> Result<Appointment, StoreError> {
        if self.slot_taken(&request) {
            return Err(StoreError::SlotTaken {
                doctor: request.doctor_id,
                slot: request.slot,
            });
        }
        let id = AppointmentId::new(self.allocate_appointment_id());
        let appointment = request.into_appointment(id, at);
        self.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    pub fn save_appointment(
        &mut self,
        mut appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let stored = self
            .appointments
            .get(&appointment.id)
            .ok_or(StoreError::AppointmentNotFound(appointment.id))?;
        if stored.version != appointment.version {
            return Err(StoreError::Conflict {
                id: appointment.id,
                expected: appointment.version,
                found: stored.version,
            });
        }
        if stored.patient_id != appointment.patient_id {
            return Err(StoreError::ImmutableField {
                id: appointment.id,
                field: "patient_id",
            });
        }
        if stored.doctor_id != appointment.doctor_id {
            return Err(StoreError::ImmutableField {
                id: appointment.id,
                field: "doctor_id",
            });
        }
        appointment.version += 1;
        self.appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn slot_taken(&self, request: &NewAppointment) -> bool {
        self.appointments.values().any(|existing| {
            existing.doctor_id == request.doctor_id
                && existing.slot == request.slot
                && existing.status.occupies_slot()
        })
    }

    fn allocate_user_id(&mut self) -> u64 {
        let floor = self.users.keys().last().map_or(0, |id| id.get());
        self.next_user_id = self.next_user_id.max(floor) + 1;
        self.next_user_id
    }

    fn allocate_appointment_id(&mut self) -> u64 {
        let floor = self.appointments.keys().last().map_or(0, |id| id.get());
        self.next_appointment_id = self.next_appointment_id.max(floor) + 1;
        self.next_appointment_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_model::{AppointmentStatus, Role, TimeSlot};

    fn tables_with_users() -> StoreTables {
        let mut tables = StoreTables::default();
        tables
            .insert_user(NewUser::new("Pat", "pat@example.com", Role::Patient, None).unwrap())
            .unwrap();
        tables
            .insert_user(NewUser::new("Doc", "doc@example.com", Role::Doctor, None).unwrap())
            .unwrap();
        tables
    }

    fn request() -> NewAppointment {
        NewAppointment::new(
            UserId::new(1),
            UserId::new(2),
            TimeSlot::parse("2025-01-02", "09:00").unwrap(),
        )
    }

    #[test]
    fn ids_are_sequential() {
        let mut tables = tables_with_users();
        let ids: Vec<UserId> = tables.users.keys().copied().collect();
        assert_eq!(ids, vec![UserId::new(1), UserId::new(2)]);
        let first = tables.insert_appointment(request(), Utc::now()).unwrap();
        assert_eq!(first.id, AppointmentId::new(1));
    }

    #[test]
    fn duplicate_email_is_rejected_case_insensitively() {
        let mut tables = tables_with_users();
        let duplicate = NewUser::new("Other", "PAT@example.com", Role::Patient, None).unwrap();
        assert!(matches!(
            tables.insert_user(duplicate),
            Err(StoreError::DuplicateEmail(_))
        ));
    }

    #[test]
    fn stale_version_conflicts() {
        let mut tables = tables_with_users();
        let appointment = tables.insert_appointment(request(), Utc::now()).unwrap();
        let mut first = appointment.clone();
        first.status = AppointmentStatus::Approved;
        let saved = tables.save_appointment(first).unwrap();
        assert_eq!(saved.version, 1);

        let mut second = appointment;
        second.status = AppointmentStatus::Rejected;
        assert!(matches!(
            tables.save_appointment(second),
            Err(StoreError::Conflict {
                expected: 0,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn participants_are_immutable() {
        let mut tables = tables_with_users();
        let mut appointment = tables.insert_appointment(request(), Utc::now()).unwrap();
        appointment.doctor_id = UserId::new(1);
        assert!(matches!(
            tables.save_appointment(appointment),
            Err(StoreError::ImmutableField {
                field: "doctor_id",
                ..
            })
        ));
    }

    #[test]
    fn rejected_appointment_frees_slot() {
        let mut tables = tables_with_users();
        let mut appointment = tables.insert_appointment(request(), Utc::now()).unwrap();
        assert!(matches!(
            tables.insert_appointment(request(), Utc::now()),
            Err(StoreError::SlotTaken { .. })
        ));

        appointment.status = AppointmentStatus::Rejected;
        tables.save_appointment(appointment).unwrap();
        assert!(tables.insert_appointment(request(), Utc::now()).is_ok());
    }
}
