//! Read-only views: doctor directory, dashboards and admin statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use clinic_model::{Appointment, AppointmentStatus, Role, User};

use crate::error::{QueryError, StoreError};
use crate::store::{AppointmentStore, ClinicStore, UserStore};

/// Doctors ordered by name, optionally restricted to one specialization
/// (matched case-insensitively).
pub fn list_doctors<S: UserStore + ?Sized>(
    store: &S,
    specialization: Option<&str>,
) -> Result<Vec<User>, StoreError> {
    let wanted = specialization.map(|value| value.trim().to_lowercase());
    let mut doctors: Vec<User> = store
        .users()?
        .into_iter()
        .filter(User::is_doctor)
        .filter(|doctor| match &wanted {
            Some(wanted) => doctor
                .specialization
                .as_deref()
                .is_some_and(|value| value.to_lowercase() == *wanted),
            None => true,
        })
        .collect();
    doctors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(doctors)
}

/// Distinct doctor specializations, sorted.
pub fn specializations<S: UserStore + ?Sized>(store: &S) -> Result<Vec<String>, StoreError> {
    let set: BTreeSet<String> = store
        .users()?
        .into_iter()
        .filter(User::is_doctor)
        .filter_map(|doctor| doctor.specialization)
        .collect();
    Ok(set.into_iter().collect())
}

/// Appointments visible to `actor`.
///
/// Patients see their own bookings, latest slot first. Doctors see the
/// bookings made with them, earliest slot first. Admins see everything,
/// earliest slot first.
pub fn dashboard<S: AppointmentStore + ?Sized>(
    store: &S,
    actor: &User,
) -> Result<Vec<Appointment>, StoreError> {
    let mut appointments = store.appointments()?;
    match actor.role {
        Role::Patient => {
            appointments.retain(|appointment| appointment.patient_id == actor.id);
            appointments.sort_by(|a, b| b.slot.cmp(&a.slot).then(b.id.cmp(&a.id)));
        }
        Role::Doctor => {
            appointments.retain(|appointment| appointment.doctor_id == actor.id);
            appointments.sort_by(|a, b| a.slot.cmp(&b.slot).then(a.id.cmp(&b.id)));
        }
        Role::Admin => {
            appointments.sort_by(|a, b| a.slot.cmp(&b.slot).then(a.id.cmp(&b.id)));
        }
    }
    Ok(appointments)
}

/// Every doctor or every patient account, ordered by name. Only admins
/// may call this.
pub fn list_users<S: UserStore + ?Sized>(
    store: &S,
    actor: &User,
    role: Role,
) -> Result<Vec<User>, QueryError> {
    require_admin(actor)?;
    if role.is_admin() {
        return Err(QueryError::UnsupportedListing(role));
    }
    let mut users: Vec<User> = store
        .users()?
        .into_iter()
        .filter(|user| user.role == role)
        .collect();
    users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(users)
}

fn require_admin(actor: &User) -> Result<(), QueryError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(QueryError::Forbidden {
            actor: actor.id,
            role: actor.role,
        })
    }
}

/// Headline counts for the admin view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicStats {
    pub doctors: usize,
    pub patients: usize,
    pub admins: usize,
    pub appointments: usize,
    pub by_status: BTreeMap<AppointmentStatus, usize>,
}

impl ClinicStats {
    pub fn count(&self, status: AppointmentStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Compute [`ClinicStats`]. Only admins may call this.
pub fn admin_stats<S: ClinicStore + ?Sized>(
    store: &S,
    actor: &User,
) -> Result<ClinicStats, QueryError> {
    require_admin(actor)?;
    let mut stats = ClinicStats::default();
    for user in store.users()? {
        match user.role {
            Role::Doctor => stats.doctors += 1,
            Role::Patient => stats.patients += 1,
            Role::Admin => stats.admins += 1,
        }
    }
    for status in AppointmentStatus::ALL {
        stats.by_status.insert(status, 0);
    }
    for appointment in store.appointments()? {
        stats.appointments += 1;
        *stats.by_status.entry(appointment.status).or_insert(0) += 1;
    }
    Ok(stats)
}
