use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use clinic_model::{Appointment, AppointmentStatus, User, UserId};

/// Outcome of `init-db`.
#[derive(Debug)]
pub struct InitReport {
    pub path: PathBuf,
    /// Emails of the sample accounts created by this run.
    pub created: Vec<String>,
    pub doctors: Vec<User>,
}

/// One appointment as shown to a user, with participant names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRow {
    pub id: u64,
    pub patient: String,
    pub doctor: String,
    pub slot: String,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AppointmentRow {
    /// Build a row, falling back to `#id` for users missing from `names`.
    pub fn new(appointment: &Appointment, names: &BTreeMap<UserId, String>) -> Self {
        let name = |id: UserId| {
            names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| format!("#{id}"))
        };
        Self {
            id: appointment.id.get(),
            patient: name(appointment.patient_id),
            doctor: name(appointment.doctor_id),
            slot: appointment.slot.to_string(),
            status: appointment.status,
            reason: appointment.reason.clone(),
        }
    }
}
