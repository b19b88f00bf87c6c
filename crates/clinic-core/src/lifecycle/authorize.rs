//! Static authorization table.
//!
//! Each action lists the appointment parties allowed to take it. Admins
//! pass every check.

use clinic_model::{Action, Role, User, UserId};

use crate::error::LifecycleError;

/// A role bound to a specific appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// Role `Patient` and the appointment's patient.
    OwnPatient,
    /// Role `Doctor` and the appointment's doctor.
    OwnDoctor,
}

pub const PERMISSIONS: [(Action, &[Party]); 4] = [
    (Action::Book, &[Party::OwnPatient]),
    (Action::Approve, &[Party::OwnDoctor]),
    (Action::Reject, &[Party::OwnDoctor]),
    (Action::Cancel, &[Party::OwnPatient, Party::OwnDoctor]),
];

pub fn parties_for(action: Action) -> &'static [Party] {
    for (candidate, parties) in PERMISSIONS {
        if candidate == action {
            return parties;
        }
    }
    &[]
}

/// Check whether `actor` may take `action` on an appointment between
/// `patient` and `doctor`.
pub fn authorize(
    actor: &User,
    action: Action,
    patient: UserId,
    doctor: UserId,
) -> Result<(), LifecycleError> {
    if actor.role == Role::Admin {
        return Ok(());
    }
    let permitted = parties_for(action).iter().any(|party| match party {
        Party::OwnPatient => actor.role == Role::Patient && actor.id == patient,
        Party::OwnDoctor => actor.role == Role::Doctor && actor.id == doctor,
    });
    if permitted {
        Ok(())
    } else {
        Err(LifecycleError::Unauthorized {
            actor: actor.id,
            role: actor.role,
            action,
        })
    }
}
