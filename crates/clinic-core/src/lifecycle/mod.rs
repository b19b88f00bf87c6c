//! Appointment lifecycle manager.
//!
//! Every operation follows the same order: load, authorize, look up the
//! transition row, save, then notify. Nothing is written and nobody is
//! notified unless the first three steps pass. Notification failures are
//! logged and never undo a saved transition.

pub mod authorize;
pub mod transition;

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn};

use clinic_model::{Action, Appointment, AppointmentId, NewAppointment, Role, User, UserId};

use crate::error::LifecycleError;
use crate::notify::Notifier;
use crate::store::ClinicStore;

pub use authorize::{PERMISSIONS, Party, authorize, parties_for};
pub use transition::{
    BOOKING, Recipient, TRANSITIONS, Transition, available_actions, find_transition,
};

/// Source of "now" for timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Drives appointment transitions against an explicitly passed store.
///
/// The manager only borrows its collaborators; construct one per request
/// scope.
pub struct LifecycleManager<'a, S: ?Sized, N: ?Sized> {
    store: &'a S,
    notifier: &'a N,
    clock: Clock,
}

impl<'a, S, N> LifecycleManager<'a, S, N>
where
    S: ClinicStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(store: &'a S, notifier: &'a N) -> Self {
        Self {
            store,
            notifier,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for created/updated timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Create a new appointment in the `Requested` state.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the actor is the booking patient or an admin,
    /// `UserNotFound`/`InvalidParticipant` when the patient or doctor is
    /// missing or has the wrong role, `SlotUnavailable` when the doctor's
    /// slot is already held.
    pub fn book(
        &self,
        request: NewAppointment,
        actor: &User,
    ) -> Result<Appointment, LifecycleError> {
        let span = info_span!(
            "book",
            actor = %actor.id,
            patient = %request.patient_id,
            doctor = %request.doctor_id
        );
        let _guard = span.enter();

        authorize(actor, Action::Book, request.patient_id, request.doctor_id)
            .inspect_err(|error| warn!(%error, "booking refused"))?;
        self.require_role(request.patient_id, Role::Patient)?;
        self.require_role(request.doctor_id, Role::Doctor)?;

        let slot = request.slot;
        let appointment = self
            .store
            .insert_appointment(request, (self.clock)())
            .map_err(LifecycleError::from)
            .inspect_err(|error| warn!(%error, slot = %slot, "booking failed"))?;

        info!(
            appointment_id = %appointment.id,
            slot = %appointment.slot,
            status = %appointment.status,
            "appointment requested"
        );
        self.dispatch(&appointment, &BOOKING);
        Ok(appointment)
    }

    /// Apply `action` to an existing appointment.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `Unauthorized` when the actor may not
    /// take the action, `InvalidTransition` when the action is not defined
    /// for the current status, `Conflict` when a concurrent transition won.
    pub fn apply(
        &self,
        id: AppointmentId,
        action: Action,
        actor: &User,
    ) -> Result<Appointment, LifecycleError> {
        let span = info_span!("apply", appointment_id = %id, action = %action, actor = %actor.id);
        let _guard = span.enter();

        let mut appointment = self.store.get_appointment(id)?;
        authorize(actor, action, appointment.patient_id, appointment.doctor_id)
            .inspect_err(|error| warn!(%error, "transition refused"))?;

        let from = appointment.status;
        let Some(row) = find_transition(Some(from), action) else {
            warn!(from = %from, "transition not defined");
            return Err(LifecycleError::InvalidTransition { from, action });
        };

        appointment.transition_to(row.to, (self.clock)());
        let appointment = self.store.save_appointment(appointment)?;

        info!(
            from = %from,
            to = %appointment.status,
            version = appointment.version,
            "appointment updated"
        );
        self.dispatch(&appointment, row);
        Ok(appointment)
    }

    /// Convenience wrappers for the three transition actions.
    pub fn approve(&self, id: AppointmentId, actor: &User) -> Result<Appointment, LifecycleError> {
        self.apply(id, Action::Approve, actor)
    }

    pub fn reject(&self, id: AppointmentId, actor: &User) -> Result<Appointment, LifecycleError> {
        self.apply(id, Action::Reject, actor)
    }

    pub fn cancel(&self, id: AppointmentId, actor: &User) -> Result<Appointment, LifecycleError> {
        self.apply(id, Action::Cancel, actor)
    }

    fn require_role(&self, id: UserId, expected: Role) -> Result<User, LifecycleError> {
        let user = self.store.get_user(id)?;
        if user.role == expected {
            Ok(user)
        } else {
            Err(LifecycleError::InvalidParticipant { user: id, expected })
        }
    }

    /// Send one message per recipient of `row`. Returns the number delivered.
    fn dispatch(&self, appointment: &Appointment, row: &Transition) -> usize {
        let mut delivered = 0;
        for (recipient, kind) in row.notify {
            let user_id = match recipient {
                Recipient::Patient => appointment.patient_id,
                Recipient::Doctor => appointment.doctor_id,
            };
            let user = match self.store.get_user(user_id) {
                Ok(user) => user,
                Err(error) => {
                    warn!(%error, user_id = %user_id, kind = %kind, "notification skipped");
                    continue;
                }
            };
            match self.notifier.send(&user.email, *kind, appointment.id) {
                Ok(()) => delivered += 1,
                Err(error) => {
                    warn!(%error, user_id = %user_id, kind = %kind, "notification not delivered");
                }
            }
        }
        debug!(
            appointment_id = %appointment.id,
            delivered,
            expected = row.notify.len(),
            "notifications dispatched"
        );
        delivered
    }
}
