//! Error types for store access, lifecycle transitions and notifications.
//!
//! `LifecycleError` is what callers of the lifecycle manager see.
//! `DeliveryError` never leaves the notification boundary; it is logged and
//! dropped there.

use clinic_model::{
    Action, AppointmentId, AppointmentStatus, ModelError, Role, TimeSlot, UserId,
};
use thiserror::Error;

/// Failure reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("appointment {0} not found")]
    AppointmentNotFound(AppointmentId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The record changed between read and save.
    #[error("appointment {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        id: AppointmentId,
        expected: u64,
        found: u64,
    },

    #[error("email already in use: {0}")]
    DuplicateEmail(String),

    #[error("doctor {doctor} already has an appointment at {slot}")]
    SlotTaken { doctor: UserId, slot: TimeSlot },

    #[error("appointment {id}: {field} cannot change after creation")]
    ImmutableField {
        id: AppointmentId,
        field: &'static str,
    },

    /// Failure inside the storage backend (I/O, encoding).
    #[error("storage backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure of a lifecycle operation (`book` or `apply`).
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("appointment {0} not found")]
    NotFound(AppointmentId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// A booking named a user with the wrong role as patient or doctor.
    #[error("user {user} is not a {expected}")]
    InvalidParticipant { user: UserId, expected: Role },

    #[error("user {actor} ({role}) is not allowed to {action} this appointment")]
    Unauthorized {
        actor: UserId,
        role: Role,
        action: Action,
    },

    #[error("cannot {action} an appointment that is {from}")]
    InvalidTransition {
        from: AppointmentStatus,
        action: Action,
    },

    #[error("doctor {doctor} is not available at {slot}")]
    SlotUnavailable { doctor: UserId, slot: TimeSlot },

    /// Lost an optimistic-concurrency race; the caller may re-request.
    #[error("appointment {0} was modified concurrently, please retry")]
    Conflict(AppointmentId),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LifecycleError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AppointmentNotFound(id) => LifecycleError::NotFound(id),
            StoreError::UserNotFound(id) => LifecycleError::UserNotFound(id),
            StoreError::Conflict { id, .. } => LifecycleError::Conflict(id),
            StoreError::SlotTaken { doctor, slot } => {
                LifecycleError::SlotUnavailable { doctor, slot }
            }
            other => LifecycleError::Store(other),
        }
    }
}

/// Notification could not be delivered.
#[derive(Debug, Error)]
#[error("failed to deliver notification to {recipient}: {reason}")]
pub struct DeliveryError {
    pub recipient: String,
    pub reason: String,
}

impl DeliveryError {
    pub fn new(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Invalid(#[from] ModelError),

    #[error("email already in use: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegistrationError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateEmail(email) => RegistrationError::DuplicateEmail(email),
            other => RegistrationError::Store(other),
        }
    }
}

/// Failure of a read-only dashboard or statistics query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("user {actor} ({role}) may not view this data")]
    Forbidden { actor: UserId, role: Role },

    /// Only doctor and patient accounts can be listed.
    #[error("cannot list {0} accounts")]
    UnsupportedListing(Role),

    #[error(transparent)]
    Store(#[from] StoreError),
}
