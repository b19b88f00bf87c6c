//! Type-safe enumerations for roles, appointment statuses and actions.
//!
//! Each enum round-trips through its lowercase name so it can be parsed
//! from command-line arguments and stored as plain text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books and cancels their own appointments.
    Patient,
    /// Approves, rejects and cancels appointments booked with them.
    Doctor,
    /// Passes every authorization check.
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

/// Status of an appointment.
///
/// `Requested` is the only initial state. `Rejected` and `Cancelled` are
/// terminal; `Approved` may still be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Requested,
    Approved,
    Rejected,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Requested,
        AppointmentStatus::Approved,
        AppointmentStatus::Rejected,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Requested => "requested",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true if no action is defined from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Rejected | AppointmentStatus::Cancelled
        )
    }

    /// Returns true if an appointment in this status still holds its slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Rejected)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ModelError;

    /// Accepts `pending` as a synonym for `requested`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "requested" | "pending" => Ok(AppointmentStatus::Requested),
            "approved" => Ok(AppointmentStatus::Approved),
            "rejected" => Ok(AppointmentStatus::Rejected),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ModelError::UnknownStatus(s.to_string())),
        }
    }
}

/// An action requested against an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Book,
    Approve,
    Reject,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Book, Action::Approve, Action::Reject, Action::Cancel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Book => "book",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" => Ok(Action::Book),
            "approve" => Ok(Action::Approve),
            "reject" => Ok(Action::Reject),
            "cancel" => Ok(Action::Cancel),
            _ => Err(ModelError::UnknownAction(s.to_string())),
        }
    }
}

/// Message template sent by a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent to the patient after booking.
    BookingRequested,
    /// Sent to the doctor after booking.
    BookingReceived,
    AppointmentApproved,
    AppointmentRejected,
    AppointmentCancelled,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BookingRequested => "booking_requested",
            NotificationKind::BookingReceived => "booking_received",
            NotificationKind::AppointmentApproved => "appointment_approved",
            NotificationKind::AppointmentRejected => "appointment_rejected",
            NotificationKind::AppointmentCancelled => "appointment_cancelled",
        }
    }

    /// Subject line used when the notification is rendered for a person.
    pub fn subject(&self) -> &'static str {
        match self {
            NotificationKind::BookingRequested => "Appointment requested. Awaiting doctor approval.",
            NotificationKind::BookingReceived => "New appointment request",
            NotificationKind::AppointmentApproved => "Appointment approved",
            NotificationKind::AppointmentRejected => "Appointment rejected",
            NotificationKind::AppointmentCancelled => "Appointment cancelled",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
