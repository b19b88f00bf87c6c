//! The appointment transition table.

use clinic_model::{Action, AppointmentStatus, NotificationKind};

/// Party of an appointment that receives a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Patient,
    Doctor,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// `None` for the booking row, which creates the appointment.
    pub from: Option<AppointmentStatus>,
    pub action: Action,
    pub to: AppointmentStatus,
    pub notify: &'static [(Recipient, NotificationKind)],
}

/// The row that creates an appointment.
pub const BOOKING: Transition = Transition {
    from: None,
    action: Action::Book,
    to: AppointmentStatus::Requested,
    notify: &[
        (Recipient::Patient, NotificationKind::BookingRequested),
        (Recipient::Doctor, NotificationKind::BookingReceived),
    ],
};

pub const TRANSITIONS: [Transition; 5] = [
    BOOKING,
    Transition {
        from: Some(AppointmentStatus::Requested),
        action: Action::Approve,
        to: AppointmentStatus::Approved,
        notify: &[(Recipient::Patient, NotificationKind::AppointmentApproved)],
    },
    Transition {
        from: Some(AppointmentStatus::Requested),
        action: Action::Reject,
        to: AppointmentStatus::Rejected,
        notify: &[(Recipient::Patient, NotificationKind::AppointmentRejected)],
    },
    Transition {
        from: Some(AppointmentStatus::Requested),
        action: Action::Cancel,
        to: AppointmentStatus::Cancelled,
        notify: &[(Recipient::Doctor, NotificationKind::AppointmentCancelled)],
    },
    Transition {
        from: Some(AppointmentStatus::Approved),
        action: Action::Cancel,
        to: AppointmentStatus::Cancelled,
        notify: &[(Recipient::Doctor, NotificationKind::AppointmentCancelled)],
    },
];

/// Look up the row for `action` taken from `from`.
pub fn find_transition(
    from: Option<AppointmentStatus>,
    action: Action,
) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|row| row.from == from && row.action == action)
}

/// Actions with a row starting at `status`.
pub fn available_actions(status: AppointmentStatus) -> Vec<Action> {
    TRANSITIONS
        .iter()
        .filter(|row| row.from == Some(status))
        .map(|row| row.action)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_only_from_nothing() {
        assert!(find_transition(None, Action::Book).is_some());
        for status in AppointmentStatus::ALL {
            assert!(find_transition(Some(status), Action::Book).is_none());
        }
    }

    #[test]
    fn terminal_statuses_have_no_rows() {
        for status in AppointmentStatus::ALL {
            assert_eq!(available_actions(status).is_empty(), status.is_terminal());
        }
    }

    #[test]
    fn cancel_reachable_from_requested_and_approved() {
        assert_eq!(
            available_actions(AppointmentStatus::Approved),
            vec![Action::Cancel]
        );
        assert_eq!(
            available_actions(AppointmentStatus::Requested),
            vec![Action::Approve, Action::Reject, Action::Cancel]
        );
        assert!(find_transition(Some(AppointmentStatus::Rejected), Action::Cancel).is_none());
    }
}
