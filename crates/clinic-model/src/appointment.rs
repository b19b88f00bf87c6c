//! Appointment records and requested time slots.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppointmentId, AppointmentStatus, ModelError, UserId};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// A requested calendar date and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse a slot from `YYYY-MM-DD` and `HH:MM` strings.
    pub fn parse(date: &str, time: &str) -> Result<Self, ModelError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| ModelError::InvalidDate(date.to_string()))?;
        let time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
            .map_err(|_| ModelError::InvalidTime(time.to_string()))?;
        Ok(Self { date, time })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.date.format(DATE_FORMAT),
            self.time.format(TIME_FORMAT)
        )
    }
}

/// A stored appointment.
///
/// `patient_id` and `doctor_id` never change after creation. `version` is
/// bumped by the store on every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub slot: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Appointment {
    /// Set a new status and refresh the modification timestamp.
    pub fn transition_to(&mut self, status: AppointmentStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at.max(self.created_at);
    }
}

/// Data needed to create an appointment in the `Requested` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub slot: TimeSlot,
    pub reason: Option<String>,
}

impl NewAppointment {
    pub fn new(patient_id: UserId, doctor_id: UserId, slot: TimeSlot) -> Self {
        Self {
            patient_id,
            doctor_id,
            slot,
            reason: None,
        }
    }

    /// Attach a free-text reason. Blank input is dropped.
    #[must_use]
    pub fn with_reason(mut self, reason: Option<&str>) -> Self {
        self.reason = reason
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self
    }

    /// Materialize the record. The status is always `Requested`.
    pub fn into_appointment(self, id: AppointmentId, at: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            slot: self.slot,
            reason: self.reason,
            status: AppointmentStatus::Requested,
            created_at: at,
            updated_at: at,
            version: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_parses_date_and_time() {
        let slot = TimeSlot::parse("2025-03-14", "09:30").unwrap();
        assert_eq!(slot.to_string(), "2025-03-14 09:30");
    }

    #[test]
    fn slot_rejects_bad_formats() {
        assert!(matches!(
            TimeSlot::parse("14/03/2025", "09:30"),
            Err(ModelError::InvalidDate(_))
        ));
        assert!(matches!(
            TimeSlot::parse("2025-03-14", "9.30am"),
            Err(ModelError::InvalidTime(_))
        ));
    }

    #[test]
    fn blank_reason_is_dropped() {
        let slot = TimeSlot::parse("2025-03-14", "09:30").unwrap();
        let request =
            NewAppointment::new(UserId::new(1), UserId::new(2), slot).with_reason(Some("   "));
        assert_eq!(request.reason, None);
    }
}
