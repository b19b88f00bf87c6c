//! Data model for the clinic appointment system.

pub mod appointment;
pub mod enums;
pub mod error;
pub mod ids;
pub mod user;

pub use appointment::{Appointment, DATE_FORMAT, NewAppointment, TIME_FORMAT, TimeSlot};
pub use enums::{Action, AppointmentStatus, NotificationKind, Role};
pub use error::{ModelError, Result};
pub use ids::{AppointmentId, UserId};
pub use user::{NewUser, User, normalize_email};
