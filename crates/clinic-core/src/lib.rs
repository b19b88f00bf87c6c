//! Appointment lifecycle core.
//!
//! The lifecycle manager enforces the appointment state machine and emits
//! notifications on every successful transition. Storage and delivery are
//! collaborators behind the [`ClinicStore`] and [`Notifier`] traits so the
//! same rules run against the in-memory store in tests and the JSON file
//! store in the CLI.
//!
//! # Example
//!
//! ```ignore
//! let store = MemoryStore::new();
//! let notifier = TracingNotifier::new();
//! let manager = LifecycleManager::new(&store, &notifier);
//! let booked = manager.book(NewAppointment::new(patient.id, doctor.id, slot), &patient)?;
//! manager.approve(booked.id, &doctor)?;
//! ```

pub mod accounts;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod notify;
pub mod queries;
pub mod store;

pub use accounts::{SAMPLE_USERS, ensure_user, register, seed_sample_users};
pub use error::{DeliveryError, LifecycleError, QueryError, RegistrationError, StoreError};
pub use lifecycle::{LifecycleManager, Recipient, Transition, available_actions, find_transition};
pub use memory::MemoryStore;
pub use notify::{FanoutNotifier, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use queries::{
    ClinicStats, admin_stats, dashboard, list_doctors, list_users, specializations,
};
pub use store::{AppointmentStore, ClinicStore, StoreTables, UserStore};
