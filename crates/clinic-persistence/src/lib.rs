//! Persistent storage for the clinic booking system.
//!
//! # Features
//!
//! - **JSON database file** holding users, appointments and id counters
//! - **Atomic writes** (temp file + fsync + rename) to prevent corruption
//! - **Exclusive `.lock` file** around every read-modify-write, so several
//!   processes can share one database
//! - **Schema versioning**: newer files are refused instead of misread
//! - **Notification outbox** appending one JSON line per message
//!
//! # File Format
//!
//! ```text
//! {
//!   "format": "clinic-db",
//!   "schema_version": 1,
//!   "created_at": "...",
//!   "last_saved_at": "...",
//!   "tables": { "users": {...}, "appointments": {...}, ... }
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use clinic_persistence::JsonStore;
//!
//! let store = JsonStore::open("doctor_appointment.json")?;
//! let manager = LifecycleManager::new(&store, &notifier);
//! ```

mod error;
mod io;
mod outbox;
mod store;
mod types;

pub use error::{PersistenceError, Result};
pub use io::{FileLock, load_database, load_or_create, lock_path, save_database};
pub use outbox::{OutboxNotifier, read_outbox};
pub use store::JsonStore;
pub use types::{CURRENT_SCHEMA_VERSION, DatabaseFile, FORMAT_MARKER};
