//! File I/O operations.

mod load;
mod lock;
mod save;

pub use load::{load_database, load_or_create};
pub use lock::{FileLock, lock_path};
pub use save::save_database;
