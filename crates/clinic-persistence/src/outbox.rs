//! Notification outbox: one JSON object per line, appended to a file.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clinic_core::{DeliveryError, Notification, Notifier};
use clinic_model::{AppointmentId, NotificationKind};

use crate::error::{PersistenceError, Result};

#[derive(Debug)]
pub struct OutboxNotifier {
    path: PathBuf,
    // serializes appends from concurrent senders
    write_lock: Mutex<()>,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, notification: &Notification) -> std::io::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| std::io::Error::other("outbox lock poisoned"))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_vec(notification).map_err(std::io::Error::other)?;
        line.push(b'\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)
    }
}

impl Notifier for OutboxNotifier {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> std::result::Result<(), DeliveryError> {
        let notification = Notification::new(recipient, kind, appointment);
        self.append(&notification)
            .map_err(|error| DeliveryError::new(recipient, error.to_string()))
    }
}

/// Read every notification written to the outbox at `path`.
pub fn read_outbox(path: &Path) -> Result<Vec<Notification>> {
    let file = fs::File::open(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut notifications = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| PersistenceError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let notification =
            serde_json::from_str(&line).map_err(|source| PersistenceError::Deserialization {
                path: path.to_path_buf(),
                source,
            })?;
        notifications.push(notification);
    }
    Ok(notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn appends_one_line_per_message() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");
        let outbox = OutboxNotifier::new(&path);

        outbox
            .send("a@example.com", NotificationKind::BookingRequested, AppointmentId::new(1))
            .unwrap();
        outbox
            .send("b@example.com", NotificationKind::BookingReceived, AppointmentId::new(1))
            .unwrap();

        let messages = read_outbox(&path).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].recipient, "b@example.com");
        assert_eq!(messages[1].kind, NotificationKind::BookingReceived);
    }

    #[test]
    fn unwritable_outbox_reports_delivery_error() {
        let dir = tempdir().unwrap();
        // a directory cannot be opened for appending
        let outbox = OutboxNotifier::new(dir.path());
        let result = outbox.send(
            "a@example.com",
            NotificationKind::AppointmentApproved,
            AppointmentId::new(2),
        );
        assert!(result.is_err());
    }
}
