//! Notification sinks.
//!
//! A [`Notifier`] delivers one message to one address. Delivery is
//! best-effort: the lifecycle manager logs failures and moves on.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinic_model::{AppointmentId, NotificationKind};

use crate::error::DeliveryError;

pub trait Notifier {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError> {
        (**self).send(recipient, kind, appointment)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError> {
        (**self).send(recipient, kind, appointment)
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError> {
        (**self).send(recipient, kind, appointment)
    }
}

/// A delivered (or attempted) message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub kind: NotificationKind,
    pub appointment_id: AppointmentId,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient: &str, kind: NotificationKind, appointment_id: AppointmentId) -> Self {
        Self {
            recipient: recipient.to_string(),
            kind,
            appointment_id,
            subject: kind.subject().to_string(),
            sent_at: Utc::now(),
        }
    }
}

/// Emits each notification as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier {
    show_addresses: bool,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include recipient addresses in log output (redacted by default).
    #[must_use]
    pub fn with_addresses(mut self, enable: bool) -> Self {
        self.show_addresses = enable;
        self
    }
}

impl Notifier for TracingNotifier {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError> {
        let recipient = if self.show_addresses {
            recipient
        } else {
            "[REDACTED]"
        };
        tracing::info!(
            recipient,
            kind = %kind,
            appointment_id = %appointment,
            subject = kind.subject(),
            "notification sent"
        );
        Ok(())
    }
}

/// Keeps every message in memory. Can be told to fail for given addresses.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: Vec<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every delivery to `recipient` instead of recording it.
    #[must_use]
    pub fn failing_for(mut self, recipient: impl Into<String>) -> Self {
        self.failing.push(recipient.into());
        self
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded messages.
    pub fn take(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|mut sent| std::mem::take(&mut *sent))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError> {
        if self.failing.iter().any(|address| address == recipient) {
            return Err(DeliveryError::new(recipient, "recipient unreachable"));
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::new(recipient, "recorder lock poisoned"))?;
        sent.push(Notification::new(recipient, kind, appointment));
        Ok(())
    }
}

/// Sends to every inner notifier; fails if any of them fails.
#[derive(Default)]
pub struct FanoutNotifier {
    sinks: Vec<Box<dyn Notifier + Send + Sync>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: impl Notifier + Send + Sync + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Notifier for FanoutNotifier {
    fn send(
        &self,
        recipient: &str,
        kind: NotificationKind,
        appointment: AppointmentId,
    ) -> Result<(), DeliveryError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(error) = sink.send(recipient, kind, appointment) {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
