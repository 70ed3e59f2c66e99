// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket notifications.
//!
//! Notifications are requested after a lifecycle operation has committed.
//! Delivery is best effort: a failed notification is logged and never
//! undoes the operation that caused it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use helpdesk_domain::TicketStatus;

/// Maximum number of notifications to buffer in the broadcast channel.
/// Slow subscribers lose the oldest notifications first.
const NOTIFICATION_BUFFER_SIZE: usize = 100;

/// What a notification tells its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient's ticket was submitted.
    TicketCreated,
    /// A ticket was assigned to the recipient.
    TicketAssigned,
    /// A ticket was handed to the recipient by a reject or escalate.
    TicketReassigned,
    /// The recipient's ticket changed status.
    StatusUpdated,
}

/// A request to notify one principal about one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub ticket_id: i64,
    /// The ticket's status after the operation.
    pub status: TicketStatus,
    pub recipient_id: String,
    pub recipient_email: String,
    /// The ticket title, if it has one.
    pub title: Option<String>,
}

/// Errors reported by a notification dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The message could not be handed to the delivery channel.
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A sink for notifications.
///
/// Implementations must not block; the service logs and discards errors.
pub trait NotificationDispatcher {
    /// Requests delivery of a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be queued.
    fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Dispatcher that fans notifications out over a `tokio::sync::broadcast`
/// channel.
///
/// Sending never waits for subscribers. With no subscriber the
/// notification is dropped.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    /// Creates a new notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(NOTIFICATION_BUFFER_SIZE);
        Self { tx }
    }

    /// Subscribes to notifications sent from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationDispatcher for BroadcastNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        let ticket_id: i64 = notification.ticket_id;
        match self.tx.send(notification) {
            Ok(count) => {
                debug!(ticket_id, receivers = count, "Broadcast notification");
            }
            Err(_) => {
                debug!(ticket_id, "No receivers for notification");
            }
        }
        Ok(())
    }
}
