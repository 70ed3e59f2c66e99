// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use helpdesk_domain::{Principal, Role, TicketStatus, Trigger};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The principal who performed a recorded action.
///
/// The role is captured at the time of the action so later role changes
/// do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting principal's id.
    pub principal_id: String,
    /// The acting principal's role when the action happened.
    pub role: Role,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `principal_id` - The acting principal's id
    /// * `role` - The acting principal's role
    #[must_use]
    pub const fn new(principal_id: String, role: Role) -> Self {
        Self { principal_id, role }
    }
}

impl From<&Principal> for Actor {
    fn from(principal: &Principal) -> Self {
        Self::new(principal.principal_id.clone(), principal.role)
    }
}

/// An immutable record of one ticket lifecycle transition.
///
/// Every successful status or assignee change produces exactly one entry.
/// Entries are never edited; they disappear only when their ticket is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Storage-assigned id; `None` until persisted.
    pub history_id: Option<i64>,
    /// The ticket this entry belongs to; `None` while the ticket itself is unsaved.
    pub ticket_id: Option<i64>,
    /// Status before the transition.
    pub previous_status: TicketStatus,
    /// Status after the transition.
    pub new_status: TicketStatus,
    /// What caused the transition.
    pub trigger: Trigger,
    /// Who performed it.
    pub actor: Actor,
    /// Optional free-text note.
    pub note: Option<String>,
    /// When it happened.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

impl HistoryEntry {
    /// Creates a new, unsaved history entry.
    ///
    /// # Arguments
    ///
    /// * `ticket_id` - The ticket id, if the ticket has been saved
    /// * `previous_status` - Status before the transition
    /// * `new_status` - Status after the transition
    /// * `trigger` - What caused the transition
    /// * `actor` - Who performed it
    /// * `note` - Optional note
    /// * `recorded_at` - When it happened
    #[must_use]
    pub const fn new(
        ticket_id: Option<i64>,
        previous_status: TicketStatus,
        new_status: TicketStatus,
        trigger: Trigger,
        actor: Actor,
        note: Option<String>,
        recorded_at: OffsetDateTime,
    ) -> Self {
        Self {
            history_id: None,
            ticket_id,
            previous_status,
            new_status,
            trigger,
            actor,
            note,
            recorded_at,
        }
    }

    /// Returns this entry bound to a saved ticket.
    #[must_use]
    pub const fn for_ticket(mut self, ticket_id: i64) -> Self {
        self.ticket_id = Some(ticket_id);
        self
    }

    /// Returns true if the entry records a status change.
    #[must_use]
    pub fn changes_status(&self) -> bool {
        self.previous_status != self.new_status
    }
}
