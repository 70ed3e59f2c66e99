// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket status lifecycle.
//!
//! This module defines the ticket statuses and the table of permitted
//! transitions. Every edge is tied to the trigger that may take it; a
//! status change not listed here is refused.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ticket statuses.
///
/// Exactly one status holds at any time. `Draft` and `Open` are the
/// initial statuses; `Solved` is terminal on the plain path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Being written by its owner. Invisible to helpers.
    Draft,
    /// Submitted and waiting for the assignee to take it.
    Open,
    /// Taken in charge by the assignee.
    Answered,
    /// Resolved.
    Solved,
}

impl TicketStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Open, Self::Answered, Self::Solved];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::Answered => "ANSWERED",
            Self::Solved => "SOLVED",
        }
    }

    /// Returns true when tickets in this status count towards an assignee's load.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Answered)
    }

    /// Returns true for statuses a ticket may be created in on the plain path.
    #[must_use]
    pub const fn is_initial(&self) -> bool {
        matches!(self, Self::Draft | Self::Open)
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "OPEN" => Ok(Self::Open),
            "ANSWERED" => Ok(Self::Answered),
            "SOLVED" => Ok(Self::Solved),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What caused a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The owner (or an admin) submits a draft.
    Finalize,
    /// The assignee takes the ticket in charge.
    Accept,
    /// The assignee hands an open ticket to someone else.
    Reject,
    /// The assignee hands an answered ticket to someone else.
    Escalate,
    /// The ticket is marked as solved.
    Resolve,
    /// A manager hands the ticket to a specific assignee.
    Assign,
    /// An admin or PM edits the ticket directly.
    Override,
}

impl Trigger {
    /// Returns the string representation of the trigger.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Finalize => "finalize",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Escalate => "escalate",
            Self::Resolve => "resolve",
            Self::Assign => "assign",
            Self::Override => "override",
        }
    }

    /// Maps a plain status change request to the trigger that performs it.
    ///
    /// Only `Answered` (accept) and `Solved` (resolve) can be requested
    /// directly; every other target must go through its dedicated operation.
    #[must_use]
    pub const fn for_status_change(target: TicketStatus) -> Option<Self> {
        match target {
            TicketStatus::Answered => Some(Self::Accept),
            TicketStatus::Solved => Some(Self::Resolve),
            TicketStatus::Draft | TicketStatus::Open => None,
        }
    }
}

impl FromStr for Trigger {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "finalize" => Ok(Self::Finalize),
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "escalate" => Ok(Self::Escalate),
            "resolve" => Ok(Self::Resolve),
            "assign" => Ok(Self::Assign),
            "override" => Ok(Self::Override),
            _ => Err(DomainError::InvalidTrigger(s.to_string())),
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validates a status change against the lifecycle table.
///
/// | From          | To       | Trigger  |
/// |---------------|----------|----------|
/// | DRAFT         | OPEN     | finalize |
/// | OPEN          | ANSWERED | accept   |
/// | OPEN          | OPEN     | reject   |
/// | ANSWERED      | OPEN     | escalate |
/// | OPEN/ANSWERED | SOLVED   | resolve  |
/// | non-DRAFT     | same     | assign   |
/// | any           | any      | override |
///
/// Role guards are enforced separately by the authorization policy.
///
/// # Errors
///
/// Returns `DomainError::InvalidStatusTransition` if the edge is not in the table.
pub fn validate_transition(
    from: TicketStatus,
    to: TicketStatus,
    trigger: Trigger,
) -> Result<(), DomainError> {
    let valid: bool = match trigger {
        Trigger::Finalize => matches!((from, to), (TicketStatus::Draft, TicketStatus::Open)),
        Trigger::Accept => matches!((from, to), (TicketStatus::Open, TicketStatus::Answered)),
        Trigger::Reject => matches!((from, to), (TicketStatus::Open, TicketStatus::Open)),
        Trigger::Escalate => matches!((from, to), (TicketStatus::Answered, TicketStatus::Open)),
        Trigger::Resolve => matches!(
            (from, to),
            (TicketStatus::Open | TicketStatus::Answered, TicketStatus::Solved)
        ),
        Trigger::Assign => from == to && from != TicketStatus::Draft,
        Trigger::Override => true,
    };

    if valid {
        return Ok(());
    }

    let reason: String = if from == TicketStatus::Solved {
        String::from("solved tickets can only be reopened by a direct edit")
    } else if from == TicketStatus::Draft {
        String::from("draft tickets must be finalized through a submission")
    } else {
        format!("'{trigger}' does not lead from {from} to {to}")
    };

    Err(DomainError::InvalidStatusTransition { from, to, reason })
}
