// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::role::Role;
use crate::ticket_status::TicketStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A status string could not be parsed.
    InvalidStatus(String),
    /// A priority string could not be parsed.
    InvalidPriority(String),
    /// A role string could not be parsed.
    InvalidRole(String),
    /// The trigger name is not recognized.
    InvalidTrigger(String),
    /// The requested status change is not part of the lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: TicketStatus,
        /// The requested status.
        to: TicketStatus,
        /// Why the transition was refused.
        reason: String,
    },
    /// A field required for a non-draft ticket is missing or blank.
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
    /// An email address is not well formed.
    InvalidEmail(String),
    /// Ticket does not exist.
    TicketNotFound(i64),
    /// Principal does not exist.
    PrincipalNotFound(String),
    /// Category does not exist.
    CategoryNotFound(i64),
    /// Support service does not exist.
    SupportServiceNotFound(i64),
    /// The principal cannot hold tickets.
    IneligibleAssignee {
        /// The rejected principal.
        principal_id: String,
        /// The principal's role.
        role: Role,
    },
    /// A ticket created on behalf of someone must be owned by a USER.
    InvalidOwner {
        /// The rejected principal.
        principal_id: String,
        /// The principal's role.
        role: Role,
    },
    /// A ticket cannot be handed back to the principal releasing it.
    SelfReassignment {
        /// The acting principal.
        principal_id: String,
    },
    /// The ticket is already assigned to this principal.
    AssigneeUnchanged {
        /// The current assignee.
        principal_id: String,
    },
    /// Draft tickets cannot carry an assignee.
    DraftAssignment,
    /// There is nobody to hand the ticket to.
    NoEligibleAssignee,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(value) => write!(f, "Invalid ticket status: '{value}'"),
            Self::InvalidPriority(value) => write!(f, "Invalid ticket priority: '{value}'"),
            Self::InvalidRole(value) => write!(f, "Invalid role: '{value}'"),
            Self::InvalidTrigger(value) => write!(f, "Invalid trigger: '{value}'"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot move ticket from {from} to {to}: {reason}")
            }
            Self::MissingField { field } => {
                write!(f, "Field '{field}' is required for non-draft tickets")
            }
            Self::InvalidEmail(value) => write!(f, "Invalid email address: '{value}'"),
            Self::TicketNotFound(id) => write!(f, "Ticket {id} not found"),
            Self::PrincipalNotFound(id) => write!(f, "Principal '{id}' not found"),
            Self::CategoryNotFound(id) => write!(f, "Category {id} not found"),
            Self::SupportServiceNotFound(id) => write!(f, "Support service {id} not found"),
            Self::IneligibleAssignee { principal_id, role } => {
                write!(
                    f,
                    "Principal '{principal_id}' with role {role} cannot be assigned tickets"
                )
            }
            Self::InvalidOwner { principal_id, role } => {
                write!(
                    f,
                    "Principal '{principal_id}' with role {role} cannot own tickets created on their behalf"
                )
            }
            Self::SelfReassignment { principal_id } => {
                write!(
                    f,
                    "Principal '{principal_id}' cannot reassign a ticket to themselves"
                )
            }
            Self::AssigneeUnchanged { principal_id } => {
                write!(f, "Ticket is already assigned to '{principal_id}'")
            }
            Self::DraftAssignment => write!(f, "Draft tickets cannot be assigned"),
            Self::NoEligibleAssignee => {
                write!(f, "No eligible assignee is available for this ticket")
            }
        }
    }
}

impl std::error::Error for DomainError {}
