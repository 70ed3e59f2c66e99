// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::{ContactInfo, Principal, TicketPriority, TicketStatus};

/// How the assignee carried by a submission was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeChoice {
    /// Named by the submitter.
    Explicit(Principal),
    /// Picked by the assignment balancer.
    Balanced(Principal),
}

impl AssigneeChoice {
    /// Returns the chosen principal.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        match self {
            Self::Explicit(principal) | Self::Balanced(principal) => principal,
        }
    }

    /// Returns true if the submitter named the assignee.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}

/// The resolved contents of a create or update submission.
///
/// Catalog references have already been checked to exist and the assignee
/// has already been looked up when this reaches the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub category_id: Option<i64>,
    pub service_id: Option<i64>,
    pub contact: ContactInfo,
    /// The status the submitter asked for.
    pub target_status: TicketStatus,
    /// The assignee to bind, if any. `None` keeps the current assignee.
    pub assignee: Option<AssigneeChoice>,
}

/// A command represents principal intent as data only.
///
/// Commands are the only way to request ticket changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply a submission to an existing ticket.
    Edit {
        /// The resolved submission.
        edit: TicketEdit,
    },
    /// Take an open ticket in charge.
    Accept,
    /// Hand an open ticket to another helper.
    Reject {
        /// The principal receiving the ticket.
        new_assignee: Principal,
    },
    /// Hand an answered ticket to another helper.
    Escalate {
        /// The principal receiving the ticket.
        new_assignee: Principal,
    },
    /// Move a ticket along the plain lifecycle path.
    ChangeStatus {
        /// The requested status.
        target: TicketStatus,
    },
    /// Bind a ticket to a specific assignee.
    Assign {
        /// The principal receiving the ticket.
        assignee: Principal,
    },
}

impl Command {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Edit { .. } => "Edit",
            Self::Accept => "Accept",
            Self::Reject { .. } => "Reject",
            Self::Escalate { .. } => "Escalate",
            Self::ChangeStatus { .. } => "ChangeStatus",
            Self::Assign { .. } => "Assign",
        }
    }
}
