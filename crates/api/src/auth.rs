// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization policy for ticket operations.
//!
//! The policy is pure: it looks only at the acting principal and the
//! ticket as currently stored. Whether the requested status change is
//! legal is decided afterwards by the lifecycle table.

use helpdesk_domain::{Principal, Role, Ticket, TicketStatus};

use crate::error::{AuthError, DenyReason};
use crate::request_response::TicketSubmission;

/// An operation a principal may attempt on an existing ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Modify,
    Accept,
    Reject,
    Escalate,
    ChangeStatus,
    Assign,
    Delete,
    ViewHistory,
}

impl Operation {
    /// Returns the string representation of the operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Modify => "modify",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Escalate => "escalate",
            Self::ChangeStatus => "change_status",
            Self::Assign => "assign",
            Self::Delete => "delete",
            Self::ViewHistory => "view_history",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role-based access rules for tickets.
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    /// Checks whether `principal` may perform `operation` on `ticket`.
    ///
    /// - Drafts are reachable only by their owner and ADMIN.
    /// - ADMIN and PM may read and modify every non-draft ticket.
    /// - Helpers may read and modify tickets they hold or own.
    /// - A USER may read tickets they own or whose contact email is theirs,
    ///   and may modify only their own drafts.
    /// - Accepting needs the assignee or a manager; rejecting and
    ///   escalating need the assignee; changing status needs the assignee
    ///   or a manager; assigning needs a manager.
    /// - ADMIN may delete anything, the owner may delete a draft, and a
    ///   helper or PM may delete a ticket they hold unless it is solved.
    ///
    /// # Arguments
    ///
    /// * `principal` - The acting principal
    /// * `ticket` - The ticket as currently stored
    /// * `operation` - The attempted operation
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` with the reason for the refusal.
    pub fn authorize(
        principal: &Principal,
        ticket: &Ticket,
        operation: Operation,
    ) -> Result<(), AuthError> {
        let action: &str = operation.as_str();
        let deny = |reason: DenyReason| Err(AuthError::unauthorized(action, reason));

        let id: &str = &principal.principal_id;
        let is_owner: bool = ticket.is_owned_by(id);
        let is_assignee: bool = ticket.is_assigned_to(id);
        let is_manager: bool = principal.role.is_manager();

        if ticket.status == TicketStatus::Draft && !is_owner && principal.role != Role::Admin {
            return deny(DenyReason::DraftNotOwned);
        }

        match operation {
            Operation::Read | Operation::ViewHistory => {
                let visible: bool = match principal.role {
                    Role::Admin | Role::Pm => true,
                    Role::HelperJunior | Role::HelperSenior => is_assignee || is_owner,
                    Role::User => {
                        is_owner
                            || principal
                                .email
                                .as_deref()
                                .is_some_and(|email| ticket.has_contact_email(email))
                    }
                };
                if visible {
                    Ok(())
                } else {
                    deny(DenyReason::NotVisible)
                }
            }
            Operation::Modify => match principal.role {
                Role::Admin | Role::Pm => Ok(()),
                Role::HelperJunior | Role::HelperSenior if is_assignee || is_owner => Ok(()),
                Role::HelperJunior | Role::HelperSenior => deny(DenyReason::NotAssigneeOrOwner),
                Role::User if is_owner && ticket.status == TicketStatus::Draft => Ok(()),
                Role::User => deny(DenyReason::NotEditableByUser),
            },
            Operation::Accept | Operation::ChangeStatus => {
                if is_assignee || is_manager {
                    Ok(())
                } else {
                    deny(DenyReason::NotAssignee)
                }
            }
            Operation::Reject | Operation::Escalate => {
                if is_assignee {
                    Ok(())
                } else {
                    deny(DenyReason::NotAssignee)
                }
            }
            Operation::Assign => {
                if is_manager {
                    Ok(())
                } else {
                    deny(DenyReason::ManagerRequired)
                }
            }
            Operation::Delete => {
                Self::authorize_delete(principal, ticket, is_owner, is_assignee).or_else(deny)
            }
        }
    }

    fn authorize_delete(
        principal: &Principal,
        ticket: &Ticket,
        is_owner: bool,
        is_assignee: bool,
    ) -> Result<(), DenyReason> {
        match principal.role {
            Role::Admin => Ok(()),
            _ if ticket.status == TicketStatus::Draft && is_owner => Ok(()),
            Role::User => Err(DenyReason::DeleteNotPermitted),
            _ if !is_assignee => Err(DenyReason::DeleteNotPermitted),
            _ if ticket.status == TicketStatus::Solved => Err(DenyReason::TicketSolved),
            _ => Ok(()),
        }
    }

    /// Checks whether `principal` may make `submission`.
    ///
    /// Editing an existing ticket first requires [`Operation::Modify`].
    /// A USER may only submit under their own name and never picks an
    /// assignee; other non-managers may only name themselves.
    ///
    /// # Arguments
    ///
    /// * `principal` - The acting principal
    /// * `existing` - The stored ticket, when editing
    /// * `submission` - The submission
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` with the reason for the refusal.
    pub fn authorize_submission(
        principal: &Principal,
        existing: Option<&Ticket>,
        submission: &TicketSubmission,
    ) -> Result<(), AuthError> {
        let action: &str = if existing.is_some() {
            "update_ticket"
        } else {
            "create_ticket"
        };

        if let Some(ticket) = existing {
            Self::authorize(principal, ticket, Operation::Modify)?;
        }

        if principal.role == Role::User {
            if submission
                .owner_id
                .as_deref()
                .is_some_and(|owner_id| owner_id != principal.principal_id)
            {
                return Err(AuthError::unauthorized(action, DenyReason::ForeignOwner));
            }
            if submission.assignee_id.is_some() {
                return Err(AuthError::unauthorized(
                    action,
                    DenyReason::AssigneeNotPermitted,
                ));
            }
        } else if !principal.role.is_manager()
            && submission
                .assignee_id
                .as_deref()
                .is_some_and(|assignee_id| assignee_id != principal.principal_id)
        {
            return Err(AuthError::unauthorized(
                action,
                DenyReason::SelfAssignmentOnly,
            ));
        }

        Ok(())
    }
}
