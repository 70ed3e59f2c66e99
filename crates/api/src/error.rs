// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use helpdesk::{CoreError, StoreError};
use helpdesk_domain::DomainError;
use thiserror::Error;

/// Why the authorization policy refused an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Drafts are private to their owner and ADMIN.
    DraftNotOwned,
    /// The ticket is outside the principal's visibility.
    NotVisible,
    /// A USER may not modify a ticket once it has left DRAFT.
    NotEditableByUser,
    /// A helper may only modify tickets they hold or own.
    NotAssigneeOrOwner,
    /// Only the current assignee may perform the operation.
    NotAssignee,
    /// Only ADMIN or PM may perform the operation.
    ManagerRequired,
    /// Solved tickets can only be deleted by ADMIN.
    TicketSolved,
    /// The principal may not delete this ticket.
    DeleteNotPermitted,
    /// A USER may only submit tickets under their own name.
    ForeignOwner,
    /// A USER may not choose an assignee.
    AssigneeNotPermitted,
    /// A non-manager may only assign a submission to themselves.
    SelfAssignmentOnly,
}

impl DenyReason {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DraftNotOwned => "draft_not_owned",
            Self::NotVisible => "not_visible",
            Self::NotEditableByUser => "not_editable_by_user",
            Self::NotAssigneeOrOwner => "not_assignee_or_owner",
            Self::NotAssignee => "not_assignee",
            Self::ManagerRequired => "manager_required",
            Self::TicketSolved => "ticket_solved",
            Self::DeleteNotPermitted => "delete_not_permitted",
            Self::ForeignOwner => "foreign_owner",
            Self::AssigneeNotPermitted => "assignee_not_permitted",
            Self::SelfAssignmentOnly => "self_assignment_only",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message: &str = match self {
            Self::DraftNotOwned => "draft tickets are only accessible to their owner or an ADMIN",
            Self::NotVisible => "the ticket is not visible to this principal",
            Self::NotEditableByUser => "a USER may only modify their own drafts",
            Self::NotAssigneeOrOwner => "only the assignee or owner may modify this ticket",
            Self::NotAssignee => "only the current assignee may do this",
            Self::ManagerRequired => "only an ADMIN or PM may do this",
            Self::TicketSolved => "solved tickets can only be deleted by an ADMIN",
            Self::DeleteNotPermitted => "the principal may not delete this ticket",
            Self::ForeignOwner => "a USER may only submit tickets they own",
            Self::AssigneeNotPermitted => "a USER may not choose an assignee",
            Self::SelfAssignmentOnly => "only an ADMIN or PM may assign a ticket to someone else",
        };
        write!(f, "{message}")
    }
}

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: DenyReason,
    },
}

impl AuthError {
    pub(crate) fn unauthorized(action: &str, reason: DenyReason) -> Self {
        Self::Unauthorized {
            action: action.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}' refused, {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// The category of a lifecycle failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    Unauthorized,
    InvalidTransition,
    NoEligibleAssignee,
    ConflictingAssignment,
    Internal,
}

impl ErrorKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::NoEligibleAssignee => "NO_ELIGIBLE_ASSIGNEE",
            Self::ConflictingAssignment => "CONFLICTING_ASSIGNMENT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by the lifecycle service.
///
/// Lower-layer errors are translated explicitly so that domain, core and
/// storage types never leak through this boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// A referenced record does not exist.
    #[error("{resource} not found: {message}")]
    NotFound {
        /// The kind of record that was not found.
        resource: &'static str,
        /// What was looked up.
        message: String,
    },
    /// The submission is malformed or incomplete.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
    /// The principal may not perform the operation.
    #[error("Unauthorized ({code}): {message}")]
    Unauthorized {
        /// Stable reason code.
        code: &'static str,
        /// Human-readable explanation.
        message: String,
    },
    /// The status change is not part of the lifecycle.
    #[error("Invalid transition: {message}")]
    InvalidTransition {
        /// Human-readable explanation.
        message: String,
    },
    /// Nobody can receive the ticket.
    #[error("No eligible assignee is available")]
    NoEligibleAssignee,
    /// The ticket was modified concurrently.
    #[error("Conflicting assignment: {message}")]
    ConflictingAssignment {
        /// Human-readable explanation.
        message: String,
    },
    /// An unexpected failure, usually in storage.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the failure.
        message: String,
    },
}

impl LifecycleError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::NoEligibleAssignee => ErrorKind::NoEligibleAssignee,
            Self::ConflictingAssignment { .. } => ErrorKind::ConflictingAssignment,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<AuthError> for LifecycleError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::Unauthorized {
                code: "authentication_failed",
                message: reason,
            },
            AuthError::Unauthorized { action, reason } => Self::Unauthorized {
                code: reason.code(),
                message: format!("'{action}' refused: {reason}"),
            },
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::ConflictingAssignment {
                message: err.to_string(),
            },
            StoreError::Backend(message) => Self::Internal { message },
        }
    }
}

/// Translates a domain error into a lifecycle error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> LifecycleError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidStatus(_) => LifecycleError::validation("status", message),
        DomainError::InvalidPriority(_) => LifecycleError::validation("priority", message),
        DomainError::InvalidRole(_) => LifecycleError::validation("role", message),
        DomainError::InvalidTrigger(_) => LifecycleError::validation("trigger", message),
        DomainError::MissingField { field } => LifecycleError::validation(field, message),
        DomainError::InvalidEmail(_) => LifecycleError::validation("contact_email", message),
        DomainError::IneligibleAssignee { .. }
        | DomainError::AssigneeUnchanged { .. }
        | DomainError::DraftAssignment => LifecycleError::validation("assignee_id", message),
        DomainError::InvalidOwner { .. } => LifecycleError::validation("owner_id", message),
        DomainError::InvalidStatusTransition { .. } | DomainError::SelfReassignment { .. } => {
            LifecycleError::InvalidTransition { message }
        }
        DomainError::TicketNotFound(_) => LifecycleError::NotFound {
            resource: "Ticket",
            message,
        },
        DomainError::PrincipalNotFound(_) => LifecycleError::NotFound {
            resource: "Principal",
            message,
        },
        DomainError::CategoryNotFound(_) => LifecycleError::NotFound {
            resource: "Category",
            message,
        },
        DomainError::SupportServiceNotFound(_) => LifecycleError::NotFound {
            resource: "Support service",
            message,
        },
        DomainError::NoEligibleAssignee => LifecycleError::NoEligibleAssignee,
    }
}

/// Translates a core error into a lifecycle error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> LifecycleError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(message) => LifecycleError::Internal { message },
    }
}
