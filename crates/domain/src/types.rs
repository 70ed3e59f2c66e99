// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::role::Role;
use crate::ticket_status::TicketStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    /// Returns the string representation of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identity known to the helpdesk.
///
/// Principal ids are opaque strings issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The identity-provider subject.
    pub principal_id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address, if known.
    pub email: Option<String>,
    /// Phone number, if known.
    pub phone: Option<String>,
    /// Fiscal code, if known.
    pub fiscal_code: Option<String>,
    /// The single stored role.
    pub role: Role,
}

impl Principal {
    /// Creates a principal without phone or fiscal code.
    ///
    /// # Arguments
    ///
    /// * `principal_id` - The identity-provider subject
    /// * `first_name` - First name
    /// * `last_name` - Last name
    /// * `email` - Email address
    /// * `role` - The stored role
    #[must_use]
    pub const fn new(
        principal_id: String,
        first_name: String,
        last_name: String,
        email: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            principal_id,
            first_name,
            last_name,
            email,
            phone: None,
            fiscal_code: None,
            role,
        }
    }

    /// Returns "First Last", trimmed.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Contact details recorded on a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fiscal_code: Option<String>,
}

/// A helpdesk ticket.
///
/// Invariants maintained by the lifecycle:
/// - an assignee implies the ticket is not a draft
/// - a solved ticket has `solved_at` set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Storage-assigned id; `None` until the ticket is first persisted.
    pub ticket_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub status: TicketStatus,
    /// Immutable after creation.
    pub owner_id: String,
    pub assignee_id: Option<String>,
    pub category_id: Option<i64>,
    pub service_id: Option<i64>,
    pub contact: ContactInfo,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub assigned_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub solved_at: Option<OffsetDateTime>,
    /// Optimistic concurrency counter, bumped on every save.
    pub version: i64,
}

impl Ticket {
    /// Creates an empty draft owned by `owner_id`.
    ///
    /// # Arguments
    ///
    /// * `owner_id` - The owning principal
    /// * `now` - Creation timestamp
    #[must_use]
    pub fn new_draft(owner_id: String, now: OffsetDateTime) -> Self {
        Self {
            ticket_id: None,
            title: None,
            description: None,
            priority: None,
            status: TicketStatus::Draft,
            owner_id,
            assignee_id: None,
            category_id: None,
            service_id: None,
            contact: ContactInfo::default(),
            created_at: now,
            updated_at: now,
            assigned_at: None,
            solved_at: None,
            version: 0,
        }
    }

    /// Checks if the given principal owns this ticket.
    #[must_use]
    pub fn is_owned_by(&self, principal_id: &str) -> bool {
        self.owner_id == principal_id
    }

    /// Checks if the given principal is the current assignee.
    #[must_use]
    pub fn is_assigned_to(&self, principal_id: &str) -> bool {
        self.assignee_id.as_deref() == Some(principal_id)
    }

    /// Checks if the ticket's contact email matches `email`, ignoring case.
    #[must_use]
    pub fn has_contact_email(&self, email: &str) -> bool {
        self.contact
            .email
            .as_deref()
            .is_some_and(|contact| contact.eq_ignore_ascii_case(email))
    }
}

/// A ticket category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A support service tickets can be filed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportService {
    pub service_id: i64,
    pub title: String,
    pub description: Option<String>,
}
