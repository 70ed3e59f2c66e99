// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the lifecycle service.

use helpdesk_domain::{TicketPriority, TicketStatus};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A ticket submission, used both to create a ticket and to edit one.
///
/// Blank text fields are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSubmission {
    /// The owning USER. Required when a non-USER creates a ticket; a USER
    /// always owns their own submissions.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_fiscal_code: Option<String>,
    /// The requested status.
    pub status: TicketStatus,
    /// An explicit assignee.
    #[serde(default)]
    pub assignee_id: Option<String>,
}

impl TicketSubmission {
    /// Creates an empty submission targeting `status`.
    #[must_use]
    pub const fn new(status: TicketStatus) -> Self {
        Self {
            owner_id: None,
            title: None,
            description: None,
            priority: None,
            category_id: None,
            service_id: None,
            contact_email: None,
            contact_phone: None,
            contact_fiscal_code: None,
            status,
            assignee_id: None,
        }
    }
}

/// Optional listing filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilters {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub service_id: Option<i64>,
    /// Case-insensitive match against title or description.
    #[serde(default)]
    pub text: Option<String>,
}

/// Zero-based page selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page index, starting at zero.
    #[serde(default)]
    pub page: u64,
    /// Page size; the service default applies when absent.
    #[serde(default)]
    pub size: Option<u64>,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: u64, size: Option<u64>) -> Self {
        Self { page, size }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    /// Number of matches across all pages.
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Creates a page, deriving the page count from `total` and `size`.
    #[must_use]
    pub const fn new(items: Vec<T>, page: u64, size: u64, total: u64) -> Self {
        let total_pages: u64 = if size == 0 { 0 } else { total.div_ceil(size) };
        Self {
            items,
            page,
            size,
            total,
            total_pages,
        }
    }
}

/// Per-status ticket counts for a dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub total: u64,
    pub draft: u64,
    pub open: u64,
    pub answered: u64,
    pub solved: u64,
}

impl DashboardCounts {
    /// Adds `count` tickets of `status`.
    pub fn record(&mut self, status: TicketStatus, count: u64) {
        match status {
            TicketStatus::Draft => self.draft += count,
            TicketStatus::Open => self.open += count,
            TicketStatus::Answered => self.answered += count,
            TicketStatus::Solved => self.solved += count,
        }
        self.total += count;
    }

    /// Returns the share of visible tickets that are solved, in percent.
    #[must_use]
    pub fn solved_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let solved: f64 = self.solved.to_f64().unwrap_or(0.0);
        let total: f64 = self.total.to_f64().unwrap_or(1.0);
        solved * 100.0 / total
    }
}

/// Represents whether a specific action is permitted.
///
/// This enum provides better type safety than raw booleans and serializes
/// to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(value))
    }
}

/// What a principal may currently do with one ticket.
///
/// Advisory only; every operation is still authorized on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCapabilities {
    pub can_modify: Capability,
    pub can_accept: Capability,
    pub can_reject: Capability,
    pub can_escalate: Capability,
    pub can_change_status: Capability,
    pub can_assign: Capability,
    pub can_delete: Capability,
}
