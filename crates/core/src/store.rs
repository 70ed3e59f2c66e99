// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage boundaries used by the lifecycle service.
//!
//! Each trait covers one kind of record. A backend implements all of them
//! on one handle so a single transaction can span reads and writes.

use std::collections::BTreeMap;

use helpdesk_audit::HistoryEntry;
use helpdesk_domain::{
    AssigneeLoad, Category, Principal, Role, SupportService, Ticket, TicketPriority, TicketStatus,
};

/// Errors reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The stored ticket no longer has the version the caller read.
    Conflict {
        /// The ticket that was concurrently modified.
        ticket_id: i64,
        /// The version the caller expected to overwrite.
        expected_version: i64,
    },
    /// Any other backend failure.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict {
                ticket_id,
                expected_version,
            } => write!(
                f,
                "Ticket {ticket_id} was modified concurrently (expected version {expected_version})"
            ),
            Self::Backend(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Which tickets a principal may see in listings and counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Every ticket.
    All,
    /// Every ticket except drafts.
    NonDraft,
    /// Tickets assigned to or owned by the principal.
    AssignedOrOwned { principal_id: String },
    /// Tickets owned by the principal, plus non-draft tickets whose
    /// contact email matches theirs.
    OwnedOrContact {
        principal_id: String,
        email: Option<String>,
    },
}

impl Visibility {
    /// Returns the visibility scope for a principal's role.
    #[must_use]
    pub fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Admin => Self::All,
            Role::Pm => Self::NonDraft,
            Role::HelperJunior | Role::HelperSenior => Self::AssignedOrOwned {
                principal_id: principal.principal_id.clone(),
            },
            Role::User => Self::OwnedOrContact {
                principal_id: principal.principal_id.clone(),
                email: principal.email.clone(),
            },
        }
    }

    /// Returns true if `ticket` falls inside this scope.
    #[must_use]
    pub fn admits(&self, ticket: &Ticket) -> bool {
        match self {
            Self::All => true,
            Self::NonDraft => ticket.status != TicketStatus::Draft,
            Self::AssignedOrOwned { principal_id } => {
                ticket.is_assigned_to(principal_id) || ticket.is_owned_by(principal_id)
            }
            Self::OwnedOrContact {
                principal_id,
                email,
            } => {
                ticket.is_owned_by(principal_id)
                    || (ticket.status != TicketStatus::Draft
                        && email
                            .as_deref()
                            .is_some_and(|email| ticket.has_contact_email(email)))
            }
        }
    }
}

/// Filters and paging for ticket listings.
///
/// All filters are optional and combined with AND. `text` matches title
/// or description case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    pub visibility: Visibility,
    pub owner_id: Option<String>,
    pub assignee_id: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category_id: Option<i64>,
    pub service_id: Option<i64>,
    pub text: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

impl TicketQuery {
    /// Creates an unfiltered query over `visibility`.
    #[must_use]
    pub const fn new(visibility: Visibility, limit: u64) -> Self {
        Self {
            visibility,
            owner_id: None,
            assignee_id: None,
            status: None,
            priority: None,
            category_id: None,
            service_id: None,
            text: None,
            offset: 0,
            limit,
        }
    }
}

/// One page of a ticket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSlice {
    /// Tickets on this page, newest first.
    pub tickets: Vec<Ticket>,
    /// Number of tickets matching the query across all pages.
    pub total: u64,
}

/// Lookup and registration of principals.
pub trait UserDirectory {
    /// Finds a principal by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_principal(&mut self, principal_id: &str) -> Result<Option<Principal>, StoreError>;

    /// Finds a principal by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_principal_by_email(&mut self, email: &str) -> Result<Option<Principal>, StoreError>;

    /// Lists principals holding any of `roles`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_principals_by_roles(&mut self, roles: &[Role]) -> Result<Vec<Principal>, StoreError>;

    /// Lists principals holding `role`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_principals_by_role(&mut self, role: Role) -> Result<Vec<Principal>, StoreError> {
        self.find_principals_by_roles(&[role])
    }

    /// Inserts or replaces a principal.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn save_principal(&mut self, principal: &Principal) -> Result<(), StoreError>;
}

/// Read access to ticket categories.
pub trait CategoryCatalog {
    /// Finds a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_category(&mut self, category_id: i64) -> Result<Option<Category>, StoreError>;

    /// Lists all categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_categories(&mut self) -> Result<Vec<Category>, StoreError>;
}

/// Read access to support services.
pub trait SupportServiceCatalog {
    /// Finds a support service by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_support_service(
        &mut self,
        service_id: i64,
    ) -> Result<Option<SupportService>, StoreError>;

    /// Lists all support services by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_support_services(&mut self) -> Result<Vec<SupportService>, StoreError>;
}

/// Ticket storage with optimistic versioning.
pub trait TicketStore {
    /// Finds a ticket by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_ticket(&mut self, ticket_id: i64) -> Result<Option<Ticket>, StoreError>;

    /// Inserts a new ticket and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn insert_ticket(&mut self, ticket: &Ticket) -> Result<i64, StoreError>;

    /// Overwrites a stored ticket.
    ///
    /// The stored version must equal `ticket.version - 1`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the stored version differs, or a
    /// backend error.
    fn save_ticket(&mut self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Deletes a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete_ticket(&mut self, ticket_id: i64) -> Result<(), StoreError>;

    /// Returns one page of tickets matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn query_tickets(&mut self, query: &TicketQuery) -> Result<TicketSlice, StoreError>;

    /// Counts tickets per status inside `visibility`.
    ///
    /// Every status is present in the result, with zero when none match.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn count_statuses(
        &mut self,
        visibility: &Visibility,
    ) -> Result<BTreeMap<TicketStatus, u64>, StoreError>;

    /// Counts active tickets held by each of `principal_ids`.
    ///
    /// Every requested id is present in the result, with zero when it
    /// holds nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn active_assignment_counts(
        &mut self,
        principal_ids: &[String],
    ) -> Result<Vec<AssigneeLoad>, StoreError>;
}

/// Append-only transition history.
pub trait HistoryStore {
    /// Appends an entry and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not bound to a ticket or the backend fails.
    fn append_history(&mut self, entry: &HistoryEntry) -> Result<i64, StoreError>;

    /// Lists a ticket's entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_history(&mut self, ticket_id: i64) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Removes every entry of a ticket and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete_history(&mut self, ticket_id: i64) -> Result<usize, StoreError>;
}

/// Runs a unit of work atomically.
pub trait Transactional {
    /// Runs `f` inside a write transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a `StoreError` converted into
    /// `E` if the transaction cannot be opened or committed.
    fn in_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Self) -> Result<T, E>;
}

/// Everything the lifecycle service needs from a backend.
pub trait LifecycleStore:
    UserDirectory + CategoryCatalog + SupportServiceCatalog + TicketStore + HistoryStore + Transactional
{
}

impl<T> LifecycleStore for T where
    T: UserDirectory
        + CategoryCatalog
        + SupportServiceCatalog
        + TicketStore
        + HistoryStore
        + Transactional
{
}
