// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Concurrent access and lost-update handling.

use std::collections::BTreeMap;
use std::thread;

use helpdesk::{
    CategoryCatalog, HistoryStore, StoreError, SupportServiceCatalog, TicketQuery, TicketSlice,
    TicketStore, Transactional, UserDirectory, Visibility,
};
use helpdesk_audit::HistoryEntry;
use helpdesk_domain::{
    AssigneeLoad, Category, Principal, Role, SupportService, Ticket, TicketStatus,
};
use helpdesk_persistence::Persistence;

use crate::{ErrorKind, LifecycleError, LifecycleService, ServiceConfig};

use super::helpers::{
    RecordingNotifier, create_assigned_ticket, create_complete_submission,
    create_seeded_persistence, create_test_service, principal,
};

#[test]
fn test_concurrent_accepts_let_exactly_one_succeed() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();
    let shared = &service;

    let results: Vec<Result<Ticket, LifecycleError>> = thread::scope(|scope| {
        let handles: Vec<_> = ["h1", "pm1"]
            .into_iter()
            .map(|actor| scope.spawn(move || shared.accept(&principal(actor), ticket_id)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let failure = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(failure.kind(), ErrorKind::InvalidTransition);
    assert_eq!(service.history(&principal("root"), ticket_id).unwrap().len(), 2);
}

#[test]
fn test_concurrent_submissions_see_each_others_loads() {
    let service = create_test_service();
    let shared = &service;

    thread::scope(|scope| {
        for _ in 0..3 {
            scope.spawn(move || {
                shared
                    .create_or_update(
                        &principal("u1"),
                        &create_complete_submission(TicketStatus::Open),
                        None,
                    )
                    .unwrap();
            });
        }
    });

    let loads: Vec<u64> = service
        .assignee_loads()
        .unwrap()
        .into_iter()
        .filter(|load| load.principal_id.starts_with('h'))
        .map(|load| load.load)
        .collect();
    assert_eq!(loads, vec![1, 1, 1]);
}

/// Store whose next `save_ticket` calls fail as lost updates.
struct ConflictingStore {
    inner: Persistence,
    conflicts_left: usize,
}

impl UserDirectory for ConflictingStore {
    fn find_principal(&mut self, principal_id: &str) -> Result<Option<Principal>, StoreError> {
        self.inner.find_principal(principal_id)
    }

    fn find_principal_by_email(&mut self, email: &str) -> Result<Option<Principal>, StoreError> {
        self.inner.find_principal_by_email(email)
    }

    fn find_principals_by_roles(&mut self, roles: &[Role]) -> Result<Vec<Principal>, StoreError> {
        self.inner.find_principals_by_roles(roles)
    }

    fn save_principal(&mut self, principal: &Principal) -> Result<(), StoreError> {
        self.inner.save_principal(principal)
    }
}

impl CategoryCatalog for ConflictingStore {
    fn find_category(&mut self, category_id: i64) -> Result<Option<Category>, StoreError> {
        self.inner.find_category(category_id)
    }

    fn list_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        self.inner.list_categories()
    }
}

impl SupportServiceCatalog for ConflictingStore {
    fn find_support_service(
        &mut self,
        service_id: i64,
    ) -> Result<Option<SupportService>, StoreError> {
        self.inner.find_support_service(service_id)
    }

    fn list_support_services(&mut self) -> Result<Vec<SupportService>, StoreError> {
        self.inner.list_support_services()
    }
}

impl TicketStore for ConflictingStore {
    fn find_ticket(&mut self, ticket_id: i64) -> Result<Option<Ticket>, StoreError> {
        self.inner.find_ticket(ticket_id)
    }

    fn insert_ticket(&mut self, ticket: &Ticket) -> Result<i64, StoreError> {
        self.inner.insert_ticket(ticket)
    }

    fn save_ticket(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
        if self.conflicts_left > 0 {
            self.conflicts_left -= 1;
            return Err(StoreError::Conflict {
                ticket_id: ticket.ticket_id.unwrap(),
                expected_version: ticket.version - 1,
            });
        }
        self.inner.save_ticket(ticket)
    }

    fn delete_ticket(&mut self, ticket_id: i64) -> Result<(), StoreError> {
        self.inner.delete_ticket(ticket_id)
    }

    fn query_tickets(&mut self, query: &TicketQuery) -> Result<TicketSlice, StoreError> {
        self.inner.query_tickets(query)
    }

    fn count_statuses(
        &mut self,
        visibility: &Visibility,
    ) -> Result<BTreeMap<TicketStatus, u64>, StoreError> {
        self.inner.count_statuses(visibility)
    }

    fn active_assignment_counts(
        &mut self,
        principal_ids: &[String],
    ) -> Result<Vec<AssigneeLoad>, StoreError> {
        self.inner.active_assignment_counts(principal_ids)
    }
}

impl HistoryStore for ConflictingStore {
    fn append_history(&mut self, entry: &HistoryEntry) -> Result<i64, StoreError> {
        self.inner.append_history(entry)
    }

    fn list_history(&mut self, ticket_id: i64) -> Result<Vec<HistoryEntry>, StoreError> {
        self.inner.list_history(ticket_id)
    }

    fn delete_history(&mut self, ticket_id: i64) -> Result<usize, StoreError> {
        self.inner.delete_history(ticket_id)
    }
}

impl Transactional for ConflictingStore {
    fn in_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        f(self)
    }
}

fn create_conflicting_service(
    conflicts: usize,
    config: ServiceConfig,
) -> (LifecycleService<ConflictingStore, RecordingNotifier>, i64) {
    let mut inner: Persistence = create_seeded_persistence();
    let mut ticket: Ticket = Ticket::new_draft(String::from("u1"), time::OffsetDateTime::now_utc());
    ticket.status = TicketStatus::Open;
    ticket.assignee_id = Some(String::from("h1"));
    ticket.version = 1;
    let ticket_id: i64 = inner.insert_ticket(&ticket).unwrap();

    let store = ConflictingStore {
        inner,
        conflicts_left: conflicts,
    };
    (
        LifecycleService::with_config(store, RecordingNotifier::default(), config),
        ticket_id,
    )
}

#[test]
fn test_lost_update_is_retried_once() {
    let (service, ticket_id) = create_conflicting_service(1, ServiceConfig::default());

    let result = service.accept(&principal("h1"), ticket_id);

    assert!(result.is_ok());
    assert_eq!(result.unwrap().status, TicketStatus::Answered);
}

#[test]
fn test_repeated_lost_update_surfaces_conflict() {
    let (service, ticket_id) = create_conflicting_service(2, ServiceConfig::default());

    let result = service.accept(&principal("h1"), ticket_id);

    assert_eq!(result.unwrap_err().kind(), ErrorKind::ConflictingAssignment);
}

#[test]
fn test_retry_can_be_disabled() {
    let config: ServiceConfig = ServiceConfig {
        retry_on_conflict: false,
        ..ServiceConfig::default()
    };
    let (service, ticket_id) = create_conflicting_service(1, config);

    let result = service.accept(&principal("h1"), ticket_id);

    assert_eq!(result.unwrap_err().kind(), ErrorKind::ConflictingAssignment);
    assert!(service.notifier().sent().is_empty());
}
