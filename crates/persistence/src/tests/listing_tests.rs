// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use crate::Persistence;
use crate::tests::{create_seeded_persistence, insert_test_ticket};
use helpdesk::{TicketQuery, TicketSlice, TicketStore, Visibility};
use helpdesk_domain::{Ticket, TicketPriority, TicketStatus};

/// Seeds a draft and an open ticket for u1, and an answered and a solved ticket for u2.
fn seed(persistence: &mut Persistence) -> Vec<Ticket> {
    vec![
        insert_test_ticket(persistence, "u1", TicketStatus::Draft, None),
        insert_test_ticket(persistence, "u1", TicketStatus::Open, Some("h1")),
        insert_test_ticket(persistence, "u2", TicketStatus::Answered, Some("h2")),
        insert_test_ticket(persistence, "u2", TicketStatus::Solved, Some("h1")),
    ]
}

fn ids(slice: &TicketSlice) -> Vec<i64> {
    slice.tickets.iter().filter_map(|t| t.ticket_id).collect()
}

#[test]
fn test_admin_sees_everything_newest_first() {
    let mut persistence: Persistence = create_seeded_persistence();
    let tickets: Vec<Ticket> = seed(&mut persistence);

    let slice: TicketSlice = persistence
        .query_tickets(&TicketQuery::new(Visibility::All, 20))
        .unwrap();

    assert_eq!(slice.total, 4);
    let expected: Vec<i64> = tickets.iter().rev().filter_map(|t| t.ticket_id).collect();
    assert_eq!(ids(&slice), expected);
}

#[test]
fn test_non_draft_scope_hides_drafts() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);

    let slice: TicketSlice = persistence
        .query_tickets(&TicketQuery::new(Visibility::NonDraft, 20))
        .unwrap();

    assert_eq!(slice.total, 3);
    assert!(slice.tickets.iter().all(|t| t.status != TicketStatus::Draft));
}

#[test]
fn test_helper_scope_is_assigned_tickets() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);
    let scope: Visibility = Visibility::AssignedOrOwned {
        principal_id: String::from("h1"),
    };

    let slice: TicketSlice = persistence
        .query_tickets(&TicketQuery::new(scope, 20))
        .unwrap();

    assert_eq!(slice.total, 2);
    assert!(slice.tickets.iter().all(|t| t.is_assigned_to("h1")));
}

#[test]
fn test_user_scope_matches_contact_email_case_insensitively() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);
    let scope: Visibility = Visibility::OwnedOrContact {
        principal_id: String::from("someone"),
        email: Some(String::from("U2@EXAMPLE.COM")),
    };

    let slice: TicketSlice = persistence
        .query_tickets(&TicketQuery::new(scope, 20))
        .unwrap();

    assert_eq!(slice.total, 2);
    assert!(slice.tickets.iter().all(|t| t.owner_id == "u2"));
}

#[test]
fn test_user_scope_includes_own_drafts() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);
    let scope: Visibility = Visibility::OwnedOrContact {
        principal_id: String::from("u1"),
        email: None,
    };

    let slice: TicketSlice = persistence
        .query_tickets(&TicketQuery::new(scope, 20))
        .unwrap();

    assert_eq!(slice.total, 2);
}

#[test]
fn test_filters_combine() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);
    let mut query: TicketQuery = TicketQuery::new(Visibility::All, 20);
    query.assignee_id = Some(String::from("h1"));
    query.status = Some(TicketStatus::Solved);
    query.priority = Some(TicketPriority::High);

    let slice: TicketSlice = persistence.query_tickets(&query).unwrap();

    assert_eq!(slice.total, 1);
    assert_eq!(slice.tickets[0].owner_id, "u2");
}

#[test]
fn test_text_filter_matches_title_ignoring_case() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);
    let mut query: TicketQuery = TicketQuery::new(Visibility::All, 20);
    query.text = Some(String::from("PRINTER"));

    assert_eq!(persistence.query_tickets(&query).unwrap().total, 4);

    query.text = Some(String::from("scanner"));
    assert_eq!(persistence.query_tickets(&query).unwrap().total, 0);
}

#[test]
fn test_paging_keeps_total() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);
    let mut query: TicketQuery = TicketQuery::new(Visibility::All, 3);
    query.offset = 3;

    let slice: TicketSlice = persistence.query_tickets(&query).unwrap();

    assert_eq!(slice.total, 4);
    assert_eq!(slice.tickets.len(), 1);
}

#[test]
fn test_status_counts_follow_visibility() {
    let mut persistence: Persistence = create_seeded_persistence();
    seed(&mut persistence);

    let all: BTreeMap<TicketStatus, u64> = persistence.count_statuses(&Visibility::All).unwrap();
    let pm: BTreeMap<TicketStatus, u64> =
        persistence.count_statuses(&Visibility::NonDraft).unwrap();

    assert_eq!(all[&TicketStatus::Draft], 1);
    assert_eq!(all[&TicketStatus::Open], 1);
    assert_eq!(all[&TicketStatus::Answered], 1);
    assert_eq!(all[&TicketStatus::Solved], 1);
    assert_eq!(pm[&TicketStatus::Draft], 0);
    assert_eq!(pm.len(), 4);
}
