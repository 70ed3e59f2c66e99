// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod listing_tests;

use crate::Persistence;
use helpdesk::{TicketStore, UserDirectory};
use helpdesk_domain::{ContactInfo, Principal, Role, Ticket, TicketPriority, TicketStatus};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_time() -> OffsetDateTime {
    datetime!(2026-03-02 09:00 UTC)
}

pub fn create_test_principal(id: &str, role: Role) -> Principal {
    Principal::new(
        String::from(id),
        String::from("Test"),
        id.to_uppercase(),
        Some(format!("{id}@example.com")),
        role,
    )
}

/// A database seeded with one principal per role, a category and a service.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    for (id, role) in [
        ("u1", Role::User),
        ("u2", Role::User),
        ("h1", Role::HelperJunior),
        ("h2", Role::HelperSenior),
        ("pm1", Role::Pm),
        ("admin1", Role::Admin),
    ] {
        persistence
            .save_principal(&create_test_principal(id, role))
            .unwrap();
    }
    persistence
        .create_category("Hardware", Some("Broken things"))
        .unwrap();
    persistence
        .create_support_service("Workstations", None)
        .unwrap();
    persistence
}

/// An unsaved complete ticket owned by `owner_id`.
pub fn create_test_ticket(owner_id: &str, status: TicketStatus, assignee_id: Option<&str>) -> Ticket {
    let mut ticket: Ticket = Ticket::new_draft(String::from(owner_id), create_test_time());
    ticket.title = Some(String::from("Printer offline"));
    ticket.description = Some(String::from("The third floor printer is unreachable"));
    ticket.priority = Some(TicketPriority::High);
    ticket.category_id = Some(1);
    ticket.service_id = Some(1);
    ticket.contact = ContactInfo {
        email: Some(format!("{owner_id}@example.com")),
        phone: Some(String::from("+39 055 123456")),
        fiscal_code: Some(String::from("RSSMRA80A01H501U")),
    };
    ticket.status = status;
    ticket.assignee_id = assignee_id.map(String::from);
    ticket.assigned_at = assignee_id.map(|_| create_test_time());
    ticket.version = 1;
    ticket
}

/// Inserts a ticket and returns it with its id set.
pub fn insert_test_ticket(
    persistence: &mut Persistence,
    owner_id: &str,
    status: TicketStatus,
    assignee_id: Option<&str>,
) -> Ticket {
    let mut ticket: Ticket = create_test_ticket(owner_id, status, assignee_id);
    let ticket_id: i64 = persistence.insert_ticket(&ticket).unwrap();
    ticket.ticket_id = Some(ticket_id);
    ticket
}
