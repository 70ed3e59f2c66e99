// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AssigneeChoice, TicketEdit};
use helpdesk_domain::{ContactInfo, Principal, Role, Ticket, TicketPriority, TicketStatus};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_time() -> OffsetDateTime {
    datetime!(2026-03-02 09:00 UTC)
}

pub fn create_later_time() -> OffsetDateTime {
    datetime!(2026-03-02 11:30 UTC)
}

fn principal(id: &str, role: Role) -> Principal {
    Principal::new(
        String::from(id),
        String::from("Test"),
        id.to_uppercase(),
        Some(format!("{id}@example.com")),
        role,
    )
}

pub fn create_test_user() -> Principal {
    principal("u1", Role::User)
}

pub fn create_test_junior() -> Principal {
    principal("h1", Role::HelperJunior)
}

pub fn create_test_senior() -> Principal {
    principal("h2", Role::HelperSenior)
}

pub fn create_test_pm() -> Principal {
    principal("pm1", Role::Pm)
}

pub fn create_test_admin() -> Principal {
    principal("admin1", Role::Admin)
}

/// A submission with every mandatory field filled in.
pub fn create_complete_edit(target_status: TicketStatus) -> TicketEdit {
    TicketEdit {
        title: Some(String::from("Printer offline")),
        description: Some(String::from("The third floor printer is unreachable")),
        priority: Some(TicketPriority::High),
        category_id: Some(1),
        service_id: Some(1),
        contact: ContactInfo {
            email: Some(String::from("u1@example.com")),
            phone: Some(String::from("+39 055 123456")),
            fiscal_code: Some(String::from("RSSMRA80A01H501U")),
        },
        target_status,
        assignee: None,
    }
}

pub fn with_assignee(mut edit: TicketEdit, choice: AssigneeChoice) -> TicketEdit {
    edit.assignee = Some(choice);
    edit
}

/// A saved ticket in `status`, complete and owned by `u1`.
pub fn create_saved_ticket(status: TicketStatus, assignee_id: Option<&str>) -> Ticket {
    let mut ticket: Ticket = Ticket::new_draft(String::from("u1"), create_test_time());
    let edit: TicketEdit = create_complete_edit(status);
    ticket.ticket_id = Some(42);
    ticket.title = edit.title;
    ticket.description = edit.description;
    ticket.priority = edit.priority;
    ticket.category_id = edit.category_id;
    ticket.service_id = edit.service_id;
    ticket.contact = edit.contact;
    ticket.status = status;
    ticket.assignee_id = assignee_id.map(String::from);
    ticket.assigned_at = assignee_id.map(|_| create_test_time());
    ticket.version = 3;
    ticket
}
