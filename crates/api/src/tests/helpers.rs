// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use helpdesk::UserDirectory;
use helpdesk_domain::{ContactInfo, Principal, Role, Ticket, TicketPriority, TicketStatus};
use helpdesk_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    LifecycleService, Notification, NotificationDispatcher, NotificationError, TicketSubmission,
};

pub type TestService = LifecycleService<Persistence, RecordingNotifier>;

/// Every principal the seeded store knows about.
///
/// The ADMIN id sorts after the helpers so that ties in the balancer go
/// to a helper.
pub const SEEDED_PRINCIPALS: [(&str, Role); 7] = [
    ("u1", Role::User),
    ("u2", Role::User),
    ("h1", Role::HelperJunior),
    ("h2", Role::HelperSenior),
    ("h3", Role::HelperJunior),
    ("pm1", Role::Pm),
    ("root", Role::Admin),
];

/// Notifier that keeps every notification it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationDispatcher for RecordingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// Notifier whose delivery always fails.
pub struct FailingNotifier;

impl NotificationDispatcher for FailingNotifier {
    fn notify(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::DeliveryFailed(String::from(
            "mail relay unreachable",
        )))
    }
}

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

/// Returns the seeded principal with `id`.
pub fn principal(id: &str) -> Principal {
    let (_, role) = SEEDED_PRINCIPALS
        .iter()
        .find(|(seeded, _)| *seeded == id)
        .expect("principal is not seeded");
    create_test_principal(id, *role)
}

/// A store seeded with [`SEEDED_PRINCIPALS`], category 1 and service 1.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    for (id, role) in SEEDED_PRINCIPALS {
        persistence
            .save_principal(&create_test_principal(id, role))
            .unwrap();
    }
    persistence.create_category("Hardware", None).unwrap();
    persistence
        .create_support_service("Workstations", Some("Desktop and laptop support"))
        .unwrap();
    persistence
}

pub fn create_test_service() -> TestService {
    LifecycleService::new(create_seeded_persistence(), RecordingNotifier::default())
}

/// A submission with every mandatory field filled in.
pub fn create_complete_submission(status: TicketStatus) -> TicketSubmission {
    let mut submission: TicketSubmission = TicketSubmission::new(status);
    submission.title = Some(String::from("VPN drops every hour"));
    submission.description = Some(String::from(
        "The VPN client disconnects roughly every sixty minutes",
    ));
    submission.priority = Some(TicketPriority::Medium);
    submission.category_id = Some(1);
    submission.service_id = Some(1);
    submission.contact_email = Some(String::from("someone@example.com"));
    submission.contact_phone = Some(String::from("+39 055 654321"));
    submission.contact_fiscal_code = Some(String::from("VRDLGU75B02F205X"));
    submission
}

/// Has `owner` submit a complete OPEN ticket and returns it.
pub fn create_open_ticket(service: &TestService, owner: &str) -> Ticket {
    service
        .create_or_update(
            &principal(owner),
            &create_complete_submission(TicketStatus::Open),
            None,
        )
        .unwrap()
}

/// Has a PM file an OPEN ticket for `owner`, assigned to `assignee`.
pub fn create_assigned_ticket(service: &TestService, owner: &str, assignee: &str) -> Ticket {
    let mut submission: TicketSubmission = create_complete_submission(TicketStatus::Open);
    submission.owner_id = Some(String::from(owner));
    submission.assignee_id = Some(String::from(assignee));
    service
        .create_or_update(&principal("pm1"), &submission, None)
        .unwrap()
}

/// A ticket value for policy tests; never stored.
pub fn create_policy_ticket(
    owner_id: &str,
    status: TicketStatus,
    assignee_id: Option<&str>,
) -> Ticket {
    let mut ticket: Ticket = Ticket::new_draft(String::from(owner_id), create_test_time());
    ticket.ticket_id = Some(1);
    ticket.status = status;
    ticket.assignee_id = assignee_id.map(String::from);
    ticket.contact = ContactInfo {
        email: Some(String::from("shared@example.com")),
        phone: None,
        fiscal_code: None,
    };
    ticket
}
