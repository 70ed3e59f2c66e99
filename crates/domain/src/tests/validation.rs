// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::datetime;

use crate::{
    ContactInfo, DomainError, Ticket, TicketPriority, validate_email, validate_mandatory_fields,
};

fn create_complete_ticket() -> Ticket {
    let mut ticket: Ticket =
        Ticket::new_draft(String::from("u1"), datetime!(2026-03-01 09:00 UTC));
    ticket.title = Some(String::from("Printer offline"));
    ticket.description = Some(String::from("The third floor printer is unreachable"));
    ticket.priority = Some(TicketPriority::High);
    ticket.category_id = Some(1);
    ticket.service_id = Some(2);
    ticket.contact = ContactInfo {
        email: Some(String::from("mario.rossi@example.com")),
        phone: Some(String::from("+39 055 123456")),
        fiscal_code: Some(String::from("RSSMRA80A01H501U")),
    };
    ticket
}

#[test]
fn test_valid_emails() {
    assert!(validate_email("mario.rossi@example.com").is_ok());
    assert!(validate_email("a+b_c%d@sub.example.co").is_ok());
}

#[test]
fn test_invalid_emails() {
    assert!(validate_email("").is_err());
    assert!(validate_email("no-at-sign.example.com").is_err());
    assert!(validate_email("mario@example").is_err());
    assert!(validate_email("mario@example.toolongtld").is_err());
    assert!(validate_email("mario rossi@example.com").is_err());
}

#[test]
fn test_complete_ticket_passes() {
    assert!(validate_mandatory_fields(&create_complete_ticket()).is_ok());
}

#[test]
fn test_each_missing_field_is_reported() {
    let cases: Vec<(&'static str, fn(&mut Ticket))> = vec![
        ("title", |t: &mut Ticket| t.title = None),
        ("description", |t: &mut Ticket| t.description = Some(String::from("   "))),
        ("priority", |t: &mut Ticket| t.priority = None),
        ("category", |t: &mut Ticket| t.category_id = None),
        ("support_service", |t: &mut Ticket| t.service_id = None),
        ("email", |t: &mut Ticket| t.contact.email = None),
        ("phone", |t: &mut Ticket| t.contact.phone = Some(String::new())),
        ("fiscal_code", |t: &mut Ticket| t.contact.fiscal_code = None),
    ];

    for (field, clear) in cases {
        let mut ticket: Ticket = create_complete_ticket();
        clear(&mut ticket);
        assert_eq!(
            validate_mandatory_fields(&ticket),
            Err(DomainError::MissingField { field }),
            "expected '{field}' to be reported"
        );
    }
}

#[test]
fn test_malformed_contact_email_is_rejected() {
    let mut ticket: Ticket = create_complete_ticket();
    ticket.contact.email = Some(String::from("not-an-email"));
    assert_eq!(
        validate_mandatory_fields(&ticket),
        Err(DomainError::InvalidEmail(String::from("not-an-email")))
    );
}
