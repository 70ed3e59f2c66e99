// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DomainError;
use crate::types::Ticket;

/// Accepted email shape.
#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("email regex is valid")
});

/// Validates the shape of an email address.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address does not match.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail(email.to_string()))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Validates that a ticket carries every field required outside `DRAFT`.
///
/// Required: title, description, priority, category, support service,
/// contact email, phone and fiscal code. Fields are checked in that order
/// and the first missing one is reported.
///
/// # Errors
///
/// Returns `DomainError::MissingField` naming the first missing field, or
/// `DomainError::InvalidEmail` if the contact email is malformed.
pub fn validate_mandatory_fields(ticket: &Ticket) -> Result<(), DomainError> {
    if is_blank(ticket.title.as_deref()) {
        return Err(DomainError::MissingField { field: "title" });
    }
    if is_blank(ticket.description.as_deref()) {
        return Err(DomainError::MissingField {
            field: "description",
        });
    }
    if ticket.priority.is_none() {
        return Err(DomainError::MissingField { field: "priority" });
    }
    if ticket.category_id.is_none() {
        return Err(DomainError::MissingField {
            field: "category",
        });
    }
    if ticket.service_id.is_none() {
        return Err(DomainError::MissingField {
            field: "support_service",
        });
    }
    match ticket.contact.email.as_deref() {
        Some(email) if !email.trim().is_empty() => validate_email(email)?,
        _ => return Err(DomainError::MissingField { field: "email" }),
    }
    if is_blank(ticket.contact.phone.as_deref()) {
        return Err(DomainError::MissingField { field: "phone" });
    }
    if is_blank(ticket.contact.fiscal_code.as_deref()) {
        return Err(DomainError::MissingField {
            field: "fiscal_code",
        });
    }
    Ok(())
}
