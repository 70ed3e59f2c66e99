// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod balancer;
mod error;
mod role;
mod ticket_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use balancer::{AssigneeLoad, select_assignee};
pub use error::DomainError;
pub use role::{
    ELIGIBLE_ASSIGNEE_ROLES, Role, RoleClaim, RoleSet, TokenClaims, principal_from_claims,
    resolve_roles,
};
pub use ticket_status::{TicketStatus, Trigger, validate_transition};
pub use types::{Category, ContactInfo, Principal, SupportService, Ticket, TicketPriority};
pub use validation::{validate_email, validate_mandatory_fields};
