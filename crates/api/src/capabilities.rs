// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what a principal may do with a ticket right now.
//! They are advisory only and do not replace the checks each operation
//! performs.

use helpdesk_domain::{Principal, Ticket, TicketStatus, Trigger, validate_transition};

use crate::auth::{AuthorizationPolicy, Operation};
use crate::request_response::{Capability, TicketCapabilities};

/// Computes what `principal` may currently do with `ticket`.
///
/// A flag is allowed only when the policy permits the operation and the
/// ticket's status admits the matching lifecycle edge.
///
/// # Arguments
///
/// * `principal` - The acting principal
/// * `ticket` - The ticket as currently stored
#[must_use]
pub fn compute_ticket_capabilities(principal: &Principal, ticket: &Ticket) -> TicketCapabilities {
    let allowed = |operation: Operation| {
        AuthorizationPolicy::authorize(principal, ticket, operation).is_ok()
    };
    let edge = |to: TicketStatus, trigger: Trigger| {
        validate_transition(ticket.status, to, trigger).is_ok()
    };

    TicketCapabilities {
        can_modify: Capability::from_bool(allowed(Operation::Modify)),
        can_accept: Capability::from_bool(
            allowed(Operation::Accept) && edge(TicketStatus::Answered, Trigger::Accept),
        ),
        can_reject: Capability::from_bool(
            allowed(Operation::Reject) && edge(TicketStatus::Open, Trigger::Reject),
        ),
        can_escalate: Capability::from_bool(
            allowed(Operation::Escalate) && edge(TicketStatus::Open, Trigger::Escalate),
        ),
        can_change_status: Capability::from_bool(
            allowed(Operation::ChangeStatus) && edge(TicketStatus::Solved, Trigger::Resolve),
        ),
        can_assign: Capability::from_bool(
            allowed(Operation::Assign) && edge(ticket.status, Trigger::Assign),
        ),
        can_delete: Capability::from_bool(allowed(Operation::Delete)),
    }
}
