// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{AssigneeChoice, Command, TicketEdit};
use crate::error::CoreError;
use crate::state::TransitionResult;
use helpdesk_audit::{Actor, HistoryEntry};
use helpdesk_domain::{
    ContactInfo, DomainError, Principal, Role, Ticket, TicketStatus, Trigger, validate_email,
    validate_mandatory_fields, validate_transition,
};
use time::OffsetDateTime;

/// Applies a submission that creates a new ticket.
///
/// The ticket starts as an unsaved draft owned by `owner` and the
/// submission is then applied to it exactly like an edit.
///
/// # Arguments
///
/// * `owner` - The principal who will own the ticket
/// * `edit` - The resolved submission
/// * `actor` - The principal performing the submission
/// * `now` - The transition timestamp
///
/// # Errors
///
/// Returns an error if:
/// - The owner is not a `USER`
/// - The submission violates a domain rule (see [`apply`])
pub fn apply_create(
    owner: &Principal,
    edit: TicketEdit,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    if owner.role != Role::User {
        return Err(CoreError::DomainViolation(DomainError::InvalidOwner {
            principal_id: owner.principal_id.clone(),
            role: owner.role,
        }));
    }

    let draft: Ticket = Ticket::new_draft(owner.principal_id.clone(), now);
    apply_edit(&draft, edit, actor, now)
}

/// Applies a command to a ticket, producing the next ticket and its history entry.
///
/// This function is pure: it performs no I/O and does not check whether
/// `actor` is allowed to issue the command. Authorization happens before
/// this is called.
///
/// # Arguments
///
/// * `ticket` - The current ticket (immutable)
/// * `command` - The command to apply
/// * `actor` - The principal performing the command
/// * `now` - The transition timestamp
///
/// # Returns
///
/// * `Ok(TransitionResult)` with the new ticket and optional history entry
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The requested status change is not in the lifecycle table
/// - A named assignee holds the `USER` role
/// - A non-draft ticket is missing a mandatory field
/// - A reassignment names the acting principal
/// - An assignment names the current assignee
pub fn apply(
    ticket: &Ticket,
    command: Command,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Edit { edit } => apply_edit(ticket, edit, actor, now),
        Command::Accept => apply_accept(ticket, actor, now),
        Command::Reject { new_assignee } => {
            apply_reassign(ticket, &new_assignee, Trigger::Reject, actor, now)
        }
        Command::Escalate { new_assignee } => {
            apply_reassign(ticket, &new_assignee, Trigger::Escalate, actor, now)
        }
        Command::ChangeStatus { target } => apply_change_status(ticket, target, actor, now),
        Command::Assign { assignee } => apply_assign(ticket, &assignee, actor, now),
    }
}

fn apply_edit(
    ticket: &Ticket,
    edit: TicketEdit,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let TicketEdit {
        title,
        description,
        priority,
        category_id,
        service_id,
        contact,
        target_status,
        assignee,
    } = edit;

    let mut contact: ContactInfo = ContactInfo {
        email: non_blank(contact.email),
        phone: non_blank(contact.phone),
        fiscal_code: non_blank(contact.fiscal_code),
    };
    // A USER always reports under their own address.
    if actor.role == Role::User {
        contact.email = non_blank(actor.email.clone());
    }
    if let Some(email) = contact.email.as_deref() {
        validate_email(email)?;
    }

    let mut new_ticket: Ticket = ticket.clone();
    new_ticket.title = non_blank(title);
    new_ticket.description = non_blank(description);
    new_ticket.priority = priority;
    new_ticket.category_id = category_id;
    new_ticket.service_id = service_id;
    new_ticket.contact = contact;

    let mut target: TicketStatus = target_status;
    let mut self_assigned: bool = false;

    match assignee {
        Some(choice) => {
            let principal: &Principal = choice.principal();
            ensure_eligible(principal)?;
            if target == TicketStatus::Draft {
                return Err(CoreError::DomainViolation(DomainError::DraftAssignment));
            }
            if is_self_assignment(&choice, actor) {
                self_assigned = true;
                if target == TicketStatus::Open {
                    target = TicketStatus::Answered;
                }
            }
            new_ticket.assignee_id = Some(principal.principal_id.clone());
        }
        None => {
            if target == TicketStatus::Draft {
                new_ticket.assignee_id = None;
            }
        }
    }

    let trigger: Option<Trigger> = if target == ticket.status {
        None
    } else {
        Some(resolve_edit_trigger(
            ticket.status,
            target,
            actor,
            self_assigned,
        )?)
    };

    new_ticket.status = target;
    if target != TicketStatus::Draft {
        validate_mandatory_fields(&new_ticket)?;
    }

    stamp(ticket, &mut new_ticket, now);

    let history_entry: Option<HistoryEntry> = match trigger {
        Some(trigger) => Some(history(ticket, &new_ticket, trigger, actor, None, now)),
        None if new_ticket.assignee_id != ticket.assignee_id => {
            new_ticket.assignee_id.as_deref().map(|assignee_id| {
                history(
                    ticket,
                    &new_ticket,
                    Trigger::Assign,
                    actor,
                    Some(format!("Ticket assigned to {assignee_id}")),
                    now,
                )
            })
        }
        None => None,
    };

    Ok(TransitionResult {
        new_ticket,
        history_entry,
    })
}

fn apply_accept(
    ticket: &Ticket,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    validate_transition(ticket.status, TicketStatus::Answered, Trigger::Accept)?;

    let mut new_ticket: Ticket = ticket.clone();
    if new_ticket.assignee_id.is_none() {
        ensure_eligible(actor)?;
        new_ticket.assignee_id = Some(actor.principal_id.clone());
    }
    new_ticket.status = TicketStatus::Answered;
    stamp(ticket, &mut new_ticket, now);

    let entry: HistoryEntry = history(ticket, &new_ticket, Trigger::Accept, actor, None, now);

    Ok(TransitionResult {
        new_ticket,
        history_entry: Some(entry),
    })
}

fn apply_reassign(
    ticket: &Ticket,
    new_assignee: &Principal,
    trigger: Trigger,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    validate_transition(ticket.status, TicketStatus::Open, trigger)?;
    ensure_eligible(new_assignee)?;
    if new_assignee.principal_id == actor.principal_id {
        return Err(CoreError::DomainViolation(DomainError::SelfReassignment {
            principal_id: actor.principal_id.clone(),
        }));
    }

    let previous: &str = ticket.assignee_id.as_deref().unwrap_or("nobody");
    let verb: &str = if trigger == Trigger::Escalate {
        "escalated"
    } else {
        "rejected"
    };
    let note: String = format!(
        "Ticket {verb} and reassigned from {previous} to {}",
        new_assignee.principal_id
    );

    let mut new_ticket: Ticket = ticket.clone();
    new_ticket.assignee_id = Some(new_assignee.principal_id.clone());
    new_ticket.status = TicketStatus::Open;
    stamp(ticket, &mut new_ticket, now);

    let entry: HistoryEntry = history(ticket, &new_ticket, trigger, actor, Some(note), now);

    Ok(TransitionResult {
        new_ticket,
        history_entry: Some(entry),
    })
}

fn apply_change_status(
    ticket: &Ticket,
    target: TicketStatus,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let Some(trigger) = Trigger::for_status_change(target) else {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: ticket.status,
                to: target,
                reason: format!("{target} can only be reached through its dedicated operation"),
            },
        ));
    };

    if trigger == Trigger::Accept {
        return apply_accept(ticket, actor, now);
    }

    validate_transition(ticket.status, target, trigger)?;

    let mut new_ticket: Ticket = ticket.clone();
    new_ticket.status = target;
    stamp(ticket, &mut new_ticket, now);

    let entry: HistoryEntry = history(ticket, &new_ticket, trigger, actor, None, now);

    Ok(TransitionResult {
        new_ticket,
        history_entry: Some(entry),
    })
}

fn apply_assign(
    ticket: &Ticket,
    assignee: &Principal,
    actor: &Principal,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    validate_transition(ticket.status, ticket.status, Trigger::Assign)?;
    ensure_eligible(assignee)?;
    if ticket.is_assigned_to(&assignee.principal_id) {
        return Err(CoreError::DomainViolation(DomainError::AssigneeUnchanged {
            principal_id: assignee.principal_id.clone(),
        }));
    }

    let mut new_ticket: Ticket = ticket.clone();
    new_ticket.assignee_id = Some(assignee.principal_id.clone());

    // Assigning an open ticket to oneself takes it in charge.
    let trigger: Trigger =
        if assignee.principal_id == actor.principal_id && ticket.status == TicketStatus::Open {
            new_ticket.status = TicketStatus::Answered;
            Trigger::Accept
        } else {
            Trigger::Assign
        };
    stamp(ticket, &mut new_ticket, now);

    let note: String = format!("Ticket assigned to {}", assignee.principal_id);
    let entry: HistoryEntry = history(ticket, &new_ticket, trigger, actor, Some(note), now);

    Ok(TransitionResult {
        new_ticket,
        history_entry: Some(entry),
    })
}

/// Picks the trigger for a status change requested through a submission.
fn resolve_edit_trigger(
    from: TicketStatus,
    to: TicketStatus,
    actor: &Principal,
    self_assigned: bool,
) -> Result<Trigger, CoreError> {
    if from == TicketStatus::Draft
        && (to == TicketStatus::Open || (to == TicketStatus::Answered && self_assigned))
    {
        return Ok(Trigger::Finalize);
    }

    if let Some(trigger) = Trigger::for_status_change(to)
        && validate_transition(from, to, trigger).is_ok()
    {
        return Ok(trigger);
    }

    if actor.role.is_manager() {
        return Ok(Trigger::Override);
    }

    Err(CoreError::DomainViolation(
        DomainError::InvalidStatusTransition {
            from,
            to,
            reason: format!("only an ADMIN or PM may move a ticket from {from} to {to} directly"),
        },
    ))
}

fn is_self_assignment(choice: &AssigneeChoice, actor: &Principal) -> bool {
    choice.is_explicit()
        && actor.role != Role::User
        && choice.principal().principal_id == actor.principal_id
}

fn ensure_eligible(principal: &Principal) -> Result<(), CoreError> {
    if principal.role.is_eligible_assignee() {
        Ok(())
    } else {
        Err(CoreError::DomainViolation(DomainError::IneligibleAssignee {
            principal_id: principal.principal_id.clone(),
            role: principal.role,
        }))
    }
}

/// Updates timestamps and the version after a transition.
fn stamp(previous: &Ticket, next: &mut Ticket, now: OffsetDateTime) {
    next.updated_at = now;

    if next.status == TicketStatus::Solved {
        if previous.status != TicketStatus::Solved || next.solved_at.is_none() {
            next.solved_at = Some(now);
        }
    } else {
        next.solved_at = None;
    }

    if next.assignee_id != previous.assignee_id {
        next.assigned_at = next.assignee_id.as_ref().map(|_| now);
    }

    next.version = previous.version + 1;
}

fn history(
    previous: &Ticket,
    next: &Ticket,
    trigger: Trigger,
    actor: &Principal,
    note: Option<String>,
    now: OffsetDateTime,
) -> HistoryEntry {
    HistoryEntry::new(
        previous.ticket_id,
        previous.status,
        next.status,
        trigger,
        Actor::from(actor),
        note,
        now,
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
