// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_complete_edit, create_later_time, create_saved_ticket, create_test_admin,
    create_test_junior, create_test_pm, create_test_senior, create_test_user, with_assignee,
};
use crate::{AssigneeChoice, Command, CoreError, TicketEdit, TransitionResult, apply};
use helpdesk_domain::{DomainError, Principal, Ticket, TicketStatus, Trigger};

fn edit(ticket: &Ticket, edit: TicketEdit, actor: &Principal) -> Result<TransitionResult, CoreError> {
    apply(ticket, Command::Edit { edit }, actor, create_later_time())
}

#[test]
fn test_field_only_edit_records_no_history() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Open, Some("h1"));
    let helper: Principal = create_test_junior();
    let mut submission: TicketEdit = create_complete_edit(TicketStatus::Open);
    submission.title = Some(String::from("Printer still offline"));

    let transition: TransitionResult = edit(&ticket, submission, &helper).unwrap();

    assert_eq!(
        transition.new_ticket.title.as_deref(),
        Some("Printer still offline")
    );
    assert_eq!(transition.new_ticket.version, ticket.version + 1);
    assert_eq!(transition.new_ticket.updated_at, create_later_time());
    assert!(transition.history_entry.is_none());
}

#[test]
fn test_edit_without_assignee_keeps_current_assignee() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Answered, Some("h1"));
    let helper: Principal = create_test_junior();

    let transition: TransitionResult = edit(
        &ticket,
        create_complete_edit(TicketStatus::Answered),
        &helper,
    )
    .unwrap();

    assert_eq!(transition.new_ticket.assignee_id.as_deref(), Some("h1"));
    assert_eq!(transition.new_ticket.assigned_at, ticket.assigned_at);
}

#[test]
fn test_finalizing_a_draft() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Draft, None);
    let owner: Principal = create_test_user();

    let transition: TransitionResult =
        edit(&ticket, create_complete_edit(TicketStatus::Open), &owner).unwrap();

    assert_eq!(transition.new_ticket.status, TicketStatus::Open);
    let entry = transition.history_entry.unwrap();
    assert_eq!(entry.ticket_id, Some(42));
    assert_eq!(entry.trigger, Trigger::Finalize);
}

#[test]
fn test_resolving_through_edit_uses_resolve() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Answered, Some("h1"));
    let helper: Principal = create_test_junior();

    let transition: TransitionResult =
        edit(&ticket, create_complete_edit(TicketStatus::Solved), &helper).unwrap();

    assert_eq!(transition.new_ticket.status, TicketStatus::Solved);
    assert_eq!(transition.new_ticket.solved_at, Some(create_later_time()));
    assert_eq!(transition.history_entry.unwrap().trigger, Trigger::Resolve);
}

#[test]
fn test_helper_cannot_reopen_solved_ticket() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Solved, Some("h1"));
    let helper: Principal = create_test_junior();

    let result: Result<TransitionResult, CoreError> =
        edit(&ticket, create_complete_edit(TicketStatus::Open), &helper);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: TicketStatus::Solved,
                to: TicketStatus::Open,
                ..
            }
        ))
    ));
}

#[test]
fn test_pm_reopens_solved_ticket_by_override() {
    let mut ticket: Ticket = create_saved_ticket(TicketStatus::Solved, Some("h1"));
    ticket.solved_at = Some(ticket.updated_at);
    let pm: Principal = create_test_pm();

    let transition: TransitionResult =
        edit(&ticket, create_complete_edit(TicketStatus::Open), &pm).unwrap();

    assert_eq!(transition.new_ticket.status, TicketStatus::Open);
    assert_eq!(transition.new_ticket.solved_at, None);
    assert_eq!(transition.history_entry.unwrap().trigger, Trigger::Override);
}

#[test]
fn test_admin_moves_ticket_back_to_draft_clearing_assignee() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Open, Some("h1"));
    let admin: Principal = create_test_admin();

    let transition: TransitionResult =
        edit(&ticket, create_complete_edit(TicketStatus::Draft), &admin).unwrap();

    assert_eq!(transition.new_ticket.status, TicketStatus::Draft);
    assert_eq!(transition.new_ticket.assignee_id, None);
    assert_eq!(transition.new_ticket.assigned_at, None);
    assert_eq!(transition.history_entry.unwrap().trigger, Trigger::Override);
}

#[test]
fn test_explicit_assignee_change_records_assign() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Answered, Some("h1"));
    let pm: Principal = create_test_pm();
    let submission: TicketEdit = with_assignee(
        create_complete_edit(TicketStatus::Answered),
        AssigneeChoice::Explicit(create_test_senior()),
    );

    let transition: TransitionResult = edit(&ticket, submission, &pm).unwrap();

    assert_eq!(transition.new_ticket.assignee_id.as_deref(), Some("h2"));
    assert_eq!(transition.new_ticket.assigned_at, Some(create_later_time()));
    let entry = transition.history_entry.unwrap();
    assert_eq!(entry.trigger, Trigger::Assign);
    assert!(!entry.changes_status());
    assert_eq!(entry.note.as_deref(), Some("Ticket assigned to h2"));
}

#[test]
fn test_self_assignment_on_open_ticket_takes_it_in_charge() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Open, None);
    let helper: Principal = create_test_senior();
    let submission: TicketEdit = with_assignee(
        create_complete_edit(TicketStatus::Open),
        AssigneeChoice::Explicit(helper.clone()),
    );

    let transition: TransitionResult = edit(&ticket, submission, &helper).unwrap();

    assert_eq!(transition.new_ticket.status, TicketStatus::Answered);
    assert_eq!(transition.history_entry.unwrap().trigger, Trigger::Accept);
}

#[test]
fn test_missing_field_blocks_non_draft_edit() {
    let ticket: Ticket = create_saved_ticket(TicketStatus::Open, Some("h1"));
    let helper: Principal = create_test_junior();
    let mut submission: TicketEdit = create_complete_edit(TicketStatus::Open);
    submission.contact.fiscal_code = None;

    let result: Result<TransitionResult, CoreError> = edit(&ticket, submission, &helper);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::MissingField {
            field: "fiscal_code"
        }))
    );
}
