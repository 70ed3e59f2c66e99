// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Accept, reject, escalate, change-status, assign, delete and get.

use helpdesk_domain::{TicketStatus, Trigger};

use crate::{ErrorKind, LifecycleError, NotificationKind, TicketSubmission};

use super::helpers::{create_assigned_ticket, create_test_service, principal};

#[test]
fn test_accept_moves_open_ticket_to_answered() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();

    let result = service.accept(&principal("h1"), ticket_id);

    assert!(result.is_ok());
    let accepted = result.unwrap();
    assert_eq!(accepted.status, TicketStatus::Answered);
    assert_eq!(accepted.assignee_id.as_deref(), Some("h1"));

    let history = service.history(&principal("h1"), ticket_id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].previous_status, TicketStatus::Open);
    assert_eq!(history[1].new_status, TicketStatus::Answered);
    assert_eq!(history[1].trigger, Trigger::Accept);

    let sent = service.notifier().sent();
    let last = sent.last().unwrap();
    assert_eq!(last.kind, NotificationKind::StatusUpdated);
    assert_eq!(last.recipient_id, "u1");
    assert_eq!(last.status, TicketStatus::Answered);
}

#[test]
fn test_accept_by_other_helper_is_unauthorized() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let result = service.accept(&principal("h2"), ticket.ticket_id.unwrap());

    assert!(matches!(
        result,
        Err(LifecycleError::Unauthorized {
            code: "not_assignee",
            ..
        })
    ));
}

#[test]
fn test_reject_keeps_ticket_open_with_new_assignee() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();

    let rejected = service.reject(&principal("h1"), ticket_id, "h2").unwrap();

    assert_eq!(rejected.status, TicketStatus::Open);
    assert_eq!(rejected.assignee_id.as_deref(), Some("h2"));
    let history = service.history(&principal("pm1"), ticket_id).unwrap();
    assert_eq!(history[1].trigger, Trigger::Reject);
    assert_eq!(
        history[1].note.as_deref(),
        Some("Ticket rejected and reassigned from h1 to h2")
    );
}

#[test]
fn test_reject_while_answered_is_invalid_transition() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();
    service.accept(&principal("h1"), ticket_id).unwrap();

    let result = service.reject(&principal("h1"), ticket_id, "h2");

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTransition);
    assert_eq!(service.history(&principal("h1"), ticket_id).unwrap().len(), 2);
}

#[test]
fn test_reject_to_self_is_invalid_transition() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let result = service.reject(&principal("h1"), ticket.ticket_id.unwrap(), "h1");

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTransition);
}

#[test]
fn test_reject_to_unknown_principal_is_not_found() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let result = service.reject(&principal("h1"), ticket.ticket_id.unwrap(), "ghost");

    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_escalate_reopens_answered_ticket() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();
    service.accept(&principal("h1"), ticket_id).unwrap();

    let escalated = service.escalate(&principal("h1"), ticket_id, "h3").unwrap();

    assert_eq!(escalated.status, TicketStatus::Open);
    assert_eq!(escalated.assignee_id.as_deref(), Some("h3"));
    let history = service.history(&principal("h3"), ticket_id).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].trigger, Trigger::Escalate);
}

#[test]
fn test_escalate_while_open_is_invalid_transition() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let result = service.escalate(&principal("h1"), ticket.ticket_id.unwrap(), "h2");

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTransition);
}

#[test]
fn test_change_status_resolves_and_stamps_solved_at() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let solved = service
        .change_status(&principal("h1"), ticket.ticket_id.unwrap(), TicketStatus::Solved)
        .unwrap();

    assert_eq!(solved.status, TicketStatus::Solved);
    assert!(solved.solved_at.is_some());
}

#[test]
fn test_change_status_to_answered_accepts() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();

    let answered = service
        .change_status(&principal("pm1"), ticket_id, TicketStatus::Answered)
        .unwrap();

    assert_eq!(answered.status, TicketStatus::Answered);
    let history = service.history(&principal("pm1"), ticket_id).unwrap();
    assert_eq!(history[1].trigger, Trigger::Accept);
    assert_eq!(history[1].actor.principal_id, "pm1");
}

#[test]
fn test_change_status_out_of_solved_is_invalid_transition() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();
    service
        .change_status(&principal("h1"), ticket_id, TicketStatus::Solved)
        .unwrap();

    for target in TicketStatus::ALL {
        let result = service.change_status(&principal("h1"), ticket_id, target);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTransition);
    }
}

#[test]
fn test_change_status_to_open_or_draft_is_invalid_transition() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();

    for target in [TicketStatus::Draft, TicketStatus::Open] {
        let result = service.change_status(&principal("root"), ticket_id, target);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTransition);
    }
}

#[test]
fn test_assign_hands_ticket_to_named_helper() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();

    let assigned = service.assign(&principal("pm1"), ticket_id, "h3").unwrap();

    assert_eq!(assigned.status, TicketStatus::Open);
    assert_eq!(assigned.assignee_id.as_deref(), Some("h3"));
    assert!(assigned.assigned_at.is_some());
    let history = service.history(&principal("pm1"), ticket_id).unwrap();
    assert_eq!(history[1].trigger, Trigger::Assign);
    assert_eq!(history[1].note.as_deref(), Some("Ticket assigned to h3"));
}

#[test]
fn test_assign_on_draft_is_invalid_transition() {
    let service = create_test_service();
    let draft = service
        .create_or_update(
            &principal("u1"),
            &TicketSubmission::new(TicketStatus::Draft),
            None,
        )
        .unwrap();

    let result = service.assign(&principal("root"), draft.ticket_id.unwrap(), "h3");

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidTransition);
}

#[test]
fn test_assign_to_user_is_rejected() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let result = service.assign(&principal("pm1"), ticket.ticket_id.unwrap(), "u2");

    assert_eq!(result.unwrap_err().kind(), ErrorKind::ValidationFailed);
}

#[test]
fn test_assign_by_helper_is_unauthorized() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");

    let result = service.assign(&principal("h1"), ticket.ticket_id.unwrap(), "h2");

    assert!(matches!(
        result,
        Err(LifecycleError::Unauthorized {
            code: "manager_required",
            ..
        })
    ));
}

#[test]
fn test_delete_removes_ticket_and_history() {
    let service = create_test_service();
    let ticket = create_assigned_ticket(&service, "u1", "h1");
    let ticket_id: i64 = ticket.ticket_id.unwrap();
    service.accept(&principal("h1"), ticket_id).unwrap();

    let result = service.delete(&principal("root"), ticket_id);

    assert!(result.is_ok());
    assert_eq!(
        service.get(&principal("root"), ticket_id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service.history(&principal("root"), ticket_id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_owner_deletes_draft_but_not_submitted_ticket() {
    let service = create_test_service();
    let draft = service
        .create_or_update(
            &principal("u1"),
            &TicketSubmission::new(TicketStatus::Draft),
            None,
        )
        .unwrap();
    let submitted = create_assigned_ticket(&service, "u1", "h1");

    assert!(service.delete(&principal("u1"), draft.ticket_id.unwrap()).is_ok());
    assert_eq!(
        service
            .delete(&principal("u1"), submitted.ticket_id.unwrap())
            .unwrap_err()
            .kind(),
        ErrorKind::Unauthorized
    );
}

#[test]
fn test_get_draft_by_manager_is_unauthorized() {
    let service = create_test_service();
    let draft = service
        .create_or_update(
            &principal("u1"),
            &TicketSubmission::new(TicketStatus::Draft),
            None,
        )
        .unwrap();

    let result = service.get(&principal("pm1"), draft.ticket_id.unwrap());

    assert!(matches!(
        result,
        Err(LifecycleError::Unauthorized {
            code: "draft_not_owned",
            ..
        })
    ));
    assert!(service.get(&principal("root"), draft.ticket_id.unwrap()).is_ok());
}

#[test]
fn test_missing_ticket_is_not_found() {
    let service = create_test_service();

    let result = service.accept(&principal("h1"), 404);

    assert!(matches!(
        result,
        Err(LifecycleError::NotFound {
            resource: "Ticket",
            ..
        })
    ));
}
