// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error translation tests.

use helpdesk::{CoreError, StoreError};
use helpdesk_domain::{DomainError, Role, TicketStatus};

use crate::{
    AuthError, DenyReason, ErrorKind, LifecycleError, translate_core_error,
    translate_domain_error,
};

fn validated_field(err: LifecycleError) -> String {
    match err {
        LifecycleError::ValidationFailed { field, .. } => field,
        other => panic!("Expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn test_missing_field_names_the_field() {
    let err = translate_domain_error(DomainError::MissingField { field: "priority" });
    assert_eq!(validated_field(err), "priority");
}

#[test]
fn test_assignment_errors_point_at_assignee() {
    let errors: Vec<DomainError> = vec![
        DomainError::IneligibleAssignee {
            principal_id: String::from("u1"),
            role: Role::User,
        },
        DomainError::AssigneeUnchanged {
            principal_id: String::from("h1"),
        },
        DomainError::DraftAssignment,
    ];

    for err in errors {
        assert_eq!(validated_field(translate_domain_error(err)), "assignee_id");
    }
}

#[test]
fn test_owner_and_email_errors_point_at_their_fields() {
    let owner = translate_domain_error(DomainError::InvalidOwner {
        principal_id: String::from("h1"),
        role: Role::HelperJunior,
    });
    assert_eq!(validated_field(owner), "owner_id");

    let email = translate_domain_error(DomainError::InvalidEmail(String::from("nope")));
    assert_eq!(validated_field(email), "contact_email");
}

#[test]
fn test_lifecycle_violations_are_invalid_transitions() {
    let illegal = translate_domain_error(DomainError::InvalidStatusTransition {
        from: TicketStatus::Solved,
        to: TicketStatus::Open,
        reason: String::from("solved tickets are final"),
    });
    assert_eq!(illegal.kind(), ErrorKind::InvalidTransition);

    let self_handoff = translate_domain_error(DomainError::SelfReassignment {
        principal_id: String::from("h1"),
    });
    assert_eq!(self_handoff.kind(), ErrorKind::InvalidTransition);
}

#[test]
fn test_not_found_names_the_resource() {
    let err = translate_domain_error(DomainError::SupportServiceNotFound(9));
    match err {
        LifecycleError::NotFound { resource, .. } => assert_eq!(resource, "Support service"),
        other => panic!("Expected NotFound, got {other:?}"),
    }

    assert_eq!(
        translate_domain_error(DomainError::PrincipalNotFound(String::from("x"))).kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_no_eligible_assignee_keeps_its_kind() {
    let err = translate_domain_error(DomainError::NoEligibleAssignee);
    assert_eq!(err.kind(), ErrorKind::NoEligibleAssignee);
    assert_eq!(err.kind().as_str(), "NO_ELIGIBLE_ASSIGNEE");
}

#[test]
fn test_core_errors_unwrap_domain_violations() {
    let violation = translate_core_error(CoreError::DomainViolation(DomainError::DraftAssignment));
    assert_eq!(violation.kind(), ErrorKind::ValidationFailed);

    let internal = translate_core_error(CoreError::Internal(String::from("boom")));
    assert_eq!(internal.kind(), ErrorKind::Internal);
}

#[test]
fn test_store_conflict_becomes_conflicting_assignment() {
    let err: LifecycleError = StoreError::Conflict {
        ticket_id: 4,
        expected_version: 2,
    }
    .into();
    assert_eq!(err.kind(), ErrorKind::ConflictingAssignment);

    let backend: LifecycleError = StoreError::Backend(String::from("disk full")).into();
    assert_eq!(backend.kind(), ErrorKind::Internal);
}

#[test]
fn test_auth_errors_carry_reason_codes() {
    let denied: LifecycleError =
        AuthError::unauthorized("assign", DenyReason::ManagerRequired).into();
    match denied {
        LifecycleError::Unauthorized { code, message } => {
            assert_eq!(code, "manager_required");
            assert!(message.contains("assign"));
        }
        other => panic!("Expected Unauthorized, got {other:?}"),
    }

    let failed: LifecycleError = AuthError::AuthenticationFailed {
        reason: String::from("expired"),
    }
    .into();
    match failed {
        LifecycleError::Unauthorized { code, .. } => assert_eq!(code, "authentication_failed"),
        other => panic!("Expected Unauthorized, got {other:?}"),
    }
}

#[test]
fn test_error_kind_strings_are_stable() {
    assert_eq!(ErrorKind::ValidationFailed.to_string(), "VALIDATION_FAILED");
    assert_eq!(ErrorKind::Unauthorized.as_str(), "UNAUTHORIZED");
    assert_eq!(
        ErrorKind::ConflictingAssignment.as_str(),
        "CONFLICTING_ASSIGNMENT"
    );
}
