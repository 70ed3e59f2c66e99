// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The ticket lifecycle service.
//!
//! Every write operation runs as one unit inside a store transaction:
//! load, authorize, apply the lifecycle table, persist the ticket and
//! append the history entry. Notifications are requested only after the
//! unit has committed.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use helpdesk::{
    AssigneeChoice, Command, LifecycleStore, TicketEdit, TicketQuery, TicketSlice,
    TransitionResult, Visibility, apply, apply_create,
};
use helpdesk_audit::HistoryEntry;
use helpdesk_domain::{
    AssigneeLoad, Category, ContactInfo, DomainError, ELIGIBLE_ASSIGNEE_ROLES, Principal, Role,
    SupportService, Ticket, TicketStatus, TokenClaims, Trigger, principal_from_claims,
    resolve_roles, select_assignee, validate_email,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::{AuthorizationPolicy, Operation};
use crate::capabilities::compute_ticket_capabilities;
use crate::error::{AuthError, LifecycleError, translate_core_error, translate_domain_error};
use crate::notification::{Notification, NotificationDispatcher, NotificationKind};
use crate::request_response::{
    DashboardCounts, ListFilters, Page, PageRequest, TicketCapabilities, TicketSubmission,
};

/// Tunables for the lifecycle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Retry a unit once when it loses a concurrent update.
    pub retry_on_conflict: bool,
    /// Page size used when a listing does not ask for one.
    pub default_page_size: u64,
    /// Largest page size a listing may ask for.
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            retry_on_conflict: true,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// A committed write and the notifications it asks for.
struct Outcome<T> {
    value: T,
    notifications: Vec<Notification>,
}

/// Orchestrates authorization, the lifecycle table, the balancer,
/// storage, history and notifications.
///
/// All store access goes through one lock, so write units never
/// interleave and the balancer always sees committed loads.
pub struct LifecycleService<S, N> {
    store: Mutex<S>,
    notifier: N,
    config: ServiceConfig,
}

impl<S, N> LifecycleService<S, N>
where
    S: LifecycleStore,
    N: NotificationDispatcher,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_config(store, notifier, ServiceConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub const fn with_config(store: S, notifier: N, config: ServiceConfig) -> Self {
        Self {
            store: Mutex::new(store),
            notifier,
            config,
        }
    }

    /// Returns the notification dispatcher.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, LifecycleError> {
        self.store.lock().map_err(|_| LifecycleError::Internal {
            message: String::from("ticket store lock poisoned"),
        })
    }

    /// Runs `unit` in a transaction, retrying once on a lost update.
    fn run_unit<T, F>(&self, operation: &str, unit: F) -> Result<T, LifecycleError>
    where
        F: Fn(&mut S) -> Result<Outcome<T>, LifecycleError>,
    {
        let mut store: MutexGuard<'_, S> = self.lock()?;

        let outcome: Outcome<T> = match store.in_transaction(&unit) {
            Err(LifecycleError::ConflictingAssignment { message })
                if self.config.retry_on_conflict =>
            {
                warn!(operation, %message, "Retrying after concurrent update");
                store.in_transaction(&unit)?
            }
            result => result?,
        };
        drop(store);

        self.dispatch(outcome.notifications);
        Ok(outcome.value)
    }

    fn dispatch(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            let ticket_id: i64 = notification.ticket_id;
            let recipient: String = notification.recipient_id.clone();
            if let Err(e) = self.notifier.notify(notification) {
                warn!(ticket_id, recipient, error = %e, "Notification failed");
            }
        }
    }

    /// Creates a ticket, or edits an existing one.
    ///
    /// A USER always owns what they submit and reports under their own
    /// email. Anyone else creating a ticket must name an existing USER as
    /// owner. An OPEN or ANSWERED ticket without an assignee is handed to
    /// the least-loaded eligible helper.
    ///
    /// # Arguments
    ///
    /// * `principal` - The acting principal
    /// * `submission` - The submitted fields and target status
    /// * `existing_id` - The ticket to edit, or `None` to create one
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ticket, owner, assignee, category or support service does not exist
    /// - The principal may not make this submission
    /// - A field is malformed, or missing on a non-draft ticket
    /// - The status change is not allowed for this principal
    /// - No eligible assignee exists for automatic assignment
    pub fn create_or_update(
        &self,
        principal: &Principal,
        submission: &TicketSubmission,
        existing_id: Option<i64>,
    ) -> Result<Ticket, LifecycleError> {
        self.run_unit("create_or_update", |store| {
            let now: OffsetDateTime = OffsetDateTime::now_utc();
            match existing_id {
                None => create_in(store, principal, submission, now),
                Some(ticket_id) => update_in(store, principal, submission, ticket_id, now),
            }
        })
    }

    /// Takes an OPEN ticket in charge, moving it to ANSWERED.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket does not exist, the principal is
    /// neither its assignee nor a manager, or the ticket is not OPEN.
    pub fn accept(&self, principal: &Principal, ticket_id: i64) -> Result<Ticket, LifecycleError> {
        self.run_unit("accept", |store| {
            transition_in(store, principal, ticket_id, Operation::Accept, |_, _| {
                Ok(Command::Accept)
            })
        })
    }

    /// Hands an OPEN ticket to another helper, keeping it OPEN.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket or new assignee does not exist, the
    /// principal is not the assignee, the ticket is not OPEN, or the new
    /// assignee is the principal or ineligible.
    pub fn reject(
        &self,
        principal: &Principal,
        ticket_id: i64,
        new_assignee_id: &str,
    ) -> Result<Ticket, LifecycleError> {
        self.run_unit("reject", |store| {
            transition_in(store, principal, ticket_id, Operation::Reject, |store, _| {
                Ok(Command::Reject {
                    new_assignee: find_principal(store, new_assignee_id)?,
                })
            })
        })
    }

    /// Hands an ANSWERED ticket to another helper, reopening it.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket or new assignee does not exist, the
    /// principal is not the assignee, the ticket is not ANSWERED, or the
    /// new assignee is the principal or ineligible.
    pub fn escalate(
        &self,
        principal: &Principal,
        ticket_id: i64,
        new_assignee_id: &str,
    ) -> Result<Ticket, LifecycleError> {
        self.run_unit("escalate", |store| {
            transition_in(store, principal, ticket_id, Operation::Escalate, |store, _| {
                Ok(Command::Escalate {
                    new_assignee: find_principal(store, new_assignee_id)?,
                })
            })
        })
    }

    /// Moves a ticket along its plain lifecycle path.
    ///
    /// Only ANSWERED (accept) and SOLVED (resolve) can be requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket does not exist, the principal is
    /// neither its assignee nor a manager, or the change is not a
    /// lifecycle edge.
    pub fn change_status(
        &self,
        principal: &Principal,
        ticket_id: i64,
        target: TicketStatus,
    ) -> Result<Ticket, LifecycleError> {
        self.run_unit("change_status", |store| {
            transition_in(
                store,
                principal,
                ticket_id,
                Operation::ChangeStatus,
                |_, _| Ok(Command::ChangeStatus { target }),
            )
        })
    }

    /// Assigns a ticket to an eligible principal.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket or assignee does not exist, the
    /// principal is not a manager, the ticket is a draft, or the assignee
    /// is ineligible or already holds the ticket.
    pub fn assign(
        &self,
        principal: &Principal,
        ticket_id: i64,
        assignee_id: &str,
    ) -> Result<Ticket, LifecycleError> {
        self.run_unit("assign", |store| {
            transition_in(store, principal, ticket_id, Operation::Assign, |store, _| {
                Ok(Command::Assign {
                    assignee: find_principal(store, assignee_id)?,
                })
            })
        })
    }

    /// Deletes a ticket together with its history.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket does not exist or the principal may
    /// not delete it.
    pub fn delete(&self, principal: &Principal, ticket_id: i64) -> Result<(), LifecycleError> {
        self.run_unit("delete", |store| {
            let ticket: Ticket = find_ticket(store, ticket_id)?;
            AuthorizationPolicy::authorize(principal, &ticket, Operation::Delete)?;

            let removed: usize = store.delete_history(ticket_id)?;
            store.delete_ticket(ticket_id)?;

            info!(
                ticket_id,
                actor = %principal.principal_id,
                removed_history = removed,
                "Ticket deleted"
            );
            Ok(Outcome {
                value: (),
                notifications: Vec::new(),
            })
        })
    }

    /// Returns a ticket the principal may read.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket does not exist or is not visible to
    /// the principal.
    pub fn get(&self, principal: &Principal, ticket_id: i64) -> Result<Ticket, LifecycleError> {
        let mut store: MutexGuard<'_, S> = self.lock()?;
        let ticket: Ticket = find_ticket(&mut *store, ticket_id)?;
        AuthorizationPolicy::authorize(principal, &ticket, Operation::Read)?;
        Ok(ticket)
    }

    /// Lists the tickets visible to the principal, newest first.
    ///
    /// Tickets outside the principal's visibility are silently excluded.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails.
    pub fn list(
        &self,
        principal: &Principal,
        filters: &ListFilters,
        page: PageRequest,
    ) -> Result<Page<Ticket>, LifecycleError> {
        let size: u64 = page
            .size
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size.max(1));

        let mut query: TicketQuery = TicketQuery::new(Visibility::for_principal(principal), size);
        query.owner_id.clone_from(&filters.owner_id);
        query.assignee_id.clone_from(&filters.assignee_id);
        query.status = filters.status;
        query.priority = filters.priority;
        query.category_id = filters.category_id;
        query.service_id = filters.service_id;
        query.text.clone_from(&filters.text);
        query.offset = page.page.saturating_mul(size);

        let slice: TicketSlice = self.lock()?.query_tickets(&query)?;
        debug!(
            actor = %principal.principal_id,
            total = slice.total,
            page = page.page,
            "Listed tickets"
        );

        Ok(Page::new(slice.tickets, page.page, size, slice.total))
    }

    /// Returns a ticket's history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket does not exist or is not visible to
    /// the principal.
    pub fn history(
        &self,
        principal: &Principal,
        ticket_id: i64,
    ) -> Result<Vec<HistoryEntry>, LifecycleError> {
        let mut store: MutexGuard<'_, S> = self.lock()?;
        let ticket: Ticket = find_ticket(&mut *store, ticket_id)?;
        AuthorizationPolicy::authorize(principal, &ticket, Operation::ViewHistory)?;
        Ok(store.list_history(ticket_id)?)
    }

    /// Counts the tickets visible to the principal per status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn dashboard_counts(&self, principal: &Principal) -> Result<DashboardCounts, LifecycleError> {
        let counts: BTreeMap<TicketStatus, u64> = self
            .lock()?
            .count_statuses(&Visibility::for_principal(principal))?;

        let mut dashboard: DashboardCounts = DashboardCounts::default();
        for (status, count) in counts {
            dashboard.record(status, count);
        }
        Ok(dashboard)
    }

    /// Lists every principal who may hold tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn eligible_assignees(&self) -> Result<Vec<Principal>, LifecycleError> {
        Ok(self
            .lock()?
            .find_principals_by_roles(&ELIGIBLE_ASSIGNEE_ROLES)?)
    }

    /// Returns the active ticket count of every eligible assignee.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn assignee_loads(&self) -> Result<Vec<AssigneeLoad>, LifecycleError> {
        let mut store: MutexGuard<'_, S> = self.lock()?;
        Ok(current_loads(&mut *store)?)
    }

    /// Lists the ticket categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn categories(&self) -> Result<Vec<Category>, LifecycleError> {
        Ok(self.lock()?.list_categories()?)
    }

    /// Lists the support services.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn support_services(&self) -> Result<Vec<SupportService>, LifecycleError> {
        Ok(self.lock()?.list_support_services()?)
    }

    /// Computes what the principal may currently do with a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket does not exist or is not visible to
    /// the principal.
    pub fn ticket_capabilities(
        &self,
        principal: &Principal,
        ticket_id: i64,
    ) -> Result<TicketCapabilities, LifecycleError> {
        let ticket: Ticket = self.get(principal, ticket_id)?;
        Ok(compute_ticket_capabilities(principal, &ticket))
    }

    /// Resolves the principal behind a token.
    ///
    /// The identity provider is authoritative for roles: a stored
    /// principal whose role differs from the token's is updated, and an
    /// unknown subject is registered from the token claims.
    ///
    /// # Arguments
    ///
    /// * `claims` - The decoded token claims
    /// * `client_id` - The client whose client-level roles apply
    ///
    /// # Errors
    ///
    /// Returns an error if the token has no subject or the store fails.
    pub fn authenticate(
        &self,
        claims: &TokenClaims,
        client_id: &str,
    ) -> Result<Principal, LifecycleError> {
        if claims.sub.trim().is_empty() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("token carries no subject"),
            }
            .into());
        }

        self.run_unit("authenticate", |store| {
            let role: Role = resolve_roles(claims, client_id).primary_role();

            let principal: Principal = match store.find_principal(&claims.sub)? {
                Some(mut principal) => {
                    if principal.role != role {
                        info!(
                            principal_id = %principal.principal_id,
                            from = %principal.role,
                            to = %role,
                            "Role updated from token"
                        );
                        principal.role = role;
                        store.save_principal(&principal)?;
                    }
                    principal
                }
                None => {
                    let principal: Principal = principal_from_claims(claims, client_id);
                    store.save_principal(&principal)?;
                    info!(
                        principal_id = %principal.principal_id,
                        role = %principal.role,
                        "Registered principal from token"
                    );
                    principal
                }
            };

            Ok(Outcome {
                value: principal,
                notifications: Vec::new(),
            })
        })
    }
}

fn create_in<S: LifecycleStore>(
    store: &mut S,
    principal: &Principal,
    submission: &TicketSubmission,
    now: OffsetDateTime,
) -> Result<Outcome<Ticket>, LifecycleError> {
    AuthorizationPolicy::authorize_submission(principal, None, submission)?;

    let owner: Principal = if principal.role == Role::User {
        principal.clone()
    } else {
        let owner_id: &str = submission.owner_id.as_deref().ok_or_else(|| {
            LifecycleError::validation(
                "owner_id",
                "a ticket created on behalf of someone must name its owner",
            )
        })?;
        find_principal(store, owner_id)?
    };

    let edit: TicketEdit = resolve_edit(store, principal, submission, None)?;
    let result: TransitionResult =
        apply_create(&owner, edit, principal, now).map_err(translate_core_error)?;

    let mut ticket: Ticket = result.new_ticket;
    let ticket_id: i64 = store.insert_ticket(&ticket)?;
    ticket.ticket_id = Some(ticket_id);

    if let Some(entry) = result.history_entry {
        store.append_history(&entry.for_ticket(ticket_id))?;
    }
    update_submitter_contact(store, principal, submission, &ticket)?;

    info!(
        ticket_id,
        actor = %principal.principal_id,
        status = %ticket.status,
        assignee = ?ticket.assignee_id,
        "Ticket created"
    );

    let notifications: Vec<Notification> = plan_notifications(store, None, &ticket, None)?;
    Ok(Outcome {
        value: ticket,
        notifications,
    })
}

fn update_in<S: LifecycleStore>(
    store: &mut S,
    principal: &Principal,
    submission: &TicketSubmission,
    ticket_id: i64,
    now: OffsetDateTime,
) -> Result<Outcome<Ticket>, LifecycleError> {
    let ticket: Ticket = find_ticket(store, ticket_id)?;
    AuthorizationPolicy::authorize_submission(principal, Some(&ticket), submission)?;

    if submission
        .owner_id
        .as_deref()
        .is_some_and(|owner_id| !ticket.is_owned_by(owner_id))
    {
        return Err(LifecycleError::validation(
            "owner_id",
            "the owner of a ticket cannot change",
        ));
    }

    let edit: TicketEdit = resolve_edit(store, principal, submission, Some(&ticket))?;
    let result: TransitionResult = apply(&ticket, Command::Edit { edit }, principal, now)
        .map_err(translate_core_error)?;

    persist(store, &result)?;
    update_submitter_contact(store, principal, submission, &result.new_ticket)?;

    info!(
        ticket_id,
        actor = %principal.principal_id,
        from = %ticket.status,
        to = %result.new_ticket.status,
        "Ticket updated"
    );

    let trigger: Option<Trigger> = result.history_entry.as_ref().map(|entry| entry.trigger);
    let notifications: Vec<Notification> =
        plan_notifications(store, Some(&ticket), &result.new_ticket, trigger)?;
    Ok(Outcome {
        value: result.new_ticket,
        notifications,
    })
}

/// Runs one command-driven transition: load, authorize, apply, persist.
fn transition_in<S, F>(
    store: &mut S,
    principal: &Principal,
    ticket_id: i64,
    operation: Operation,
    build: F,
) -> Result<Outcome<Ticket>, LifecycleError>
where
    S: LifecycleStore,
    F: FnOnce(&mut S, &Ticket) -> Result<Command, LifecycleError>,
{
    let ticket: Ticket = find_ticket(store, ticket_id)?;
    AuthorizationPolicy::authorize(principal, &ticket, operation)?;

    let command: Command = build(store, &ticket)?;
    let command_name: &str = command.name();
    let result: TransitionResult = apply(&ticket, command, principal, OffsetDateTime::now_utc())
        .map_err(translate_core_error)?;

    persist(store, &result)?;

    info!(
        ticket_id,
        actor = %principal.principal_id,
        command = command_name,
        from = %ticket.status,
        to = %result.new_ticket.status,
        assignee = ?result.new_ticket.assignee_id,
        "Ticket transition applied"
    );

    let trigger: Option<Trigger> = result.history_entry.as_ref().map(|entry| entry.trigger);
    let notifications: Vec<Notification> =
        plan_notifications(store, Some(&ticket), &result.new_ticket, trigger)?;
    Ok(Outcome {
        value: result.new_ticket,
        notifications,
    })
}

/// Saves a transition of an already stored ticket and its history entry.
fn persist<S: LifecycleStore>(store: &mut S, result: &TransitionResult) -> Result<(), LifecycleError> {
    let ticket_id: i64 = result.new_ticket.ticket_id.ok_or_else(|| LifecycleError::Internal {
        message: String::from("stored ticket has no id"),
    })?;

    store.save_ticket(&result.new_ticket)?;
    if let Some(entry) = &result.history_entry {
        store.append_history(&entry.clone().for_ticket(ticket_id))?;
    }
    Ok(())
}

/// Resolves the references in a submission into an edit.
fn resolve_edit<S: LifecycleStore>(
    store: &mut S,
    principal: &Principal,
    submission: &TicketSubmission,
    current: Option<&Ticket>,
) -> Result<TicketEdit, LifecycleError> {
    if let Some(category_id) = submission.category_id
        && store.find_category(category_id)?.is_none()
    {
        return Err(translate_domain_error(DomainError::CategoryNotFound(
            category_id,
        )));
    }
    if let Some(service_id) = submission.service_id
        && store.find_support_service(service_id)?.is_none()
    {
        return Err(translate_domain_error(
            DomainError::SupportServiceNotFound(service_id),
        ));
    }

    let holds_assignee: bool = current.is_some_and(|ticket| ticket.assignee_id.is_some());
    let needs_assignee: bool = matches!(
        submission.status,
        TicketStatus::Open | TicketStatus::Answered
    );

    let assignee: Option<AssigneeChoice> = match submission.assignee_id.as_deref() {
        Some(assignee_id) => Some(AssigneeChoice::Explicit(find_principal(
            store,
            assignee_id,
        )?)),
        None if needs_assignee && !holds_assignee => {
            let chosen: Principal = balance(store)?;
            debug!(
                actor = %principal.principal_id,
                assignee = %chosen.principal_id,
                "Balancer selected assignee"
            );
            Some(AssigneeChoice::Balanced(chosen))
        }
        None => None,
    };

    Ok(TicketEdit {
        title: submission.title.clone(),
        description: submission.description.clone(),
        priority: submission.priority,
        category_id: submission.category_id,
        service_id: submission.service_id,
        contact: ContactInfo {
            email: submission.contact_email.clone(),
            phone: submission.contact_phone.clone(),
            fiscal_code: submission.contact_fiscal_code.clone(),
        },
        target_status: submission.status,
        assignee,
    })
}

/// Picks the eligible principal with the fewest active tickets.
fn balance<S: LifecycleStore>(store: &mut S) -> Result<Principal, LifecycleError> {
    let loads: Vec<AssigneeLoad> = current_loads(store)?;
    let chosen_id: String = select_assignee(&loads).map_err(translate_domain_error)?;
    find_principal(store, &chosen_id)
}

fn current_loads<S: LifecycleStore>(store: &mut S) -> Result<Vec<AssigneeLoad>, LifecycleError> {
    let candidate_ids: Vec<String> = store
        .find_principals_by_roles(&ELIGIBLE_ASSIGNEE_ROLES)?
        .into_iter()
        .map(|candidate| candidate.principal_id)
        .collect();
    Ok(store.active_assignment_counts(&candidate_ids)?)
}

/// Copies a USER's phone and fiscal code from a non-draft submission onto
/// their principal record.
fn update_submitter_contact<S: LifecycleStore>(
    store: &mut S,
    principal: &Principal,
    submission: &TicketSubmission,
    ticket: &Ticket,
) -> Result<(), LifecycleError> {
    if principal.role != Role::User || ticket.status == TicketStatus::Draft {
        return Ok(());
    }

    let Some(mut stored) = store.find_principal(&principal.principal_id)? else {
        return Ok(());
    };
    let phone: Option<String> = non_blank(submission.contact_phone.as_deref());
    let fiscal_code: Option<String> = non_blank(submission.contact_fiscal_code.as_deref());
    if stored.phone == phone && stored.fiscal_code == fiscal_code {
        return Ok(());
    }

    stored.phone = phone;
    stored.fiscal_code = fiscal_code;
    store.save_principal(&stored)?;
    debug!(principal_id = %stored.principal_id, "Updated contact details from submission");
    Ok(())
}

/// Works out who should hear about a committed change.
fn plan_notifications<S: LifecycleStore>(
    store: &mut S,
    before: Option<&Ticket>,
    after: &Ticket,
    trigger: Option<Trigger>,
) -> Result<Vec<Notification>, LifecycleError> {
    let Some(ticket_id) = after.ticket_id else {
        return Ok(Vec::new());
    };

    let mut planned: Vec<(NotificationKind, String)> = Vec::new();

    let was_draft: bool = before.is_none_or(|ticket| ticket.status == TicketStatus::Draft);
    if after.status != TicketStatus::Draft {
        if was_draft {
            planned.push((NotificationKind::TicketCreated, after.owner_id.clone()));
        } else if before.is_some_and(|ticket| ticket.status != after.status) {
            planned.push((NotificationKind::StatusUpdated, after.owner_id.clone()));
        }
    }

    let previous_assignee: Option<&str> = before.and_then(|ticket| ticket.assignee_id.as_deref());
    if let Some(assignee_id) = after.assignee_id.as_deref()
        && previous_assignee != Some(assignee_id)
    {
        let kind: NotificationKind = match trigger {
            Some(Trigger::Reject | Trigger::Escalate) => NotificationKind::TicketReassigned,
            _ => NotificationKind::TicketAssigned,
        };
        planned.push((kind, assignee_id.to_string()));
    }

    let mut notifications: Vec<Notification> = Vec::with_capacity(planned.len());
    for (kind, recipient_id) in planned {
        let Some(recipient) = store.find_principal(&recipient_id)? else {
            warn!(ticket_id, recipient = %recipient_id, "Notification recipient not found");
            continue;
        };
        let Some(email) = recipient.email.filter(|email| validate_email(email).is_ok()) else {
            warn!(ticket_id, recipient = %recipient_id, "Skipping recipient without a valid email");
            continue;
        };
        notifications.push(Notification {
            kind,
            ticket_id,
            status: after.status,
            recipient_id,
            recipient_email: email,
            title: after.title.clone(),
        });
    }

    Ok(notifications)
}

fn find_ticket<S: LifecycleStore>(store: &mut S, ticket_id: i64) -> Result<Ticket, LifecycleError> {
    store
        .find_ticket(ticket_id)?
        .ok_or_else(|| translate_domain_error(DomainError::TicketNotFound(ticket_id)))
}

fn find_principal<S: LifecycleStore>(
    store: &mut S,
    principal_id: &str,
) -> Result<Principal, LifecycleError> {
    store.find_principal(principal_id)?.ok_or_else(|| {
        translate_domain_error(DomainError::PrincipalNotFound(principal_id.to_string()))
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
