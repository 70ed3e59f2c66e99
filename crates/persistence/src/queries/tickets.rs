// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket lookups, listings and counters.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use helpdesk::{TicketQuery, TicketSlice, Visibility};
use helpdesk_domain::{AssigneeLoad, Ticket, TicketStatus};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::TicketRow;
use crate::diesel_schema::tickets;
use crate::error::PersistenceError;

/// Statuses that count towards an assignee's load.
const ACTIVE_STATUSES: [&str; 2] = [TicketStatus::Open.as_str(), TicketStatus::Answered.as_str()];

/// Retrieves a ticket by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the row cannot be decoded.
pub fn get_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Option<Ticket>, PersistenceError> {
    debug!("Looking up ticket: {}", ticket_id);

    tickets::table
        .filter(tickets::ticket_id.eq(ticket_id))
        .select(TicketRow::as_select())
        .first(conn)
        .optional()?
        .map(TicketRow::into_ticket)
        .transpose()
}

/// Returns the stored version of a ticket.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_ticket_version(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(tickets::table
        .filter(tickets::ticket_id.eq(ticket_id))
        .select(tickets::version)
        .first::<i64>(conn)
        .optional()?)
}

/// Restricts a ticket query to what a visibility scope admits.
fn visible<'a>(
    query: tickets::BoxedQuery<'a, Sqlite>,
    visibility: &'a Visibility,
) -> tickets::BoxedQuery<'a, Sqlite> {
    let draft: &str = TicketStatus::Draft.as_str();

    match visibility {
        Visibility::All => query,
        Visibility::NonDraft => query.filter(tickets::status.ne(draft)),
        Visibility::AssignedOrOwned { principal_id } => query.filter(
            tickets::assignee_id
                .eq(principal_id)
                .or(tickets::owner_id.eq(principal_id)),
        ),
        Visibility::OwnedOrContact {
            principal_id,
            email: Some(email),
        } => query.filter(
            tickets::owner_id.eq(principal_id).or(tickets::status
                .ne(draft)
                .and(tickets::contact_email.eq(email))),
        ),
        Visibility::OwnedOrContact {
            principal_id,
            email: None,
        } => query.filter(tickets::owner_id.eq(principal_id)),
    }
}

/// Builds the filtered (but unpaged) query for a listing.
fn filtered(query: &TicketQuery) -> tickets::BoxedQuery<'_, Sqlite> {
    let mut boxed: tickets::BoxedQuery<'_, Sqlite> =
        visible(tickets::table.into_boxed(), &query.visibility);

    if let Some(owner_id) = &query.owner_id {
        boxed = boxed.filter(tickets::owner_id.eq(owner_id));
    }
    if let Some(assignee_id) = &query.assignee_id {
        boxed = boxed.filter(tickets::assignee_id.eq(assignee_id));
    }
    if let Some(status) = query.status {
        boxed = boxed.filter(tickets::status.eq(status.as_str()));
    }
    if let Some(priority) = query.priority {
        boxed = boxed.filter(tickets::priority.eq(priority.as_str()));
    }
    if let Some(category_id) = query.category_id {
        boxed = boxed.filter(tickets::category_id.eq(category_id));
    }
    if let Some(service_id) = query.service_id {
        boxed = boxed.filter(tickets::service_id.eq(service_id));
    }
    if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern: String = format!("%{text}%");
        boxed = boxed.filter(
            tickets::title
                .like(pattern.clone())
                .or(tickets::description.like(pattern)),
        );
    }

    boxed
}

/// Returns one page of tickets, newest first, with the total match count.
///
/// # Errors
///
/// Returns an error if the database query fails or a row cannot be decoded.
pub fn query_tickets(
    conn: &mut SqliteConnection,
    query: &TicketQuery,
) -> Result<TicketSlice, PersistenceError> {
    let offset: i64 = query.offset.to_i64().unwrap_or(i64::MAX);
    let limit: i64 = query.limit.to_i64().unwrap_or(i64::MAX);

    let total: i64 = filtered(query).count().get_result(conn)?;

    let rows: Vec<TicketRow> = filtered(query)
        .order((tickets::created_at.desc(), tickets::ticket_id.desc()))
        .limit(limit)
        .offset(offset)
        .select(TicketRow::as_select())
        .load(conn)?;

    let tickets: Vec<Ticket> = rows
        .into_iter()
        .map(TicketRow::into_ticket)
        .collect::<Result<_, _>>()?;

    debug!(total, returned = tickets.len(), "Ticket listing");

    Ok(TicketSlice {
        tickets,
        total: total.to_u64().unwrap_or(0),
    })
}

/// Counts tickets per status inside a visibility scope.
///
/// # Errors
///
/// Returns an error if the database query fails or a status cannot be decoded.
pub fn count_statuses(
    conn: &mut SqliteConnection,
    visibility: &Visibility,
) -> Result<BTreeMap<TicketStatus, u64>, PersistenceError> {
    let statuses: Vec<String> = visible(tickets::table.into_boxed(), visibility)
        .select(tickets::status)
        .load(conn)?;

    let mut counts: BTreeMap<TicketStatus, u64> =
        TicketStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for status in statuses {
        *counts.entry(status.parse::<TicketStatus>()?).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Counts active tickets held by each principal.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn active_assignment_counts(
    conn: &mut SqliteConnection,
    principal_ids: &[String],
) -> Result<Vec<AssigneeLoad>, PersistenceError> {
    let assignees: Vec<Option<String>> = tickets::table
        .filter(tickets::assignee_id.eq_any(principal_ids))
        .filter(tickets::status.eq_any(ACTIVE_STATUSES))
        .select(tickets::assignee_id)
        .load(conn)?;

    let mut loads: BTreeMap<&str, u64> = principal_ids.iter().map(|id| (id.as_str(), 0)).collect();
    for assignee in assignees.iter().flatten() {
        if let Some(load) = loads.get_mut(assignee.as_str()) {
            *load += 1;
        }
    }

    Ok(loads
        .into_iter()
        .map(|(id, load)| AssigneeLoad::new(id.to_string(), load))
        .collect())
}
