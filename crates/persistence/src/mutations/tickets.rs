// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::Ticket;
use tracing::{debug, info, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::TicketRecord;
use crate::diesel_schema::tickets;
use crate::error::PersistenceError;
use crate::queries::tickets::get_ticket_version;

/// Inserts a new ticket and returns its id.
///
/// # Errors
///
/// Returns an error if a referenced row does not exist or the write fails.
pub fn insert_ticket(conn: &mut SqliteConnection, ticket: &Ticket) -> Result<i64, PersistenceError> {
    let record: TicketRecord = TicketRecord::from_ticket(ticket)?;

    diesel::insert_into(tickets::table)
        .values(&record)
        .execute(conn)?;

    let ticket_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        ticket_id,
        owner_id = %ticket.owner_id,
        status = %ticket.status,
        "Ticket created"
    );
    Ok(ticket_id)
}

/// Overwrites a stored ticket if its version is still `ticket.version - 1`.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if another writer got there
/// first, `PersistenceError::TicketNotFound` if the ticket is gone, or a
/// database error.
pub fn update_ticket(conn: &mut SqliteConnection, ticket: &Ticket) -> Result<(), PersistenceError> {
    let ticket_id: i64 = ticket.ticket_id.ok_or(PersistenceError::MissingId("ticket"))?;
    let expected_version: i64 = ticket.version - 1;
    let record: TicketRecord = TicketRecord::from_ticket(ticket)?;

    let updated: usize = diesel::update(
        tickets::table
            .filter(tickets::ticket_id.eq(ticket_id))
            .filter(tickets::version.eq(expected_version)),
    )
    .set(&record)
    .execute(conn)?;

    if updated == 1 {
        debug!(ticket_id, version = ticket.version, "Ticket updated");
        return Ok(());
    }

    match get_ticket_version(conn, ticket_id)? {
        None => Err(PersistenceError::TicketNotFound(ticket_id)),
        Some(stored) => {
            warn!(
                ticket_id,
                expected_version, stored, "Ticket version conflict"
            );
            Err(PersistenceError::VersionConflict {
                ticket_id,
                expected_version,
            })
        }
    }
}

/// Deletes a ticket. History rows go with it.
///
/// # Errors
///
/// Returns `PersistenceError::TicketNotFound` if no row was deleted, or a
/// database error.
pub fn delete_ticket(conn: &mut SqliteConnection, ticket_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(tickets::table.filter(tickets::ticket_id.eq(ticket_id))).execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::TicketNotFound(ticket_id));
    }

    info!(ticket_id, "Ticket deleted");
    Ok(())
}
