// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_audit::HistoryEntry;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::HistoryRecord;
use crate::diesel_schema::ticket_history;
use crate::error::PersistenceError;

/// Appends a history entry and returns its id.
///
/// # Errors
///
/// Returns an error if the entry has no ticket id or the write fails.
pub fn append_history(
    conn: &mut SqliteConnection,
    entry: &HistoryEntry,
) -> Result<i64, PersistenceError> {
    let record: HistoryRecord = HistoryRecord::from_entry(entry)?;

    diesel::insert_into(ticket_history::table)
        .values(&record)
        .execute(conn)?;

    let history_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        history_id,
        ticket_id = record.ticket_id,
        trigger = %record.trigger_name,
        "History entry appended"
    );
    Ok(history_id)
}

/// Deletes every history entry of a ticket.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn delete_history(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(ticket_history::table.filter(ticket_history::ticket_id.eq(ticket_id)))
            .execute(conn)?,
    )
}
