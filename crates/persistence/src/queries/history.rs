// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use helpdesk_audit::HistoryEntry;

use crate::data_models::HistoryRow;
use crate::diesel_schema::ticket_history;
use crate::error::PersistenceError;

/// Lists a ticket's history, oldest first.
///
/// Entries are appended in time order, so insertion order breaks ties
/// between entries recorded in the same instant.
///
/// # Errors
///
/// Returns an error if the database query fails or a row cannot be decoded.
pub fn list_history(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Vec<HistoryEntry>, PersistenceError> {
    let rows: Vec<HistoryRow> = ticket_history::table
        .filter(ticket_history::ticket_id.eq(ticket_id))
        .order((
            ticket_history::recorded_at.asc(),
            ticket_history::history_id.asc(),
        ))
        .select(HistoryRow::as_select())
        .load(conn)?;

    rows.into_iter().map(HistoryRow::into_entry).collect()
}
