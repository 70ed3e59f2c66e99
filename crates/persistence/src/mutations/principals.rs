// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use helpdesk_domain::Principal;
use tracing::info;

use crate::data_models::PrincipalRow;
use crate::diesel_schema::principals;
use crate::error::PersistenceError;

/// Inserts a principal or replaces the stored copy.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_principal(
    conn: &mut SqliteConnection,
    principal: &Principal,
) -> Result<(), PersistenceError> {
    let row: PrincipalRow = PrincipalRow::from_principal(principal);

    diesel::insert_into(principals::table)
        .values(&row)
        .on_conflict(principals::principal_id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    info!(
        principal_id = %principal.principal_id,
        role = %principal.role,
        "Principal saved"
    );
    Ok(())
}
