// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use helpdesk_domain::{Principal, Role};
use tracing::debug;

use crate::data_models::PrincipalRow;
use crate::diesel_schema::principals;
use crate::error::PersistenceError;

/// Retrieves a principal by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the principal is not found.
pub fn get_principal(
    conn: &mut SqliteConnection,
    principal_id: &str,
) -> Result<Option<Principal>, PersistenceError> {
    debug!("Looking up principal: {}", principal_id);

    principals::table
        .filter(principals::principal_id.eq(principal_id))
        .select(PrincipalRow::as_select())
        .first(conn)
        .optional()?
        .map(PrincipalRow::into_principal)
        .transpose()
}

/// Retrieves a principal by email.
///
/// The column is declared `COLLATE NOCASE`, so the match ignores case.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_principal_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<Principal>, PersistenceError> {
    debug!("Looking up principal by email: {}", email);

    principals::table
        .filter(principals::email.eq(email))
        .order(principals::principal_id.asc())
        .select(PrincipalRow::as_select())
        .first(conn)
        .optional()?
        .map(PrincipalRow::into_principal)
        .transpose()
}

/// Lists principals holding any of `roles`, ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_principals_by_roles(
    conn: &mut SqliteConnection,
    roles: &[Role],
) -> Result<Vec<Principal>, PersistenceError> {
    let role_names: Vec<&str> = roles.iter().map(Role::as_str).collect();

    let rows: Vec<PrincipalRow> = principals::table
        .filter(principals::role.eq_any(role_names))
        .order(principals::principal_id.asc())
        .select(PrincipalRow::as_select())
        .load(conn)?;

    rows.into_iter().map(PrincipalRow::into_principal).collect()
}
