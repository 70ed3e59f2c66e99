// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{categories, support_services};
use crate::error::PersistenceError;

/// Creates a category and returns its id.
///
/// # Errors
///
/// Returns an error if the name is already taken or the write fails.
pub fn create_category(
    conn: &mut SqliteConnection,
    name: &str,
    description: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(categories::table)
        .values((
            categories::name.eq(name),
            categories::description.eq(description),
        ))
        .execute(conn)?;

    let category_id: i64 = get_last_insert_rowid(conn)?;
    info!(category_id, name, "Category created");
    Ok(category_id)
}

/// Creates a support service and returns its id.
///
/// # Errors
///
/// Returns an error if the title is already taken or the write fails.
pub fn create_support_service(
    conn: &mut SqliteConnection,
    title: &str,
    description: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(support_services::table)
        .values((
            support_services::title.eq(title),
            support_services::description.eq(description),
        ))
        .execute(conn)?;

    let service_id: i64 = get_last_insert_rowid(conn)?;
    info!(service_id, title, "Support service created");
    Ok(service_id)
}
