// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use helpdesk_domain::{Category, SupportService};

use crate::data_models::{CategoryRow, SupportServiceRow};
use crate::diesel_schema::{categories, support_services};
use crate::error::PersistenceError;

/// Retrieves a category by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_category(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> Result<Option<Category>, PersistenceError> {
    let row: Option<CategoryRow> = categories::table
        .filter(categories::category_id.eq(category_id))
        .select(CategoryRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Category::from))
}

/// Lists every category by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, PersistenceError> {
    let rows: Vec<CategoryRow> = categories::table
        .order(categories::name.asc())
        .select(CategoryRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Category::from).collect())
}

/// Retrieves a support service by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_support_service(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> Result<Option<SupportService>, PersistenceError> {
    let row: Option<SupportServiceRow> = support_services::table
        .filter(support_services::service_id.eq(service_id))
        .select(SupportServiceRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SupportService::from))
}

/// Lists every support service by title.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_support_services(
    conn: &mut SqliteConnection,
) -> Result<Vec<SupportService>, PersistenceError> {
    let rows: Vec<SupportServiceRow> = support_services::table
        .order(support_services::title.asc())
        .select(SupportServiceRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SupportService::from).collect())
}
