// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the helpdesk ticket engine.
//!
//! This crate stores principals, catalogs, tickets and their history in
//! `SQLite` through Diesel and implements the storage traits the lifecycle
//! service depends on.
//!
//! ## Databases
//!
//! - In-memory databases are used for tests. Each call to
//!   [`Persistence::new_in_memory`] gets its own isolated database.
//! - File databases run in WAL mode.
//!
//! Migrations are embedded at compile time and applied on open. Foreign
//! key enforcement is verified on every open; history rows are removed
//! with their ticket through `ON DELETE CASCADE`.
//!
//! ## Concurrency
//!
//! Writes performed through [`helpdesk::Transactional::in_transaction`]
//! run inside `BEGIN IMMEDIATE` transactions, and ticket updates are
//! checked against the stored version.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` persistence adapter.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database name, so tests
    /// never see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Creates a ticket category.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique category name
    /// * `description` - Optional description
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the write fails.
    pub fn create_category(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::create_category(&mut self.conn, name, description)
    }

    /// Creates a support service.
    ///
    /// # Arguments
    ///
    /// * `title` - Unique service title
    /// * `description` - Optional description
    ///
    /// # Errors
    ///
    /// Returns an error if the title is taken or the write fails.
    pub fn create_support_service(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::create_support_service(&mut self.conn, title, description)
    }
}
