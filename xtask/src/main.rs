// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - project automation
//!
//! `cargo xtask ci` runs everything a pull request has to pass: clippy,
//! docs, formatting, typos, the test suite and the schema check.
//!
//! `cargo xtask verify-schema` applies the embedded `SQLite` migrations to a
//! scratch in-memory database and checks that the tables, columns and
//! foreign keys the persistence layer relies on are all there, including
//! the cascade from tickets to their history.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, schema)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check that docs build without errors
    #[command(visible_alias = "d")]
    LintDocs,

    /// Lint formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Apply the migrations to a scratch database and check the schema
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifySchema => verify_schema(),
        }
    }
}

/// Run CI checks (lint, build, test, schema)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_schema()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint clippy, docs, formatting and typos
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Build the docs of every default workspace package with warnings denied
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Run lib tests, then doc tests
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?;
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// A foreign key the persistence layer depends on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    on_delete: String,
}

/// What one table looks like after the migrations ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TableShape {
    /// Column name to nullability.
    columns: BTreeMap<String, bool>,
    foreign_keys: BTreeSet<ForeignKey>,
}

/// Tables, their columns and nullability, and the foreign keys with their
/// delete action.
fn expected_schema() -> BTreeMap<&'static str, (Vec<(&'static str, bool)>, Vec<ForeignKey>)> {
    let fk = |from: &str, to: &str, on_delete: &str| ForeignKey {
        from_column: from.to_string(),
        to_table: to.to_string(),
        on_delete: on_delete.to_string(),
    };

    BTreeMap::from([
        (
            "principals",
            (
                vec![
                    ("principal_id", false),
                    ("first_name", false),
                    ("last_name", false),
                    ("email", true),
                    ("phone", true),
                    ("fiscal_code", true),
                    ("role", false),
                ],
                vec![],
            ),
        ),
        (
            "categories",
            (
                vec![("category_id", false), ("name", false), ("description", true)],
                vec![],
            ),
        ),
        (
            "support_services",
            (
                vec![("service_id", false), ("title", false), ("description", true)],
                vec![],
            ),
        ),
        (
            "tickets",
            (
                vec![
                    ("ticket_id", false),
                    ("title", true),
                    ("description", true),
                    ("priority", true),
                    ("status", false),
                    ("owner_id", false),
                    ("assignee_id", true),
                    ("category_id", true),
                    ("service_id", true),
                    ("contact_email", true),
                    ("contact_phone", true),
                    ("contact_fiscal_code", true),
                    ("created_at", false),
                    ("updated_at", false),
                    ("assigned_at", true),
                    ("solved_at", true),
                    ("version", false),
                ],
                vec![
                    fk("owner_id", "principals", "NO ACTION"),
                    fk("assignee_id", "principals", "NO ACTION"),
                    fk("category_id", "categories", "NO ACTION"),
                    fk("service_id", "support_services", "NO ACTION"),
                ],
            ),
        ),
        (
            "ticket_history",
            (
                vec![
                    ("history_id", false),
                    ("ticket_id", false),
                    ("previous_status", false),
                    ("new_status", false),
                    ("trigger_name", false),
                    ("actor_id", false),
                    ("actor_role", false),
                    ("note", true),
                    ("recorded_at", false),
                ],
                vec![
                    fk("ticket_id", "tickets", "CASCADE"),
                    fk("actor_id", "principals", "NO ACTION"),
                ],
            ),
        ),
    ])
}

/// Apply the migrations to an in-memory `SQLite` database and compare the
/// resulting schema against what the persistence layer expects.
///
/// Every difference is reported before the command fails.
fn verify_schema() -> Result<()> {
    tracing::info!("Applying migrations to a scratch database");
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;

    let actual: BTreeMap<String, TableShape> = introspect_schema(&mut conn)?;
    let mut problems: Vec<String> = Vec::new();

    for (table, (columns, foreign_keys)) in expected_schema() {
        let Some(shape) = actual.get(table) else {
            problems.push(format!("missing table {table}"));
            continue;
        };

        for (column, nullable) in columns {
            match shape.columns.get(column) {
                None => problems.push(format!("{table}: missing column {column}")),
                Some(actual_nullable) if *actual_nullable != nullable => problems.push(format!(
                    "{table}.{column}: nullable is {actual_nullable}, expected {nullable}"
                )),
                Some(_) => {}
            }
        }

        for foreign_key in foreign_keys {
            if !shape.foreign_keys.contains(&foreign_key) {
                problems.push(format!(
                    "{table}: missing foreign key {} -> {} (on delete {})",
                    foreign_key.from_column, foreign_key.to_table, foreign_key.on_delete
                ));
            }
        }
    }

    if problems.is_empty() {
        tracing::info!(tables = actual.len(), "Schema verification passed");
        return Ok(());
    }

    for problem in &problems {
        tracing::error!("{problem}");
    }
    Err(eyre!("Schema verification found {} problem(s)", problems.len()))
}

/// Read tables, columns and foreign keys back out of `SQLite`.
fn introspect_schema(conn: &mut SqliteConnection) -> Result<BTreeMap<String, TableShape>> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        on_delete: String,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list tables")?;

    let mut schema: BTreeMap<String, TableShape> = BTreeMap::new();
    for table in tables {
        let mut shape = TableShape::default();

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to read columns of {}", table.name))?;
        for column in columns {
            // SQLite reports INTEGER PRIMARY KEY columns as nullable.
            let nullable: bool = column.notnull == 0 && column.pk == 0;
            shape.columns.insert(column.name, nullable);
        }

        let foreign_keys: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to read foreign keys of {}", table.name))?;
        for foreign_key in foreign_keys {
            shape.foreign_keys.insert(ForeignKey {
                from_column: foreign_key.from,
                to_table: foreign_key.table,
                on_delete: foreign_key.on_delete,
            });
        }

        schema.insert(table.name, shape);
    }

    Ok(schema)
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
