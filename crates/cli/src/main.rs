// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! `helpdesk` - operator console for the helpdesk ticket engine.
//!
//! Every invocation opens the store, runs one command as the principal
//! named by `--as`, prints the result and exits. Notifications raised by
//! the command are logged as they are delivered.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use helpdesk_api::{BroadcastNotifier, Notification};
use helpdesk_persistence::Persistence;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::commands::Command;
use crate::error::CliError;

/// Helpdesk operator console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an in-memory database.
    #[arg(short, long, global = true, env = "HELPDESK_DATABASE")]
    database: Option<PathBuf>,

    /// Principal id to act as
    #[arg(long = "as", global = true, value_name = "PRINCIPAL_ID")]
    acting_as: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn open_store(database: Option<&PathBuf>) -> Result<Persistence, CliError> {
    let persistence: Persistence = if let Some(db_path) = database {
        info!(path = %db_path.display(), "Using file-based database");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

async fn log_notifications(mut rx: broadcast::Receiver<Notification>) {
    loop {
        match rx.recv().await {
            Ok(notification) => {
                info!(
                    kind = ?notification.kind,
                    ticket_id = notification.ticket_id,
                    status = %notification.status,
                    recipient = %notification.recipient_email,
                    "Notification"
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Notification log fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Notification channel closed");
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let notifier: BroadcastNotifier = BroadcastNotifier::new();
    let listener = tokio::spawn(log_notifications(notifier.subscribe()));

    // The service, and with it the last sender, is dropped when the
    // blocking task returns, which ends the listener.
    let outcome = tokio::task::spawn_blocking(move || {
        let persistence: Persistence = open_store(args.database.as_ref())?;
        commands::execute(
            persistence,
            notifier,
            args.acting_as.as_deref(),
            args.command,
            args.json,
        )
    })
    .await;

    if let Err(e) = listener.await {
        warn!(error = %e, "Notification listener failed");
    }

    match outcome {
        Ok(Ok(rendered)) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!(kind = e.kind(), "{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            error!(error = %e, "Command task failed");
            ExitCode::FAILURE
        }
    }
}
