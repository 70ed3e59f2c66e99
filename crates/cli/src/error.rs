// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk::StoreError;
use helpdesk_api::{ErrorKind, LifecycleError};
use helpdesk_persistence::PersistenceError;

/// Errors surfaced by the console.
#[derive(Debug)]
pub enum CliError {
    /// A lifecycle operation failed.
    Lifecycle(LifecycleError),
    /// The database could not be opened or seeded.
    Persistence(PersistenceError),
    /// A direct store lookup failed.
    Store(StoreError),
    /// The command needs `--as`.
    MissingPrincipal,
    /// `--as` names nobody the directory knows.
    UnknownPrincipal(String),
    /// A claims file could not be read or parsed.
    InvalidClaims(String),
    /// The result could not be rendered.
    Output(serde_json::Error),
}

impl CliError {
    /// Returns a short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lifecycle(e) => e.kind().as_str(),
            Self::Persistence(_) | Self::Store(_) => "STORAGE",
            Self::MissingPrincipal | Self::UnknownPrincipal(_) => "PRINCIPAL",
            Self::InvalidClaims(_) => "CLAIMS",
            Self::Output(_) => "OUTPUT",
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// Lifecycle failures get one code per error kind so scripts can tell
    /// a refusal from a missing ticket.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Lifecycle(e) => match e.kind() {
                ErrorKind::NotFound => 3,
                ErrorKind::ValidationFailed => 4,
                ErrorKind::Unauthorized => 5,
                ErrorKind::InvalidTransition => 6,
                ErrorKind::NoEligibleAssignee => 7,
                ErrorKind::ConflictingAssignment => 8,
                ErrorKind::Internal => 1,
            },
            Self::MissingPrincipal | Self::UnknownPrincipal(_) | Self::InvalidClaims(_) => 2,
            Self::Persistence(_) | Self::Store(_) | Self::Output(_) => 1,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lifecycle(e) => write!(f, "{e}"),
            Self::Persistence(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::MissingPrincipal => write!(f, "This command needs an acting principal (--as)"),
            Self::UnknownPrincipal(id) => write!(f, "Unknown principal: {id}"),
            Self::InvalidClaims(msg) => write!(f, "Invalid claims: {msg}"),
            Self::Output(e) => write!(f, "Failed to render output: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<LifecycleError> for CliError {
    fn from(err: LifecycleError) -> Self {
        Self::Lifecycle(err)
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err)
    }
}
