// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Console subcommands and their execution.

use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Subcommand};
use helpdesk::UserDirectory;
use helpdesk_api::{
    BroadcastNotifier, LifecycleService, ListFilters, PageRequest, TicketSubmission,
};
use helpdesk_domain::{Principal, Role, TicketPriority, TicketStatus, TokenClaims};
use helpdesk_persistence::Persistence;
use tracing::info;

use crate::error::CliError;
use crate::output::{self, Rendered};

type ConsoleService = LifecycleService<Persistence, BroadcastNotifier>;

/// Console subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a principal in the directory
    AddPrincipal {
        /// Identity-provider subject
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
        /// USER, `HELPER_JUNIOR`, `HELPER_SENIOR`, PM or ADMIN
        #[arg(long, default_value = "USER")]
        role: Role,
    },
    /// Resolve a principal from a decoded token claims file
    Login {
        /// JSON file holding the token claims
        claims: PathBuf,
        /// Client whose client-level roles apply
        #[arg(long, default_value = "helpdesk")]
        client_id: String,
    },
    /// Add a ticket category
    AddCategory {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Add a support service
    AddService {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    #[command(flatten)]
    Ticket(TicketCommand),
}

/// Commands run through the lifecycle service as the acting principal.
#[derive(Subcommand, Debug)]
pub enum TicketCommand {
    /// List categories and support services
    Catalog,
    /// Create a ticket, or edit one with `--ticket`
    Submit(SubmitArgs),
    /// Take an OPEN ticket
    Accept { ticket_id: i64 },
    /// Hand an OPEN ticket to another helper
    Reject {
        ticket_id: i64,
        #[arg(long)]
        to: String,
    },
    /// Hand an ANSWERED ticket back to another helper
    Escalate {
        ticket_id: i64,
        #[arg(long)]
        to: String,
    },
    /// Change a ticket's status
    Status {
        ticket_id: i64,
        status: TicketStatus,
    },
    /// Assign a ticket to a helper
    Assign { ticket_id: i64, assignee: String },
    /// Delete a ticket and its history
    Delete { ticket_id: i64 },
    /// Show a ticket and what the acting principal may do with it
    Show { ticket_id: i64 },
    /// List visible tickets
    List(ListArgs),
    /// Show a ticket's transition history
    History { ticket_id: i64 },
    /// Show ticket counts by status
    Counts,
    /// List eligible assignees and their current load
    Helpers,
}

#[derive(ClapArgs, Debug)]
pub struct SubmitArgs {
    /// Edit this ticket instead of creating one
    #[arg(long)]
    ticket: Option<i64>,
    /// Requested status
    #[arg(long, default_value = "OPEN")]
    status: TicketStatus,
    /// Owning USER, when submitting on someone's behalf
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    priority: Option<TicketPriority>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long)]
    service: Option<i64>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    fiscal_code: Option<String>,
    #[arg(long)]
    assignee: Option<String>,
}

impl From<SubmitArgs> for TicketSubmission {
    fn from(args: SubmitArgs) -> Self {
        Self {
            owner_id: args.owner,
            title: args.title,
            description: args.description,
            priority: args.priority,
            category_id: args.category,
            service_id: args.service,
            contact_email: args.email,
            contact_phone: args.phone,
            contact_fiscal_code: args.fiscal_code,
            status: args.status,
            assignee_id: args.assignee,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    assignee: Option<String>,
    #[arg(long)]
    status: Option<TicketStatus>,
    #[arg(long)]
    priority: Option<TicketPriority>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long)]
    service: Option<i64>,
    /// Match against title or description
    #[arg(long)]
    text: Option<String>,
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    page: u64,
    #[arg(long)]
    size: Option<u64>,
}

impl ListArgs {
    fn into_parts(self) -> (ListFilters, PageRequest) {
        let filters: ListFilters = ListFilters {
            owner_id: self.owner,
            assignee_id: self.assignee,
            status: self.status,
            priority: self.priority,
            category_id: self.category,
            service_id: self.service,
            text: self.text,
        };
        (filters, PageRequest::new(self.page, self.size))
    }
}

/// Runs one command and returns what should be printed.
///
/// Directory and catalog commands work on the store directly. Ticket
/// commands go through the lifecycle service as the principal named by
/// `acting_as`.
///
/// # Errors
///
/// Returns an error if the acting principal is missing or unknown, or if
/// the command itself fails.
pub fn execute(
    mut persistence: Persistence,
    notifier: BroadcastNotifier,
    acting_as: Option<&str>,
    command: Command,
    json: bool,
) -> Result<String, CliError> {
    let rendered: Rendered = match command {
        Command::AddPrincipal {
            id,
            first_name,
            last_name,
            email,
            role,
        } => {
            let principal: Principal = Principal::new(id, first_name, last_name, email, role);
            persistence.save_principal(&principal)?;
            info!(principal_id = %principal.principal_id, role = %principal.role, "Principal saved");
            Rendered::Principal(principal)
        }
        Command::AddCategory { name, description } => {
            let category_id: i64 = persistence.create_category(&name, description.as_deref())?;
            Rendered::Created {
                resource: "category",
                id: category_id,
            }
        }
        Command::AddService { title, description } => {
            let service_id: i64 =
                persistence.create_support_service(&title, description.as_deref())?;
            Rendered::Created {
                resource: "support service",
                id: service_id,
            }
        }
        Command::Login { claims, client_id } => {
            let claims: TokenClaims = read_claims(&claims)?;
            let service: ConsoleService = LifecycleService::new(persistence, notifier);
            Rendered::Principal(service.authenticate(&claims, &client_id)?)
        }
        Command::Ticket(command) => {
            let principal: Principal = acting_principal(&mut persistence, acting_as)?;
            let service: ConsoleService = LifecycleService::new(persistence, notifier);
            run_as(&service, &principal, command)?
        }
    };

    output::render(&rendered, json)
}

fn run_as(
    service: &ConsoleService,
    principal: &Principal,
    command: TicketCommand,
) -> Result<Rendered, CliError> {
    let rendered: Rendered = match command {
        TicketCommand::Catalog => Rendered::Catalog {
            categories: service.categories()?,
            services: service.support_services()?,
        },
        TicketCommand::Submit(args) => {
            let existing_id: Option<i64> = args.ticket;
            let submission: TicketSubmission = args.into();
            Rendered::Ticket(service.create_or_update(principal, &submission, existing_id)?)
        }
        TicketCommand::Accept { ticket_id } => {
            Rendered::Ticket(service.accept(principal, ticket_id)?)
        }
        TicketCommand::Reject { ticket_id, to } => {
            Rendered::Ticket(service.reject(principal, ticket_id, &to)?)
        }
        TicketCommand::Escalate { ticket_id, to } => {
            Rendered::Ticket(service.escalate(principal, ticket_id, &to)?)
        }
        TicketCommand::Status { ticket_id, status } => {
            Rendered::Ticket(service.change_status(principal, ticket_id, status)?)
        }
        TicketCommand::Assign {
            ticket_id,
            assignee,
        } => Rendered::Ticket(service.assign(principal, ticket_id, &assignee)?),
        TicketCommand::Delete { ticket_id } => {
            service.delete(principal, ticket_id)?;
            Rendered::Deleted { ticket_id }
        }
        TicketCommand::Show { ticket_id } => Rendered::TicketDetail {
            ticket: service.get(principal, ticket_id)?,
            capabilities: service.ticket_capabilities(principal, ticket_id)?,
        },
        TicketCommand::List(args) => {
            let (filters, page) = args.into_parts();
            Rendered::Tickets(service.list(principal, &filters, page)?)
        }
        TicketCommand::History { ticket_id } => {
            Rendered::History(service.history(principal, ticket_id)?)
        }
        TicketCommand::Counts => Rendered::Counts(service.dashboard_counts(principal)?),
        TicketCommand::Helpers => Rendered::Helpers {
            helpers: service.eligible_assignees()?,
            loads: service.assignee_loads()?,
        },
    };
    Ok(rendered)
}

fn acting_principal(
    persistence: &mut Persistence,
    acting_as: Option<&str>,
) -> Result<Principal, CliError> {
    let principal_id: &str = acting_as.ok_or(CliError::MissingPrincipal)?;
    persistence
        .find_principal(principal_id)?
        .ok_or_else(|| CliError::UnknownPrincipal(principal_id.to_string()))
}

fn read_claims(path: &Path) -> Result<TokenClaims, CliError> {
    let raw: String = std::fs::read_to_string(path)
        .map_err(|e| CliError::InvalidClaims(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| CliError::InvalidClaims(e.to_string()))
}
