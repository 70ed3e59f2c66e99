// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rendering of command results as text or JSON.

use std::fmt::Write;

use helpdesk_api::{DashboardCounts, Page, TicketCapabilities};
use helpdesk_audit::HistoryEntry;
use helpdesk_domain::{AssigneeLoad, Category, Principal, SupportService, Ticket};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::error::CliError;

/// The result of one command.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    Principal(Principal),
    Created {
        resource: &'static str,
        id: i64,
    },
    Catalog {
        categories: Vec<Category>,
        services: Vec<SupportService>,
    },
    Ticket(Ticket),
    TicketDetail {
        ticket: Ticket,
        capabilities: TicketCapabilities,
    },
    Deleted {
        ticket_id: i64,
    },
    Tickets(Page<Ticket>),
    History(Vec<HistoryEntry>),
    Counts(DashboardCounts),
    Helpers {
        helpers: Vec<Principal>,
        loads: Vec<AssigneeLoad>,
    },
}

/// Renders a result.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(rendered: &Rendered, json: bool) -> Result<String, CliError> {
    if json {
        return Ok(serde_json::to_string_pretty(rendered)?);
    }
    Ok(render_text(rendered))
}

fn render_text(rendered: &Rendered) -> String {
    match rendered {
        Rendered::Principal(p) => format!(
            "{} ({}) {} {} <{}>",
            p.principal_id,
            p.role,
            p.first_name,
            p.last_name,
            p.email.as_deref().unwrap_or("-")
        ),
        Rendered::Created { resource, id } => format!("Created {resource} {id}"),
        Rendered::Catalog {
            categories,
            services,
        } => {
            let mut out: String = String::from("Categories:\n");
            for c in categories {
                let _ = writeln!(out, "  {:>4}  {}", c.category_id, c.name);
            }
            out.push_str("Support services:\n");
            for s in services {
                let _ = writeln!(out, "  {:>4}  {}", s.service_id, s.title);
            }
            out.trim_end().to_string()
        }
        Rendered::Ticket(ticket) => ticket_line(ticket),
        Rendered::TicketDetail {
            ticket,
            capabilities,
        } => ticket_detail(ticket, capabilities),
        Rendered::Deleted { ticket_id } => format!("Deleted ticket {ticket_id}"),
        Rendered::Tickets(page) => {
            let mut out: String = String::new();
            for ticket in &page.items {
                let _ = writeln!(out, "{}", ticket_line(ticket));
            }
            let _ = write!(
                out,
                "Page {} of {} ({} tickets)",
                page.page + 1,
                page.total_pages.max(1),
                page.total
            );
            out
        }
        Rendered::History(entries) => {
            let lines: Vec<String> = entries.iter().map(history_line).collect();
            if lines.is_empty() {
                String::from("No history")
            } else {
                lines.join("\n")
            }
        }
        Rendered::Counts(counts) => format!(
            "total {}  draft {}  open {}  answered {}  solved {} ({:.1}%)",
            counts.total,
            counts.draft,
            counts.open,
            counts.answered,
            counts.solved,
            counts.solved_percentage()
        ),
        Rendered::Helpers { helpers, loads } => helpers
            .iter()
            .map(|h| {
                let load: u64 = loads
                    .iter()
                    .find(|l| l.principal_id == h.principal_id)
                    .map_or(0, |l| l.load);
                format!("{:<16} {:<14} load {load}", h.principal_id, h.role.as_str())
            })
            .collect::<Vec<String>>()
            .join("\n"),
    }
}

fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "#{} [{}] {} (owner {}, assignee {})",
        ticket.ticket_id.unwrap_or_default(),
        ticket.status,
        ticket.title.as_deref().unwrap_or("(untitled)"),
        ticket.owner_id,
        ticket.assignee_id.as_deref().unwrap_or("-")
    )
}

fn ticket_detail(ticket: &Ticket, capabilities: &TicketCapabilities) -> String {
    let mut out: String = ticket_line(ticket);
    if let Some(priority) = ticket.priority {
        let _ = write!(out, "\n  priority: {priority}");
    }
    if let Some(description) = &ticket.description {
        let _ = write!(out, "\n  {description}");
    }
    let allowed: Vec<&str> = [
        ("modify", capabilities.can_modify),
        ("accept", capabilities.can_accept),
        ("reject", capabilities.can_reject),
        ("escalate", capabilities.can_escalate),
        ("status", capabilities.can_change_status),
        ("assign", capabilities.can_assign),
        ("delete", capabilities.can_delete),
    ]
    .into_iter()
    .filter(|(_, capability)| capability.is_allowed())
    .map(|(name, _)| name)
    .collect();
    let _ = write!(out, "\n  you may: {}", allowed.join(", "));
    out
}

fn history_line(entry: &HistoryEntry) -> String {
    let at: String = entry
        .recorded_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| entry.recorded_at.to_string());
    format!(
        "{at}  {} -> {}  {} by {} ({})",
        entry.previous_status,
        entry.new_status,
        entry.trigger,
        entry.actor.principal_id,
        entry.actor.role
    )
}
