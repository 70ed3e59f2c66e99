// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to and from domain values.
//!
//! Enumerations are stored by their upper-case names. Timestamps are stored
//! as fixed-width RFC 3339 text in UTC so that text order is time order.

use diesel::prelude::*;
use helpdesk_audit::{Actor, HistoryEntry};
use helpdesk_domain::{
    Category, ContactInfo, Principal, Role, SupportService, Ticket, TicketPriority, TicketStatus,
    Trigger,
};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{categories, principals, support_services, ticket_history, tickets};
use crate::error::PersistenceError;

const STORAGE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.to_offset(UtcOffset::UTC).format(STORAGE_FORMAT)?)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?)
}

fn format_optional(value: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

fn parse_optional(value: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

/// Diesel row for principals; also used for upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = principals)]
#[diesel(primary_key(principal_id))]
#[diesel(treat_none_as_null = true)]
pub struct PrincipalRow {
    pub principal_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fiscal_code: Option<String>,
    pub role: String,
}

impl PrincipalRow {
    #[must_use]
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            principal_id: principal.principal_id.clone(),
            first_name: principal.first_name.clone(),
            last_name: principal.last_name.clone(),
            email: principal.email.clone(),
            phone: principal.phone.clone(),
            fiscal_code: principal.fiscal_code.clone(),
            role: principal.role.as_str().to_string(),
        }
    }

    pub fn into_principal(self) -> Result<Principal, PersistenceError> {
        let role: Role = self.role.parse()?;
        let mut principal: Principal = Principal::new(
            self.principal_id,
            self.first_name,
            self.last_name,
            self.email,
            role,
        );
        principal.phone = self.phone;
        principal.fiscal_code = self.fiscal_code;
        Ok(principal)
    }
}

/// Diesel row for categories.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
pub struct CategoryRow {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            category_id: row.category_id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Diesel row for support services.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = support_services)]
pub struct SupportServiceRow {
    pub service_id: i64,
    pub title: String,
    pub description: Option<String>,
}

impl From<SupportServiceRow> for SupportService {
    fn from(row: SupportServiceRow) -> Self {
        Self {
            service_id: row.service_id,
            title: row.title,
            description: row.description,
        }
    }
}

/// Diesel row for tickets as read back.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub assignee_id: Option<String>,
    pub category_id: Option<i64>,
    pub service_id: Option<i64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_fiscal_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub assigned_at: Option<String>,
    pub solved_at: Option<String>,
    pub version: i64,
}

impl TicketRow {
    pub fn into_ticket(self) -> Result<Ticket, PersistenceError> {
        let priority: Option<TicketPriority> = self
            .priority
            .as_deref()
            .map(str::parse::<TicketPriority>)
            .transpose()?;

        Ok(Ticket {
            ticket_id: Some(self.ticket_id),
            title: self.title,
            description: self.description,
            priority,
            status: self.status.parse::<TicketStatus>()?,
            owner_id: self.owner_id,
            assignee_id: self.assignee_id,
            category_id: self.category_id,
            service_id: self.service_id,
            contact: ContactInfo {
                email: self.contact_email,
                phone: self.contact_phone,
                fiscal_code: self.contact_fiscal_code,
            },
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            assigned_at: parse_optional(self.assigned_at.as_deref())?,
            solved_at: parse_optional(self.solved_at.as_deref())?,
            version: self.version,
        })
    }
}

/// Writable ticket columns, shared by insert and update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tickets)]
#[diesel(treat_none_as_null = true)]
pub struct TicketRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub assignee_id: Option<String>,
    pub category_id: Option<i64>,
    pub service_id: Option<i64>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_fiscal_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub assigned_at: Option<String>,
    pub solved_at: Option<String>,
    pub version: i64,
}

impl TicketRecord {
    pub fn from_ticket(ticket: &Ticket) -> Result<Self, PersistenceError> {
        Ok(Self {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority.map(|p| p.as_str().to_string()),
            status: ticket.status.as_str().to_string(),
            owner_id: ticket.owner_id.clone(),
            assignee_id: ticket.assignee_id.clone(),
            category_id: ticket.category_id,
            service_id: ticket.service_id,
            contact_email: ticket.contact.email.clone(),
            contact_phone: ticket.contact.phone.clone(),
            contact_fiscal_code: ticket.contact.fiscal_code.clone(),
            created_at: format_timestamp(ticket.created_at)?,
            updated_at: format_timestamp(ticket.updated_at)?,
            assigned_at: format_optional(ticket.assigned_at)?,
            solved_at: format_optional(ticket.solved_at)?,
            version: ticket.version,
        })
    }
}

/// Diesel row for history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ticket_history)]
pub struct HistoryRow {
    pub history_id: i64,
    pub ticket_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub trigger_name: String,
    pub actor_id: String,
    pub actor_role: String,
    pub note: Option<String>,
    pub recorded_at: String,
}

impl HistoryRow {
    pub fn into_entry(self) -> Result<HistoryEntry, PersistenceError> {
        let actor: Actor = Actor::new(self.actor_id, self.actor_role.parse::<Role>()?);
        let mut entry: HistoryEntry = HistoryEntry::new(
            Some(self.ticket_id),
            self.previous_status.parse::<TicketStatus>()?,
            self.new_status.parse::<TicketStatus>()?,
            self.trigger_name.parse::<Trigger>()?,
            actor,
            self.note,
            parse_timestamp(&self.recorded_at)?,
        );
        entry.history_id = Some(self.history_id);
        Ok(entry)
    }
}

/// Insertable history columns.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_history)]
pub struct HistoryRecord {
    pub ticket_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub trigger_name: String,
    pub actor_id: String,
    pub actor_role: String,
    pub note: Option<String>,
    pub recorded_at: String,
}

impl HistoryRecord {
    pub fn from_entry(entry: &HistoryEntry) -> Result<Self, PersistenceError> {
        let ticket_id: i64 = entry
            .ticket_id
            .ok_or(PersistenceError::MissingId("history entry ticket"))?;

        Ok(Self {
            ticket_id,
            previous_status: entry.previous_status.as_str().to_string(),
            new_status: entry.new_status.as_str().to_string(),
            trigger_name: entry.trigger.as_str().to_string(),
            actor_id: entry.actor.principal_id.clone(),
            actor_role: entry.actor.role.as_str().to_string(),
            note: entry.note.clone(),
            recorded_at: format_timestamp(entry.recorded_at)?,
        })
    }
}
