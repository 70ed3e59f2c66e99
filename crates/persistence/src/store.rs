// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage trait implementations for [`Persistence`].

use std::collections::BTreeMap;

use helpdesk::{
    CategoryCatalog, HistoryStore, StoreError, SupportServiceCatalog, TicketQuery, TicketSlice,
    TicketStore, Transactional, UserDirectory, Visibility,
};
use helpdesk_audit::HistoryEntry;
use helpdesk_domain::{
    AssigneeLoad, Category, Principal, Role, SupportService, Ticket, TicketStatus,
};
use tracing::warn;

use crate::{Persistence, backend, mutations, queries};

impl UserDirectory for Persistence {
    fn find_principal(&mut self, principal_id: &str) -> Result<Option<Principal>, StoreError> {
        Ok(queries::principals::get_principal(&mut self.conn, principal_id)?)
    }

    fn find_principal_by_email(&mut self, email: &str) -> Result<Option<Principal>, StoreError> {
        Ok(queries::principals::get_principal_by_email(
            &mut self.conn,
            email,
        )?)
    }

    fn find_principals_by_roles(&mut self, roles: &[Role]) -> Result<Vec<Principal>, StoreError> {
        Ok(queries::principals::list_principals_by_roles(
            &mut self.conn,
            roles,
        )?)
    }

    fn save_principal(&mut self, principal: &Principal) -> Result<(), StoreError> {
        Ok(mutations::principals::upsert_principal(
            &mut self.conn,
            principal,
        )?)
    }
}

impl CategoryCatalog for Persistence {
    fn find_category(&mut self, category_id: i64) -> Result<Option<Category>, StoreError> {
        Ok(queries::catalog::get_category(&mut self.conn, category_id)?)
    }

    fn list_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        Ok(queries::catalog::list_categories(&mut self.conn)?)
    }
}

impl SupportServiceCatalog for Persistence {
    fn find_support_service(
        &mut self,
        service_id: i64,
    ) -> Result<Option<SupportService>, StoreError> {
        Ok(queries::catalog::get_support_service(
            &mut self.conn,
            service_id,
        )?)
    }

    fn list_support_services(&mut self) -> Result<Vec<SupportService>, StoreError> {
        Ok(queries::catalog::list_support_services(&mut self.conn)?)
    }
}

impl TicketStore for Persistence {
    fn find_ticket(&mut self, ticket_id: i64) -> Result<Option<Ticket>, StoreError> {
        Ok(queries::tickets::get_ticket(&mut self.conn, ticket_id)?)
    }

    fn insert_ticket(&mut self, ticket: &Ticket) -> Result<i64, StoreError> {
        Ok(mutations::tickets::insert_ticket(&mut self.conn, ticket)?)
    }

    fn save_ticket(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
        Ok(mutations::tickets::update_ticket(&mut self.conn, ticket)?)
    }

    fn delete_ticket(&mut self, ticket_id: i64) -> Result<(), StoreError> {
        Ok(mutations::tickets::delete_ticket(&mut self.conn, ticket_id)?)
    }

    fn query_tickets(&mut self, query: &TicketQuery) -> Result<TicketSlice, StoreError> {
        Ok(queries::tickets::query_tickets(&mut self.conn, query)?)
    }

    fn count_statuses(
        &mut self,
        visibility: &Visibility,
    ) -> Result<BTreeMap<TicketStatus, u64>, StoreError> {
        Ok(queries::tickets::count_statuses(&mut self.conn, visibility)?)
    }

    fn active_assignment_counts(
        &mut self,
        principal_ids: &[String],
    ) -> Result<Vec<AssigneeLoad>, StoreError> {
        Ok(queries::tickets::active_assignment_counts(
            &mut self.conn,
            principal_ids,
        )?)
    }
}

impl HistoryStore for Persistence {
    fn append_history(&mut self, entry: &HistoryEntry) -> Result<i64, StoreError> {
        Ok(mutations::history::append_history(&mut self.conn, entry)?)
    }

    fn list_history(&mut self, ticket_id: i64) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(queries::history::list_history(&mut self.conn, ticket_id)?)
    }

    fn delete_history(&mut self, ticket_id: i64) -> Result<usize, StoreError> {
        Ok(mutations::history::delete_history(&mut self.conn, ticket_id)?)
    }
}

impl Transactional for Persistence {
    fn in_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        backend::sqlite::begin_immediate(&mut self.conn)
            .map_err(|e| E::from(StoreError::from(e)))?;

        match f(self) {
            Ok(value) => {
                backend::sqlite::commit(&mut self.conn)
                    .map_err(|e| E::from(StoreError::from(e)))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = backend::sqlite::rollback(&mut self.conn) {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}
