// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_audit::HistoryEntry;
use helpdesk_domain::Ticket;

/// The result of a successful ticket transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
/// The caller persists `new_ticket` and `history_entry` together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The ticket after the transition.
    pub new_ticket: Ticket,
    /// The history entry recording the transition, if the status or assignee changed.
    pub history_entry: Option<HistoryEntry>,
}

impl TransitionResult {
    /// Returns true if the assignee differs from `previous`.
    #[must_use]
    pub fn assignee_changed_from(&self, previous: &Ticket) -> bool {
        self.new_ticket.assignee_id != previous.assignee_id
    }

    /// Returns true if the status differs from `previous`.
    #[must_use]
    pub fn status_changed_from(&self, previous: &Ticket) -> bool {
        self.new_ticket.status != previous.status
    }
}
