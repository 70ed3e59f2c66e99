// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Least-loaded assignee selection.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A candidate assignee and the number of active tickets they hold.
///
/// Load counts tickets in `OPEN` or `ANSWERED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeLoad {
    pub principal_id: String,
    pub load: u64,
}

impl AssigneeLoad {
    /// Creates a new load entry.
    #[must_use]
    pub const fn new(principal_id: String, load: u64) -> Self {
        Self { principal_id, load }
    }
}

/// Picks the candidate with the lowest load.
///
/// Ties are broken by principal id ascending so the result does not depend
/// on the order of `candidates`.
///
/// # Errors
///
/// Returns `DomainError::NoEligibleAssignee` if `candidates` is empty.
pub fn select_assignee(candidates: &[AssigneeLoad]) -> Result<String, DomainError> {
    candidates
        .iter()
        .min_by(|a, b| {
            a.load
                .cmp(&b.load)
                .then_with(|| a.principal_id.cmp(&b.principal_id))
        })
        .map(|candidate| candidate.principal_id.clone())
        .ok_or(DomainError::NoEligibleAssignee)
}
