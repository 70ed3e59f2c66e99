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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;
mod store;

#[cfg(test)]
mod tests;

pub use apply::{apply, apply_create};
pub use command::{AssigneeChoice, Command, TicketEdit};
pub use error::CoreError;
pub use state::TransitionResult;
pub use store::{
    CategoryCatalog, HistoryStore, LifecycleStore, StoreError, SupportServiceCatalog,
    TicketQuery, TicketSlice, TicketStore, Transactional, UserDirectory, Visibility,
};
