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

//! Service boundary of the helpdesk.
//!
//! Callers hand an explicit [`helpdesk_domain::Principal`] to every
//! [`LifecycleService`] operation. There is no ambient current user.

mod auth;
mod capabilities;
mod error;
mod lifecycle;
mod notification;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationPolicy, Operation};
pub use capabilities::compute_ticket_capabilities;
pub use error::{
    AuthError, DenyReason, ErrorKind, LifecycleError, translate_core_error,
    translate_domain_error,
};
pub use lifecycle::{LifecycleService, ServiceConfig};
pub use notification::{
    BroadcastNotifier, Notification, NotificationDispatcher, NotificationError, NotificationKind,
};
pub use request_response::{
    Capability, DashboardCounts, ListFilters, Page, PageRequest, TicketCapabilities,
    TicketSubmission,
};
