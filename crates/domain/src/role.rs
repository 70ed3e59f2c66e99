// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal roles and role resolution from identity-provider tokens.
//!
//! The identity provider hands out nested claims (realm-level and
//! client-level role lists). Those are flattened into a closed [`RoleSet`]
//! here so nothing else in the system has to look at raw claims.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::Principal;

/// Roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Submits tickets and follows their own tickets.
    User,
    /// First-line support.
    HelperJunior,
    /// Second-line support, usually the target of escalations.
    HelperSenior,
    /// Project manager: may assign and override tickets.
    Pm,
    /// Administrator: full authority over every ticket.
    Admin,
}

/// Roles whose holders may be assigned tickets.
pub const ELIGIBLE_ASSIGNEE_ROLES: [Role; 4] =
    [Role::HelperJunior, Role::HelperSenior, Role::Pm, Role::Admin];

/// Order in which token roles collapse into the single stored role.
const ROLE_PRECEDENCE: [Role; 4] = [Role::Admin, Role::HelperJunior, Role::HelperSenior, Role::Pm];

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::HelperJunior => "HELPER_JUNIOR",
            Self::HelperSenior => "HELPER_SENIOR",
            Self::Pm => "PM",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns true if principals with this role may be assigned tickets.
    #[must_use]
    pub const fn is_eligible_assignee(&self) -> bool {
        !matches!(self, Self::User)
    }

    /// Returns true for roles with assignment and override authority.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self, Self::Admin | Self::Pm)
    }

    /// Returns true for the helper roles.
    #[must_use]
    pub const fn is_helper(&self) -> bool {
        matches!(self, Self::HelperJunior | Self::HelperSenior)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "HELPER_JUNIOR" => Ok(Self::HelperJunior),
            "HELPER_SENIOR" => Ok(Self::HelperSenior),
            "PM" => Ok(Self::Pm),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of roles granted to an authenticated principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: BTreeSet<Role>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roles: BTreeSet::new(),
        }
    }

    /// Adds a role to the set.
    pub fn insert(&mut self, role: Role) {
        self.roles.insert(role);
    }

    /// Checks if the set grants a role.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if no known role was granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterates over the granted roles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Collapses the set into the single role stored on the principal.
    ///
    /// Precedence is ADMIN, `HELPER_JUNIOR`, `HELPER_SENIOR`, PM; a set with
    /// none of these resolves to USER.
    #[must_use]
    pub fn primary_role(&self) -> Role {
        ROLE_PRECEDENCE
            .into_iter()
            .find(|role| self.contains(*role))
            .unwrap_or(Role::User)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

/// A role list inside a token claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaim {
    /// Raw role names.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The subset of identity-provider claims the engine consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Stable principal identifier.
    pub sub: String,
    /// First name.
    #[serde(default)]
    pub given_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub family_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Realm-level roles.
    #[serde(default)]
    pub realm_access: Option<RoleClaim>,
    /// Client-level roles keyed by client id.
    #[serde(default)]
    pub resource_access: BTreeMap<String, RoleClaim>,
}

/// Resolves the role set granted by a token.
///
/// Realm-level roles and the roles of `client_id` are merged. Role names
/// the engine does not know are ignored.
///
/// # Arguments
///
/// * `claims` - The decoded token claims
/// * `client_id` - The client whose client-level roles apply
#[must_use]
pub fn resolve_roles(claims: &TokenClaims, client_id: &str) -> RoleSet {
    let realm_roles = claims
        .realm_access
        .iter()
        .flat_map(|claim| claim.roles.iter());
    let client_roles = claims
        .resource_access
        .get(client_id)
        .into_iter()
        .flat_map(|claim| claim.roles.iter());

    realm_roles
        .chain(client_roles)
        .filter_map(|name| name.parse::<Role>().ok())
        .collect()
}

/// Builds the principal described by a token.
///
/// The stored role is the primary role of the resolved role set. Phone and
/// fiscal code are not carried by tokens and start out empty.
///
/// # Arguments
///
/// * `claims` - The decoded token claims
/// * `client_id` - The client whose client-level roles apply
#[must_use]
pub fn principal_from_claims(claims: &TokenClaims, client_id: &str) -> Principal {
    let role: Role = resolve_roles(claims, client_id).primary_role();
    Principal {
        principal_id: claims.sub.clone(),
        first_name: claims.given_name.clone().unwrap_or_default(),
        last_name: claims.family_name.clone().unwrap_or_default(),
        email: claims.email.clone(),
        phone: None,
        fiscal_code: None,
        role,
    }
}
