use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles arrive as opaque strings in the token; [`Role::permissions`] is the
/// role-to-permission table. Unknown roles grant nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const MINE_VIEW: &'static str = "mine_view";
    pub const MINE_CREATE: &'static str = "mine_create";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Permissions granted by this role.
    pub fn permissions(&self) -> Vec<Permission> {
        match self.as_str() {
            Self::ADMIN => vec![Permission::WILDCARD],
            Self::MINE_VIEW => vec![Permission::PARTIES_VIEW],
            Self::MINE_CREATE => vec![Permission::PARTIES_VIEW, Permission::PARTIES_CREATE],
            _ => Vec::new(),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
