use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, PrincipalId, Role};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl Principal {
    /// Resolve effective permissions from the subject's roles.
    pub fn from_roles(principal_id: PrincipalId, roles: Vec<Role>) -> Self {
        let mut seen = HashSet::new();
        let permissions = roles
            .iter()
            .flat_map(Role::permissions)
            .filter(|p| seen.insert(p.clone()))
            .collect();

        Self {
            principal_id,
            roles,
            permissions,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Pure policy check: no IO, no panics.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = principal
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn principal(roles: &[&'static str]) -> Principal {
        Principal::from_roles(
            PrincipalId::new(),
            roles.iter().map(|r| Role::new(*r)).collect(),
        )
    }

    #[test]
    fn admin_wildcard_grants_everything() {
        let admin = principal(&["admin"]);
        assert_eq!(authorize(&admin, &Permission::PARTIES_CREATE), Ok(()));
        assert_eq!(authorize(&admin, &Permission::new("anything.else")), Ok(()));
    }

    #[test]
    fn viewer_is_forbidden_to_create() {
        let viewer = principal(&["mine_view"]);
        assert_eq!(authorize(&viewer, &Permission::PARTIES_VIEW), Ok(()));
        assert_eq!(
            authorize(&viewer, &Permission::PARTIES_CREATE),
            Err(AuthzError::Forbidden("parties.create".to_string()))
        );
    }

    #[test]
    fn overlapping_roles_do_not_duplicate_permissions() {
        let p = principal(&["mine_view", "mine_create"]);
        assert_eq!(
            p.permissions,
            vec![Permission::PARTIES_VIEW, Permission::PARTIES_CREATE]
        );
    }

    proptest! {
        #[test]
        fn unknown_roles_grant_nothing(role in "[a-z_]{1,12}", perm in "[a-z]{1,8}\\.[a-z]{1,8}") {
            let known = [Role::ADMIN, Role::MINE_VIEW, Role::MINE_CREATE];
            prop_assume!(!known.contains(&role.as_str()));
            let p = Principal::from_roles(PrincipalId::new(), vec![Role::new(role)]);
            prop_assert!(authorize(&p, &Permission::new(perm)).is_err());
        }
    }
}
