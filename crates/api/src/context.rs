use partyhub_auth::{PrincipalId, Role};
use partyhub_parties::Actor;

/// Principal context for a request (authenticated identity + roles).
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, roles: Vec<Role>) -> Self {
        Self { principal_id, roles }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Audit actor recorded on writes made by this principal.
    pub fn actor(&self) -> Actor {
        Actor::new(self.principal_id.to_string())
    }
}
