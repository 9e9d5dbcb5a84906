//! API-side authorization guard.
//!
//! Checked in each handler before the party service is called, so a forbidden request
//! never reaches validation or the store.

use partyhub_auth::{AuthzError, Permission, Principal, authorize};

use crate::context::PrincipalContext;

/// Check that the current principal holds `required`.
pub fn authorize_request(
    principal: &PrincipalContext,
    required: &Permission,
) -> Result<(), AuthzError> {
    let principal = Principal::from_roles(principal.principal_id(), principal.roles().to_vec());
    authorize(&principal, required)
}
