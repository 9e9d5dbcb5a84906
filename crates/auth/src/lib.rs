//! `partyhub-auth`: token validation and role-based authorization.
//!
//! Decoupled from HTTP and storage; the API layer extracts the bearer token and asks this
//! crate who the caller is and what they may do.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod roles;

pub use authorize::{authorize, AuthzError, Principal};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use partyhub_core::UserId as PrincipalId;
pub use permissions::Permission;
pub use roles::Role;
