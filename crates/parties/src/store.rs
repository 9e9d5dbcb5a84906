//! Persistence contract consumed by the identity rules and the service.

use std::sync::Arc;

use thiserror::Error;

use partyhub_core::PartyId;

use crate::identity::IdentityKey;
use crate::party::{Actor, NewParty, Party, PartyType};

/// Store failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("party not found: {0}")]
    NotFound(PartyId),

    /// Storage-level uniqueness backstop: another record already holds the key.
    #[error("identity already taken: {0}")]
    UniqueViolation(IdentityKey),

    #[error("storage error: {0}")]
    Backend(String),
}

/// Party persistence.
///
/// Implementations assign ids and audit fields, and reject a write whose identity key is
/// already held by a different record (`StoreError::UniqueViolation`).
#[async_trait::async_trait]
pub trait PartyStore: Send + Sync {
    async fn find_by_id(&self, id: PartyId) -> Result<Option<Party>, StoreError>;

    /// Exact `(first_name, party_name)` match among people.
    async fn find_by_name(
        &self,
        first_name: &str,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError>;

    /// Exact `party_name` match among organizations.
    async fn find_by_organization_name(
        &self,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError>;

    /// Case-insensitive substring search over first and party name, at most `limit` rows.
    async fn search_by_name(
        &self,
        term: &str,
        type_filter: Option<PartyType>,
        limit: usize,
    ) -> Result<Vec<Party>, StoreError>;

    /// Up to `limit` records in store order.
    async fn list(&self, limit: usize) -> Result<Vec<Party>, StoreError>;

    async fn insert(&self, party: NewParty, actor: &Actor) -> Result<Party, StoreError>;

    async fn update(&self, party: Party, actor: &Actor) -> Result<Party, StoreError>;

    /// Current holder of `key`, if any.
    async fn find_by_identity(&self, key: &IdentityKey) -> Result<Option<Party>, StoreError> {
        match key {
            IdentityKey::Person {
                first_name,
                party_name,
            } => self.find_by_name(first_name, party_name).await,
            IdentityKey::Organization { party_name } => {
                self.find_by_organization_name(party_name).await
            }
        }
    }
}

#[async_trait::async_trait]
impl<S> PartyStore for Arc<S>
where
    S: PartyStore + ?Sized,
{
    async fn find_by_id(&self, id: PartyId) -> Result<Option<Party>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError> {
        (**self).find_by_name(first_name, party_name).await
    }

    async fn find_by_organization_name(
        &self,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError> {
        (**self).find_by_organization_name(party_name).await
    }

    async fn search_by_name(
        &self,
        term: &str,
        type_filter: Option<PartyType>,
        limit: usize,
    ) -> Result<Vec<Party>, StoreError> {
        (**self).search_by_name(term, type_filter, limit).await
    }

    async fn list(&self, limit: usize) -> Result<Vec<Party>, StoreError> {
        (**self).list(limit).await
    }

    async fn insert(&self, party: NewParty, actor: &Actor) -> Result<Party, StoreError> {
        (**self).insert(party, actor).await
    }

    async fn update(&self, party: Party, actor: &Actor) -> Result<Party, StoreError> {
        (**self).update(party, actor).await
    }
}
