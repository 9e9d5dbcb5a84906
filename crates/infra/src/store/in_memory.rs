use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use partyhub_core::{Entity, PartyId};
use partyhub_parties::{
    Actor, Audit, IdentityKey, NewParty, Party, PartyStore, PartyType, StoreError,
};

/// In-memory party store for tests/dev.
///
/// Records keep insertion order, which is the store's default listing order. Identity
/// uniqueness is re-checked under the write lock, so concurrent identical creates cannot
/// both land.
#[derive(Debug, Default)]
pub struct InMemoryPartyStore {
    inner: RwLock<Vec<Party>>,
}

impl InMemoryPartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Party>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("party store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Party>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("party store lock poisoned".to_string()))
    }

    fn find_holder<'a>(parties: &'a [Party], key: &IdentityKey) -> Option<&'a Party> {
        parties.iter().find(|p| key.is_held_by(p))
    }
}

#[async_trait::async_trait]
impl PartyStore for InMemoryPartyStore {
    async fn find_by_id(&self, id: PartyId) -> Result<Option<Party>, StoreError> {
        Ok(self.read()?.iter().find(|p| *p.id() == id).cloned())
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError> {
        let key = IdentityKey::new(PartyType::Person, Some(first_name), party_name);
        Ok(Self::find_holder(&self.read()?, &key).cloned())
    }

    async fn find_by_organization_name(
        &self,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError> {
        let key = IdentityKey::new(PartyType::Organization, None, party_name);
        Ok(Self::find_holder(&self.read()?, &key).cloned())
    }

    async fn search_by_name(
        &self,
        term: &str,
        type_filter: Option<PartyType>,
        limit: usize,
    ) -> Result<Vec<Party>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .read()?
            .iter()
            .filter(|p| type_filter.is_none_or(|t| p.party_type() == t))
            .filter(|p| p.matches_search(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Party>, StoreError> {
        Ok(self.read()?.iter().take(limit).cloned().collect())
    }

    async fn insert(&self, party: NewParty, actor: &Actor) -> Result<Party, StoreError> {
        let mut parties = self.write()?;

        let key = party.identity_key();
        if Self::find_holder(&parties, &key).is_some() {
            return Err(StoreError::UniqueViolation(key));
        }

        let party = party.into_party(PartyId::new(), Audit::created(actor, Utc::now()));
        parties.push(party.clone());
        Ok(party)
    }

    async fn update(&self, mut party: Party, actor: &Actor) -> Result<Party, StoreError> {
        let mut parties = self.write()?;

        let id = *party.id();
        let key = party.identity_key();
        if parties.iter().any(|p| *p.id() != id && key.is_held_by(p)) {
            return Err(StoreError::UniqueViolation(key));
        }

        let slot = parties
            .iter_mut()
            .find(|p| *p.id() == id)
            .ok_or(StoreError::NotFound(id))?;

        party.stamp_update(actor, Utc::now());
        *slot = party.clone();
        Ok(party)
    }
}
