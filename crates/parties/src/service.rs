//! Party service: orchestrates identity rules and persistence for each request.

use tracing::{debug, info, warn};

use partyhub_core::{PartyId, ValueObject};

use crate::error::PartyError;
use crate::fields::PartyFields;
use crate::identity::PartyIdentityRules;
use crate::party::{Actor, Party, PartyType};
use crate::store::PartyStore;

/// Default cap on list/search results.
pub const PARTY_LIST_RESULT_LIMIT: usize = 25;

/// List/search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Substring searched verbatim in first and party name. Empty means no search.
    pub search: Option<String>,
    /// `PER` or `ORG` (any case). Any other value is ignored.
    pub type_filter: Option<String>,
    /// Result cap; the service default when `None`.
    pub limit: Option<usize>,
}

/// Party operations: get, list/search, create, update.
///
/// Validation failures never reach the store: a rejected create or update makes no write.
pub struct PartyService<S> {
    store: S,
    list_limit: usize,
}

impl<S> PartyService<S>
where
    S: PartyStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            list_limit: PARTY_LIST_RESULT_LIMIT,
        }
    }

    /// Override the default result cap.
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn rules(&self) -> PartyIdentityRules<'_, S> {
        PartyIdentityRules::new(&self.store)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: PartyId) -> Result<Party, PartyError> {
        debug!("loading party");
        self.store.find_by_id(id).await?.ok_or(PartyError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Party>, PartyError> {
        let limit = query.limit.unwrap_or(self.list_limit);

        let parties = match query.search.as_deref().filter(|term| !term.is_empty()) {
            Some(term) => {
                let type_filter = query.type_filter.as_deref().and_then(PartyType::from_code);
                self.store.search_by_name(term, type_filter, limit).await?
            }
            None => self.store.list(limit).await?,
        };

        debug!(count = parties.len(), "listed parties");
        Ok(parties)
    }

    #[tracing::instrument(skip(self, request), fields(party_type = ?request.party_type))]
    pub async fn create(&self, request: PartyFields, actor: &Actor) -> Result<Party, PartyError> {
        let candidate = self.rules().validate_create(&request).await.inspect_err(|e| {
            if matches!(e, PartyError::Duplicate(_)) {
                warn!(error = %e, "rejected duplicate party");
            }
        })?;

        let party = self
            .store
            .insert(candidate, actor)
            .await
            .map_err(PartyError::from)
            .inspect_err(|e| warn!(error = %e, "party insert failed"))?;

        info!(
            party_id = %party.id_typed(),
            party_type = %party.party_type(),
            has_contact = !party.contact().is_empty(),
            has_address = !party.address().is_empty(),
            "party created"
        );
        Ok(party)
    }

    /// Update the identity fields (first/party name) of an existing party.
    ///
    /// Contact and address fields in `request` are not applied.
    #[tracing::instrument(skip(self, request), fields(party_type = ?request.party_type))]
    pub async fn update(
        &self,
        id: PartyId,
        request: PartyFields,
        actor: &Actor,
    ) -> Result<Party, PartyError> {
        let mut existing = self.get(id).await?;

        let change = self
            .rules()
            .validate_update(
                &existing,
                request.party_type.as_deref(),
                request.first_name.as_deref(),
                request.party_name.as_deref(),
            )
            .await
            .inspect_err(|e| {
                if matches!(e, PartyError::Duplicate(_)) {
                    warn!(error = %e, "rejected duplicate party rename");
                }
            })?;

        existing.apply_identity(change);
        let party = self
            .store
            .update(existing, actor)
            .await
            .map_err(PartyError::from)
            .inspect_err(|e| warn!(error = %e, "party update failed"))?;

        info!(party_id = %party.id_typed(), "party updated");
        Ok(party)
    }
}
