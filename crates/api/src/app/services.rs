//! Service wiring: picks the party store backend and builds the party service over it.

use std::sync::Arc;

use anyhow::Context;

use partyhub_infra::{AppConfig, InMemoryPartyStore, PostgresPartyStore, StoreBackend};
use partyhub_parties::{PartyService, PartyStore};

pub type DynPartyStore = Arc<dyn PartyStore>;

/// Shared state handed to every protected handler.
pub struct AppServices {
    pub parties: PartyService<DynPartyStore>,
}

impl AppServices {
    pub fn new(store: DynPartyStore, list_limit: usize) -> Self {
        Self {
            parties: PartyService::new(store).with_list_limit(list_limit),
        }
    }

    /// In-memory services for dev and tests.
    pub fn in_memory(list_limit: usize) -> Self {
        Self::new(Arc::new(InMemoryPartyStore::new()), list_limit)
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory party store");
            Ok(AppServices::in_memory(config.list_limit))
        }
        StoreBackend::Postgres { database_url } => {
            tracing::info!("using postgres party store");
            let store = PostgresPartyStore::connect(database_url)
                .await
                .context("connecting to postgres party store")?;
            Ok(AppServices::new(Arc::new(store), config.list_limit))
        }
    }
}
