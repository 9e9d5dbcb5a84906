//! Runs against a live database: `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use partyhub_infra::PostgresPartyStore;
use partyhub_parties::{Actor, PartyError, PartyFields, PartyService, PartyStore, StoreError};
use uuid::Uuid;

async fn store() -> PostgresPartyStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    PostgresPartyStore::connect(&url).await.unwrap()
}

fn organization(name: &str) -> PartyFields {
    PartyFields {
        party_type: Some("ORG".to_string()),
        party_name: Some(name.to_string()),
        ..PartyFields::default()
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn create_then_find_and_reject_duplicate() {
    let svc = PartyService::new(Arc::new(store().await));
    let name = format!("Acme {}", Uuid::now_v7());
    let actor = Actor::new("pg-test");

    let created = svc.create(organization(&name), &actor).await.unwrap();
    let found = svc.get(created.id_typed()).await.unwrap();
    assert_eq!(found.party_name(), name);

    let err = svc.create(organization(&name), &actor).await.unwrap_err();
    assert!(matches!(err, PartyError::Duplicate(_)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unique_index_backstops_a_raced_insert() {
    let store = store().await;
    let name = format!("Race {}", Uuid::now_v7());
    let actor = Actor::new("pg-test");

    let candidate = partyhub_parties::NewParty {
        party_type: partyhub_parties::PartyType::Organization,
        first_name: None,
        party_name: name,
        contact: Default::default(),
        address: Default::default(),
    };

    store.insert(candidate.clone(), &actor).await.unwrap();
    let err = store.insert(candidate, &actor).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn search_treats_wildcards_literally() {
    let store = store().await;
    let tag = Uuid::now_v7().simple().to_string();
    let svc = PartyService::new(Arc::new(store));
    let actor = Actor::new("pg-test");

    svc.create(organization(&format!("100% Mining {tag}")), &actor)
        .await
        .unwrap();
    svc.create(organization(&format!("1000 Mining {tag}")), &actor)
        .await
        .unwrap();

    let found = svc
        .list(partyhub_parties::ListQuery {
            search: Some(format!("100% mining {tag}")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}
