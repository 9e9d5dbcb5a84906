use std::sync::Arc;

use partyhub_core::PartyId;
use partyhub_infra::InMemoryPartyStore;
use partyhub_parties::{
    Actor, IdentityKey, ListQuery, PartyError, PartyFields, PartyService, PartyStore, PartyType,
};

fn service() -> PartyService<Arc<InMemoryPartyStore>> {
    PartyService::new(Arc::new(InMemoryPartyStore::new()))
}

fn actor() -> Actor {
    Actor::new("mds-mine-create")
}

fn person(first: &str, last: &str) -> PartyFields {
    PartyFields {
        party_type: Some("PER".to_string()),
        first_name: Some(first.to_string()),
        party_name: Some(last.to_string()),
        ..PartyFields::default()
    }
}

fn organization(name: &str) -> PartyFields {
    PartyFields {
        party_type: Some("ORG".to_string()),
        party_name: Some(name.to_string()),
        ..PartyFields::default()
    }
}

#[tokio::test]
async fn create_person_assigns_id_and_rejects_the_same_names_again() {
    let svc = service();

    let jane = svc.create(person("Jane", "Doe"), &actor()).await.unwrap();
    assert_eq!(jane.party_type(), PartyType::Person);
    assert_eq!(jane.first_name(), Some("Jane"));
    assert_eq!(jane.party_name(), "Doe");
    assert_eq!(jane.audit().create_user, "mds-mine-create");

    let err = svc.create(person("Jane", "Doe"), &actor()).await.unwrap_err();
    assert_eq!(
        err,
        PartyError::Duplicate(IdentityKey::new(PartyType::Person, Some("Jane"), "Doe"))
    );
    assert!(err.to_string().contains("Jane Doe"));
    assert_eq!(svc.store().len().unwrap(), 1);
}

#[tokio::test]
async fn people_sharing_a_surname_or_first_name_are_distinct() {
    let svc = service();
    svc.create(person("Jane", "Doe"), &actor()).await.unwrap();
    svc.create(person("John", "Doe"), &actor()).await.unwrap();
    svc.create(person("Jane", "Roe"), &actor()).await.unwrap();
    assert_eq!(svc.store().len().unwrap(), 3);
}

#[tokio::test]
async fn person_without_first_name_is_missing_field_regardless_of_other_fields() {
    let svc = service();
    for first in [None, Some(""), Some("   ")] {
        let fields = PartyFields {
            first_name: first.map(str::to_string),
            email: Some("jane@example.com".to_string()),
            city: Some("Victoria".to_string()),
            ..person("ignored", "Doe")
        };
        let err = svc.create(fields, &actor()).await.unwrap_err();
        assert_eq!(err, PartyError::MissingField("first_name"));
    }
    assert!(svc.store().is_empty().unwrap());
}

#[tokio::test]
async fn create_without_a_known_type_is_missing_type() {
    let svc = service();
    let mut fields = person("Jane", "Doe");
    fields.party_type = None;
    assert_eq!(
        svc.create(fields.clone(), &actor()).await.unwrap_err(),
        PartyError::MissingField("type")
    );

    fields.party_type = Some("XYZ".to_string());
    assert_eq!(
        svc.create(fields, &actor()).await.unwrap_err(),
        PartyError::MissingField("type")
    );
}

#[tokio::test]
async fn create_without_party_name_is_missing_field() {
    let svc = service();
    let fields = PartyFields {
        party_type: Some("ORG".to_string()),
        ..PartyFields::default()
    };
    assert_eq!(
        svc.create(fields, &actor()).await.unwrap_err(),
        PartyError::MissingField("party_name")
    );
}

#[tokio::test]
async fn organizations_are_unique_by_exact_name() {
    let svc = service();
    svc.create(organization("Acme Mining"), &actor()).await.unwrap();

    let err = svc
        .create(organization("Acme Mining"), &actor())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error: Party with the party name: Acme Mining already exists"
    );

    // Exact match is case-sensitive.
    svc.create(organization("ACME MINING"), &actor()).await.unwrap();
}

#[tokio::test]
async fn organization_may_share_a_name_with_a_persons_surname() {
    let svc = service();
    svc.create(person("Ann", "Smith"), &actor()).await.unwrap();
    svc.create(organization("Smith"), &actor()).await.unwrap();
}

#[tokio::test]
async fn create_attaches_contact_and_address() {
    let svc = service();
    let fields = PartyFields {
        email: Some("info@acme.ca".to_string()),
        phone_no: Some("250-555-0100".to_string()),
        phone_ext: Some("42".to_string()),
        suite_no: Some("200".to_string()),
        address_line_1: Some("1234 Foo Road".to_string()),
        city: Some("FooTown".to_string()),
        province_code: Some("bc".to_string()),
        postal_code: Some("a0b 1c2".to_string()),
        ..organization("Acme")
    };

    let party = svc.create(fields, &actor()).await.unwrap();
    assert_eq!(party.contact().email.as_deref(), Some("info@acme.ca"));
    assert_eq!(party.contact().phone_ext.as_deref(), Some("42"));
    assert_eq!(party.address().address_line_1.as_deref(), Some("1234 Foo Road"));
    assert_eq!(party.address().province_code.as_deref(), Some("BC"));
    assert_eq!(party.address().postal_code.as_deref(), Some("A0B1C2"));
    assert_eq!(party.address().address_line_2, None);
}

#[tokio::test]
async fn invalid_contact_fields_make_no_write() {
    let svc = service();
    let fields = PartyFields {
        phone_no: Some("5551234".to_string()),
        ..organization("Acme")
    };
    let err = svc.create(fields, &actor()).await.unwrap_err();
    assert!(matches!(err, PartyError::InvalidField { field: "phone_no", .. }));
    assert!(svc.store().is_empty().unwrap());
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let svc = service();
    assert_eq!(svc.get(PartyId::new()).await.unwrap_err(), PartyError::NotFound);
}

#[tokio::test]
async fn update_merges_over_existing_names() {
    let svc = service();
    let jane = svc.create(person("Jane", "Doe"), &actor()).await.unwrap();

    let fields = PartyFields {
        party_type: Some("PER".to_string()),
        party_name: Some("Doe-Smith".to_string()),
        ..PartyFields::default()
    };
    let updated = svc
        .update(jane.id_typed(), fields, &Actor::new("editor"))
        .await
        .unwrap();
    assert_eq!(updated.first_name(), Some("Jane"));
    assert_eq!(updated.party_name(), "Doe-Smith");
    assert_eq!(updated.audit().update_user, "editor");
    assert_eq!(updated.audit().create_user, "mds-mine-create");

    let reloaded = svc.get(jane.id_typed()).await.unwrap();
    assert_eq!(reloaded.name(), "Jane Doe-Smith");
}

#[tokio::test]
async fn update_to_own_current_name_is_not_a_self_conflict() {
    let svc = service();
    let jane = svc.create(person("Jane", "Doe"), &actor()).await.unwrap();
    svc.update(jane.id_typed(), person("Jane", "Doe"), &actor())
        .await
        .unwrap();

    let acme = svc.create(organization("Acme"), &actor()).await.unwrap();
    svc.update(acme.id_typed(), organization("Acme"), &actor())
        .await
        .unwrap();

    // Type only: both names default to the current values.
    let type_only = PartyFields {
        party_type: Some("ORG".to_string()),
        ..PartyFields::default()
    };
    svc.update(acme.id_typed(), type_only, &actor()).await.unwrap();
}

#[tokio::test]
async fn update_into_another_records_identity_is_duplicate() {
    let svc = service();
    svc.create(person("Jane", "Doe"), &actor()).await.unwrap();
    let john = svc.create(person("John", "Doe"), &actor()).await.unwrap();

    let fields = PartyFields {
        party_type: Some("PER".to_string()),
        first_name: Some("Jane".to_string()),
        ..PartyFields::default()
    };
    let err = svc.update(john.id_typed(), fields, &actor()).await.unwrap_err();
    assert_eq!(
        err,
        PartyError::Duplicate(IdentityKey::new(PartyType::Person, Some("Jane"), "Doe"))
    );
    assert_eq!(svc.get(john.id_typed()).await.unwrap().first_name(), Some("John"));
}

#[tokio::test]
async fn update_without_type_is_missing_type_even_for_existing_record() {
    let svc = service();
    let jane = svc.create(person("Jane", "Doe"), &actor()).await.unwrap();

    let fields = PartyFields {
        party_name: Some("Roe".to_string()),
        ..PartyFields::default()
    };
    let err = svc.update(jane.id_typed(), fields, &actor()).await.unwrap_err();
    assert_eq!(err, PartyError::MissingField("type"));
    assert_eq!(svc.get(jane.id_typed()).await.unwrap().party_name(), "Doe");
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let svc = service();
    let err = svc
        .update(PartyId::new(), organization("Acme"), &actor())
        .await
        .unwrap_err();
    assert_eq!(err, PartyError::NotFound);
}

#[tokio::test]
async fn update_cannot_change_party_type() {
    let svc = service();
    let jane = svc.create(person("Jane", "Doe"), &actor()).await.unwrap();
    let err = svc
        .update(jane.id_typed(), organization("Doe"), &actor())
        .await
        .unwrap_err();
    assert!(matches!(err, PartyError::InvalidField { field: "type", .. }));
    assert_eq!(
        err.to_string(),
        "Error: Invalid type: party type cannot be changed from PER to ORG"
    );
    assert_eq!(
        svc.get(jane.id_typed()).await.unwrap().party_type(),
        PartyType::Person
    );
}

#[tokio::test]
async fn update_leaves_contact_and_address_untouched() {
    let svc = service();
    let fields = PartyFields {
        email: Some("info@acme.ca".to_string()),
        city: Some("Victoria".to_string()),
        ..organization("Acme")
    };
    let acme = svc.create(fields, &actor()).await.unwrap();

    let change = PartyFields {
        email: Some("new@acme.ca".to_string()),
        city: Some("Nanaimo".to_string()),
        ..organization("Acme Holdings")
    };
    let updated = svc.update(acme.id_typed(), change, &actor()).await.unwrap();
    assert_eq!(updated.party_name(), "Acme Holdings");
    assert_eq!(updated.contact().email.as_deref(), Some("info@acme.ca"));
    assert_eq!(updated.address().city.as_deref(), Some("Victoria"));
}

#[tokio::test]
async fn search_is_case_insensitive_substring_capped_at_limit() {
    let svc = service();
    for i in 0..30 {
        svc.create(person(&format!("Person{i}"), "Smith"), &actor())
            .await
            .unwrap();
    }
    svc.create(person("Ann", "Blacksmithe"), &actor()).await.unwrap();
    svc.create(person("Bob", "Jones"), &actor()).await.unwrap();

    let found = svc
        .list(ListQuery {
            search: Some("Smith".to_string()),
            ..ListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 25);
    for party in &found {
        let hay = format!("{} {}", party.first_name().unwrap_or(""), party.party_name());
        assert!(hay.to_lowercase().contains("smith"));
    }

    let all_smiths = svc
        .list(ListQuery {
            search: Some("smith".to_string()),
            limit: Some(100),
            ..ListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(all_smiths.len(), 31);
}

#[tokio::test]
async fn search_term_is_matched_verbatim_including_whitespace() {
    let svc = service();
    svc.create(person("Jane", "Doe"), &actor()).await.unwrap();
    svc.create(person("Ann", "Van Dyke"), &actor()).await.unwrap();
    svc.create(person("Bob", "Smith"), &actor()).await.unwrap();

    let search = |term: &str| ListQuery {
        search: Some(term.to_string()),
        ..ListQuery::default()
    };

    for term in [" ", "n d", " smith "] {
        let found = svc.list(search(term)).await.unwrap();
        for party in &found {
            let first = party.first_name().unwrap_or("").to_lowercase();
            let last = party.party_name().to_lowercase();
            assert!(
                first.contains(term) || last.contains(term),
                "{term:?} not in {}",
                party.name()
            );
        }
    }

    let spaced = svc.list(search(" ")).await.unwrap();
    let names: Vec<_> = spaced.iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Ann Van Dyke"]);

    assert!(svc.list(search(" smith ")).await.unwrap().is_empty());

    // Only an empty term means "no search".
    assert_eq!(svc.list(search("")).await.unwrap().len(), 3);
}

#[tokio::test]
async fn type_filter_applies_only_to_known_codes() {
    let svc = service();
    svc.create(person("Ann", "Acme"), &actor()).await.unwrap();
    svc.create(organization("Acme"), &actor()).await.unwrap();

    let search = |type_filter: Option<&str>| ListQuery {
        search: Some("acme".to_string()),
        type_filter: type_filter.map(str::to_string),
        limit: None,
    };

    let orgs = svc.list(search(Some("org"))).await.unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].party_type(), PartyType::Organization);

    let people = svc.list(search(Some("PER"))).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].party_type(), PartyType::Person);

    let unfiltered = svc.list(search(None)).await.unwrap();
    let bogus = svc.list(search(Some("xyz"))).await.unwrap();
    assert_eq!(unfiltered.len(), 2);
    assert_eq!(bogus, unfiltered);
}

#[tokio::test]
async fn list_without_search_returns_store_order_ignoring_type_filter() {
    let svc = service().with_list_limit(3);
    for name in ["A", "B", "C", "D"] {
        svc.create(organization(name), &actor()).await.unwrap();
    }
    svc.create(person("Ann", "E"), &actor()).await.unwrap();

    let listed = svc
        .list(ListQuery {
            type_filter: Some("PER".to_string()),
            ..ListQuery::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = listed.iter().map(|p| p.party_name()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[tokio::test]
async fn concurrent_identical_creates_yield_one_record() {
    let svc = Arc::new(service());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            let actor = actor();
            svc.create(organization("Race Ltd"), &actor).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, PartyError::Duplicate(_))),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(
        svc.store()
            .find_by_organization_name("Race Ltd")
            .await
            .unwrap()
            .map(|p| p.party_name().to_string()),
        Some("Race Ltd".to_string())
    );
}
