use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partyhub_parties::{ListQuery, Party};

// -------------------------
// Request DTOs
// -------------------------

/// Query string of `GET /parties`.
#[derive(Debug, Default, Deserialize)]
pub struct ListPartiesQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub party_type: Option<String>,
}

impl From<ListPartiesQuery> for ListQuery {
    fn from(q: ListPartiesQuery) -> Self {
        ListQuery {
            search: q.search,
            type_filter: q.party_type,
            limit: None,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PartyResponse {
    pub party_guid: String,
    pub party_type_code: &'static str,
    pub first_name: Option<String>,
    pub party_name: String,
    pub name: String,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub phone_ext: Option<String>,
    pub suite_no: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub province_code: Option<String>,
    pub postal_code: Option<String>,
    pub create_user: String,
    pub create_timestamp: DateTime<Utc>,
    pub update_user: String,
    pub update_timestamp: DateTime<Utc>,
}

impl From<&Party> for PartyResponse {
    fn from(p: &Party) -> Self {
        let contact = p.contact().clone();
        let address = p.address().clone();
        let audit = p.audit().clone();

        Self {
            party_guid: p.id_typed().to_string(),
            party_type_code: p.party_type().code(),
            first_name: p.first_name().map(str::to_string),
            party_name: p.party_name().to_string(),
            name: p.name(),
            email: contact.email,
            phone_no: contact.phone_no,
            phone_ext: contact.phone_ext,
            suite_no: address.suite_no,
            address_line_1: address.address_line_1,
            address_line_2: address.address_line_2,
            city: address.city,
            province_code: address.province_code,
            postal_code: address.postal_code,
            create_user: audit.create_user,
            create_timestamp: audit.create_timestamp,
            update_user: audit.update_user,
            update_timestamp: audit.update_timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PartyListResponse {
    pub parties: Vec<PartyResponse>,
}

impl PartyListResponse {
    pub fn from_parties(parties: &[Party]) -> Self {
        Self {
            parties: parties.iter().map(PartyResponse::from).collect(),
        }
    }
}
