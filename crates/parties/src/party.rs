use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partyhub_core::{Entity, PartyId, ValueObject};

use crate::identity::IdentityKey;

/// Party type: a person or an organization.
///
/// The type decides which identity rule applies to a record and is fixed once the record
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyType {
    #[serde(rename = "PER")]
    Person,
    #[serde(rename = "ORG")]
    Organization,
}

impl PartyType {
    /// Wire code of the type (`PER` / `ORG`).
    pub fn code(self) -> &'static str {
        match self {
            PartyType::Person => "PER",
            PartyType::Organization => "ORG",
        }
    }

    /// Parse a type code, ignoring ASCII case. Anything else is `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.eq_ignore_ascii_case("PER") {
            Some(PartyType::Person)
        } else if code.eq_ignore_ascii_case("ORG") {
            Some(PartyType::Organization)
        } else {
            None
        }
    }

    /// Whether `first_name` carries meaning (and identity) for this type.
    pub fn uses_first_name(self) -> bool {
        matches!(self, PartyType::Person)
    }
}

impl core::fmt::Display for PartyType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub phone_ext: Option<String>,
}

impl ValueObject for ContactInfo {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone_no.is_none() && self.phone_ext.is_none()
    }
}

/// Postal address of a party. Every line is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub suite_no: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub province_code: Option<String>,
    pub postal_code: Option<String>,
}

impl ValueObject for Address {
    fn is_empty(&self) -> bool {
        self.suite_no.is_none()
            && self.address_line_1.is_none()
            && self.address_line_2.is_none()
            && self.city.is_none()
            && self.province_code.is_none()
            && self.postal_code.is_none()
    }
}

/// Opaque token naming who performed a write. Stores copy it into the audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creator/updater metadata, maintained by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub create_user: String,
    pub create_timestamp: DateTime<Utc>,
    pub update_user: String,
    pub update_timestamp: DateTime<Utc>,
}

impl Audit {
    /// Audit block for a record created by `actor` at `at`.
    pub fn created(actor: &Actor, at: DateTime<Utc>) -> Self {
        Self {
            create_user: actor.as_str().to_string(),
            create_timestamp: at,
            update_user: actor.as_str().to_string(),
            update_timestamp: at,
        }
    }
}

/// A validated party that has not been persisted yet (no id, no audit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParty {
    pub party_type: PartyType,
    /// Always `None` for organizations.
    pub first_name: Option<String>,
    pub party_name: String,
    pub contact: ContactInfo,
    pub address: Address,
}

impl NewParty {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.party_type, self.first_name.as_deref(), &self.party_name)
    }

    /// Attach the store-assigned id and audit block.
    pub fn into_party(self, id: PartyId, audit: Audit) -> Party {
        Party {
            id,
            party_type: self.party_type,
            first_name: self.first_name,
            party_name: self.party_name,
            contact: self.contact,
            address: self.address,
            audit,
        }
    }
}

/// Identity fields to apply to an existing record after a successful update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub first_name: Option<String>,
    pub party_name: String,
}

/// A persisted party record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: PartyId,
    party_type: PartyType,
    first_name: Option<String>,
    party_name: String,
    contact: ContactInfo,
    address: Address,
    audit: Audit,
}

impl Party {
    /// Rebuild a record from storage.
    pub fn hydrate(
        id: PartyId,
        party_type: PartyType,
        first_name: Option<String>,
        party_name: String,
        contact: ContactInfo,
        address: Address,
        audit: Audit,
    ) -> Self {
        Self {
            id,
            party_type,
            first_name: if party_type.uses_first_name() {
                first_name
            } else {
                None
            },
            party_name,
            contact,
            address,
            audit,
        }
    }

    pub fn id_typed(&self) -> PartyId {
        self.id
    }

    pub fn party_type(&self) -> PartyType {
        self.party_type
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn party_name(&self) -> &str {
        &self.party_name
    }

    /// Full display name: "First Last" for people, the organization name otherwise.
    pub fn name(&self) -> String {
        match self.first_name() {
            Some(first) => format!("{first} {}", self.party_name),
            None => self.party_name.clone(),
        }
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn audit(&self) -> &Audit {
        &self.audit
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.party_type, self.first_name(), &self.party_name)
    }

    /// Replace the identity fields. `first_name` is dropped for organizations.
    pub fn apply_identity(&mut self, update: IdentityUpdate) {
        self.first_name = if self.party_type.uses_first_name() {
            update.first_name
        } else {
            None
        };
        self.party_name = update.party_name;
    }

    /// Refresh the update audit fields. Called by stores on every persisted update.
    pub fn stamp_update(&mut self, actor: &Actor, at: DateTime<Utc>) {
        self.audit.update_user = actor.as_str().to_string();
        self.audit.update_timestamp = at;
    }

    /// Case-insensitive substring match against first name or party name.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.party_name.to_lowercase().contains(needle)
            || self
                .first_name
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(needle))
    }
}

impl Entity for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
