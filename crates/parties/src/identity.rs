//! Party identity rules: when a record may be created or renamed.
//!
//! A person is identified by `(first_name, party_name)`, an organization by `party_name`
//! alone. Comparisons are exact and case-sensitive. The rules consult the store for an
//! existing holder of the identity key; the conflict decision itself is the pure
//! [`check_conflict`].

use partyhub_core::{Entity, PartyId};

use crate::error::PartyError;
use crate::fields::{self, PartyFields};
use crate::party::{IdentityUpdate, NewParty, Party, PartyType};
use crate::store::PartyStore;

/// The field or field pair used to detect duplicate parties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Person { first_name: String, party_name: String },
    Organization { party_name: String },
}

impl IdentityKey {
    /// Build the key for `party_type`. `first_name` is ignored for organizations.
    pub fn new(party_type: PartyType, first_name: Option<&str>, party_name: &str) -> Self {
        match party_type {
            PartyType::Person => IdentityKey::Person {
                first_name: first_name.unwrap_or_default().to_string(),
                party_name: party_name.to_string(),
            },
            PartyType::Organization => IdentityKey::Organization {
                party_name: party_name.to_string(),
            },
        }
    }

    /// What the key is called in messages.
    pub fn label(&self) -> &'static str {
        match self {
            IdentityKey::Person { .. } => "name",
            IdentityKey::Organization { .. } => "party name",
        }
    }

    /// Whether `party` holds this key.
    pub fn is_held_by(&self, party: &Party) -> bool {
        match self {
            IdentityKey::Person {
                first_name,
                party_name,
            } => {
                party.party_type() == PartyType::Person
                    && party.first_name() == Some(first_name.as_str())
                    && party.party_name() == party_name
            }
            IdentityKey::Organization { party_name } => {
                party.party_type() == PartyType::Organization && party.party_name() == party_name
            }
        }
    }
}

impl core::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IdentityKey::Person {
                first_name,
                party_name,
            } => write!(f, "{first_name} {party_name}"),
            IdentityKey::Organization { party_name } => f.write_str(party_name),
        }
    }
}

/// Decide whether `found` (the current holder of `key`, if any) blocks the write.
///
/// A holder whose id equals `exclude` is the record being updated and never conflicts.
pub fn check_conflict(
    key: &IdentityKey,
    found: Option<&Party>,
    exclude: Option<PartyId>,
) -> Result<(), PartyError> {
    match found {
        Some(holder) if Some(*holder.id()) != exclude => Err(PartyError::Duplicate(key.clone())),
        _ => Ok(()),
    }
}

/// Resolve the mandatory party type code.
pub fn resolve_type(code: Option<&str>) -> Result<PartyType, PartyError> {
    code.and_then(PartyType::from_code)
        .ok_or(PartyError::MissingField("type"))
}

/// Identity validation engine over a [`PartyStore`].
pub struct PartyIdentityRules<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> PartyIdentityRules<'a, S>
where
    S: PartyStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate a create request and build the candidate record.
    ///
    /// Checks run in order: type, first name (people), party name, field formats, then the
    /// duplicate lookup. Nothing is looked up unless every field check passed.
    pub async fn validate_create(&self, candidate: &PartyFields) -> Result<NewParty, PartyError> {
        let party_type = resolve_type(candidate.party_type.as_deref())?;

        let first_name = match party_type {
            PartyType::Person => {
                let first = fields::normalize(candidate.first_name.as_deref())
                    .ok_or(PartyError::MissingField("first_name"))?;
                Some(fields::validate_name("first_name", first)?)
            }
            PartyType::Organization => None,
        };

        let party_name = fields::normalize(candidate.party_name.as_deref())
            .ok_or(PartyError::MissingField("party_name"))?;
        let party_name = fields::validate_name("party_name", party_name)?;

        let new_party = NewParty {
            party_type,
            first_name,
            party_name,
            contact: candidate.contact()?,
            address: candidate.address()?,
        };

        let key = new_party.identity_key();
        let found = self.store.find_by_identity(&key).await?;
        check_conflict(&key, found.as_ref(), None)?;

        Ok(new_party)
    }

    /// Validate an update of `existing`'s identity with merge-over-existing semantics.
    ///
    /// Omitted (or blank) names keep their current value. The record itself never counts
    /// as a conflicting holder of its own identity key.
    pub async fn validate_update(
        &self,
        existing: &Party,
        proposed_type: Option<&str>,
        proposed_first_name: Option<&str>,
        proposed_party_name: Option<&str>,
    ) -> Result<IdentityUpdate, PartyError> {
        let party_type = resolve_type(proposed_type)?;
        if party_type != existing.party_type() {
            return Err(PartyError::InvalidField {
                field: "type",
                reason: format!(
                    "party type cannot be changed from {} to {}",
                    existing.party_type(),
                    party_type
                ),
            });
        }

        let first_name = match party_type {
            PartyType::Person => {
                let first = merge(proposed_first_name, existing.first_name())
                    .ok_or(PartyError::MissingField("first_name"))?;
                Some(fields::validate_name("first_name", first)?)
            }
            PartyType::Organization => None,
        };

        let party_name = merge(proposed_party_name, Some(existing.party_name()))
            .ok_or(PartyError::MissingField("party_name"))?;
        let party_name = fields::validate_name("party_name", party_name)?;

        let key = IdentityKey::new(party_type, first_name.as_deref(), &party_name);
        let found = self.store.find_by_identity(&key).await?;
        check_conflict(&key, found.as_ref(), Some(*existing.id()))?;

        Ok(IdentityUpdate {
            first_name,
            party_name,
        })
    }
}

/// Proposed value if provided, else the current one.
fn merge(proposed: Option<&str>, current: Option<&str>) -> Option<String> {
    fields::normalize(proposed).or_else(|| current.map(str::to_string))
}
