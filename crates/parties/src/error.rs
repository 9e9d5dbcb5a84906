//! Party operation errors.

use thiserror::Error;

use partyhub_core::DomainError;

use crate::identity::IdentityKey;
use crate::store::StoreError;

/// Failure of a party operation, as returned to the caller.
///
/// The display strings are the human-readable messages sent back over the API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartyError {
    /// A required field was not provided.
    #[error("Error: Party {} is not provided.", missing_field_label(.0))]
    MissingField(&'static str),

    /// Another record already holds the identity key.
    #[error("Error: Party with the {}: {} already exists", .0.label(), .0)]
    Duplicate(IdentityKey),

    /// The identifier does not resolve to a record.
    #[error("Party not found")]
    NotFound,

    /// A create request was addressed to a specific record.
    #[error("Error: Unexpected party id in Url.")]
    UnexpectedIdentifier,

    /// A provided field has an invalid value.
    #[error("Error: Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The persistence backend failed.
    #[error("Error: {0}")]
    Store(StoreError),
}

fn missing_field_label(field: &str) -> &str {
    match field {
        "first_name" => "first name",
        "party_name" => "name",
        other => other,
    }
}

impl PartyError {
    /// HTTP-style status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            PartyError::MissingField(_)
            | PartyError::Duplicate(_)
            | PartyError::UnexpectedIdentifier
            | PartyError::InvalidField { .. } => 400,
            PartyError::NotFound => 404,
            PartyError::Store(_) => 500,
        }
    }

    /// Short machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            PartyError::MissingField(_) => "missing_field",
            PartyError::Duplicate(_) => "duplicate",
            PartyError::NotFound => "not_found",
            PartyError::UnexpectedIdentifier => "unexpected_identifier",
            PartyError::InvalidField { .. } => "validation_error",
            PartyError::Store(_) => "store_error",
        }
    }
}

impl From<DomainError> for PartyError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, reason } => PartyError::InvalidField { field, reason },
            DomainError::InvalidId(_) => PartyError::NotFound,
        }
    }
}

impl From<StoreError> for PartyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(key) => PartyError::Duplicate(key),
            StoreError::NotFound(_) => PartyError::NotFound,
            other => PartyError::Store(other),
        }
    }
}
