//! Inbound field set and per-field validation.
//!
//! Every field arrives as an optional string. Blank values count as not provided.

use serde::Deserialize;

use partyhub_core::{DomainError, DomainResult};

use crate::party::{Address, ContactInfo};

const MAX_NAME_LEN: usize = 100;
const MAX_TEXT_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;

/// Flat field set accepted by create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartyFields {
    pub first_name: Option<String>,
    pub party_name: Option<String>,
    pub phone_no: Option<String>,
    pub phone_ext: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub party_type: Option<String>,
    pub suite_no: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub province_code: Option<String>,
    pub postal_code: Option<String>,
}

impl PartyFields {
    /// Validated contact details from the provided fields.
    pub fn contact(&self) -> DomainResult<ContactInfo> {
        Ok(ContactInfo {
            email: normalize(self.email.as_deref()).map(validate_email).transpose()?,
            phone_no: normalize(self.phone_no.as_deref())
                .map(validate_phone_no)
                .transpose()?,
            phone_ext: normalize(self.phone_ext.as_deref())
                .map(validate_phone_ext)
                .transpose()?,
        })
    }

    /// Validated address from the provided fields.
    pub fn address(&self) -> DomainResult<Address> {
        Ok(Address {
            suite_no: text("suite_no", self.suite_no.as_deref())?,
            address_line_1: text("address_line_1", self.address_line_1.as_deref())?,
            address_line_2: text("address_line_2", self.address_line_2.as_deref())?,
            city: text("city", self.city.as_deref())?,
            province_code: normalize(self.province_code.as_deref())
                .map(validate_province_code)
                .transpose()?,
            postal_code: normalize(self.postal_code.as_deref())
                .map(validate_postal_code)
                .transpose()?,
        })
    }
}

/// Trim a value; blank becomes `None`.
pub fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn text(field: &'static str, value: Option<&str>) -> DomainResult<Option<String>> {
    normalize(value)
        .map(|v| check_len(field, v, MAX_TEXT_LEN))
        .transpose()
}

fn check_len(field: &'static str, value: String, max: usize) -> DomainResult<String> {
    if value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(value)
}

pub fn validate_name(field: &'static str, value: String) -> DomainResult<String> {
    check_len(field, value, MAX_NAME_LEN)
}

pub fn validate_email(value: String) -> DomainResult<String> {
    let value = check_len("email", value, MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("email", "not a valid email address"));
    }
    Ok(value)
}

/// `NNN-NNN-NNNN`.
pub fn validate_phone_no(value: String) -> DomainResult<String> {
    let groups: Vec<&str> = value.split('-').collect();
    let valid = groups.len() == 3
        && groups
            .iter()
            .zip([3usize, 3, 4])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| b.is_ascii_digit()));
    if !valid {
        return Err(DomainError::validation(
            "phone_no",
            "expected the format 123-123-1234",
        ));
    }
    Ok(value)
}

pub fn validate_phone_ext(value: String) -> DomainResult<String> {
    if value.len() > 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::validation("phone_ext", "expected up to 4 digits"));
    }
    Ok(value)
}

/// Two letters, upper-cased (`bc` -> `BC`).
pub fn validate_province_code(value: String) -> DomainResult<String> {
    if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(DomainError::validation(
            "province_code",
            "expected a two letter code such as BC",
        ));
    }
    Ok(value.to_ascii_uppercase())
}

/// Canadian postal code, stored upper-cased without the middle space (`a0b 1c2` -> `A0B1C2`).
pub fn validate_postal_code(value: String) -> DomainResult<String> {
    let compact: String = match value.split_once(' ') {
        Some((head, tail)) if head.len() == 3 => format!("{head}{tail}"),
        Some(_) => String::new(),
        None => value,
    };
    let bytes = compact.as_bytes();
    let valid = bytes.len() == 6
        && bytes.iter().enumerate().all(|(i, b)| {
            if i % 2 == 0 {
                b.is_ascii_alphabetic()
            } else {
                b.is_ascii_digit()
            }
        });
    if !valid {
        return Err(DomainError::validation(
            "postal_code",
            "expected the format A0B1C2",
        ));
    }
    Ok(compact.to_ascii_uppercase())
}
