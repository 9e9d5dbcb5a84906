//! Parties domain module (people and organizations).
//!
//! This crate owns the rules that decide when a party record may be created or renamed,
//! the persistence contract those rules consult (`PartyStore`), and the service that
//! orchestrates both. No HTTP and no concrete storage live here.

pub mod error;
pub mod fields;
pub mod identity;
pub mod party;
pub mod service;
pub mod store;

pub use error::PartyError;
pub use fields::PartyFields;
pub use identity::{IdentityKey, PartyIdentityRules, check_conflict};
pub use party::{Actor, Address, Audit, ContactInfo, IdentityUpdate, NewParty, Party, PartyType};
pub use service::{ListQuery, PARTY_LIST_RESULT_LIMIT, PartyService};
pub use store::{PartyStore, StoreError};
