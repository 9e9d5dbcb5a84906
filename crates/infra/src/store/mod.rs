//! `PartyStore` implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPartyStore;
pub use postgres::PostgresPartyStore;
