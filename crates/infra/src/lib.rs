//! Infrastructure layer: party stores and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use store::{InMemoryPartyStore, PostgresPartyStore};
