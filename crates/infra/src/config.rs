//! Configuration loading from the process environment.

use std::collections::HashMap;
use std::env::VarError;
use std::net::SocketAddr;

use thiserror::Error;

use partyhub_parties::PARTY_LIST_RESULT_LIMIT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

/// Variables read by [`AppConfig::from_env`].
pub const CONFIG_VARS: [&str; 5] = [
    "BIND_ADDR",
    "JWT_SECRET",
    "USE_PERSISTENT_STORES",
    "DATABASE_URL",
    "PARTY_LIST_RESULT_LIMIT",
];

/// Which `PartyStore` the service runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub store: StoreBackend,
    pub list_limit: usize,
}

impl AppConfig {
    /// Read the [`CONFIG_VARS`] from the process environment.
    ///
    /// Only these keys are looked at; other variables may hold anything.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for name in CONFIG_VARS {
            if let Some(value) = read_env(name)? {
                vars.insert(name.to_string(), value);
            }
        }
        Self::from_vars(vars)
    }

    /// Same as [`AppConfig::from_env`] over an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret.to_string(),
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let use_persistent = match var("USE_PERSISTENT_STORES") {
            None => false,
            Some(v) => v.parse::<bool>().map_err(|_| ConfigError::Invalid {
                name: "USE_PERSISTENT_STORES",
                reason: format!("expected true or false, got {v:?}"),
            })?,
        };

        let store = if use_persistent {
            let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            StoreBackend::Postgres {
                database_url: database_url.to_string(),
            }
        } else {
            StoreBackend::InMemory
        };

        let list_limit = match var("PARTY_LIST_RESULT_LIMIT") {
            None => PARTY_LIST_RESULT_LIMIT,
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "PARTY_LIST_RESULT_LIMIT",
                        reason: format!("expected a positive integer, got {v:?}"),
                    });
                }
            },
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            store,
            list_limit,
        })
    }
}

fn read_env(name: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::Invalid {
            name,
            reason: "value is not valid UTF-8".to_string(),
        }),
    }
}
