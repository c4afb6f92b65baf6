use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
    #[error("ORDER_STORE must be 'postgres' or 'memory', got '{0}'")]
    InvalidStore(String),
}

/// Where orders are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::InvalidStore(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    /// Only required for [`StoreKind::Postgres`].
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Reads `HOST`, `PORT`, `ORDER_STORE` and `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };
        let store: StoreKind = lookup("ORDER_STORE")
            .map(|raw| raw.parse::<StoreKind>())
            .transpose()?
            .unwrap_or_default();
        let database_url = lookup("DATABASE_URL");
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(AppConfig {
            host,
            port,
            store,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_postgres_on_port_8080() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/orders")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/orders"));
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn memory_store_needs_no_database() {
        let config = load(&[("ORDER_STORE", "Memory"), ("PORT", "9000")]).unwrap();

        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.port, 9000);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            load(&[("ORDER_STORE", "memory"), ("PORT", "eighty")]),
            Err(ConfigError::InvalidPort("eighty".to_string()))
        );
        assert_eq!(
            load(&[("ORDER_STORE", "redis")]),
            Err(ConfigError::InvalidStore("redis".to_string()))
        );
    }
}
