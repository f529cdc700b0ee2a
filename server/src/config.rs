//! Process configuration read from environment variables.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_POOL_SIZE: &str = "10";
const DEFAULT_SERVICE_NAME: &str = "recipe-server";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub pool_size: u32,
    /// Adds an X-DB-Query-Count header to every response.
    pub track_db_query_count: bool,
    pub otel_endpoint: Option<String>,
    pub service_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or_default(&var, "BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let pool_size: u32 = parse_or_default(&var, "DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_POOL_SIZE",
                value: pool_size.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let storage = match var("RECIPES_STORAGE").as_deref().unwrap_or("postgres") {
            "postgres" => StorageBackend::Postgres {
                database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "RECIPES_STORAGE",
                    value: other.to_string(),
                    reason: "expected \"postgres\" or \"memory\"".to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            storage,
            pool_size,
            track_db_query_count: var("TRACK_DB_QUERY_COUNT").is_some_and(|v| v == "1"),
            otel_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
            service_name: var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        })
    }
}

fn parse_or_default<T, F>(var: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = var(key).unwrap_or_else(|| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/recipes")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.pool_size, 10);
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/recipes".to_string()
            }
        );
        assert!(!config.track_db_query_count);
        assert!(config.otel_endpoint.is_none());
        assert_eq!(config.service_name, "recipe-server");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(
            load(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_memory_storage_needs_no_database() {
        let config = load(&[
            ("RECIPES_STORAGE", "memory"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("TRACK_DB_QUERY_COUNT", "1"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.track_db_query_count);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = load(&[("RECIPES_STORAGE", "sqlite")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RECIPES_STORAGE", .. }));

        let err = load(&[("RECIPES_STORAGE", "memory"), ("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BIND_ADDR", .. }));

        let err = load(&[("RECIPES_STORAGE", "memory"), ("DATABASE_POOL_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DATABASE_POOL_SIZE", .. }));
    }
}
