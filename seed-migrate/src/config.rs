// Configuration constants and environment helpers
use std::env;
use std::str::FromStr;
use std::time::Duration;

use seed_migrate_repository::PayloadConfig;

use crate::errors::ConfigError;

// Row limits per phase, capping the size of a run
pub const AMENITY_LIMIT: i64 = 100;
pub const DESTINATION_LIMIT: i64 = 50;
pub const PROPERTY_LIMIT: i64 = 200;
pub const PROPERTY_AMENITY_LIMIT: i64 = 1000;
pub const RESIDENCE_LIMIT: i64 = 500;

// One phase reads at a time
pub const SOURCE_MAX_CONNECTIONS: u32 = 1;
pub const SOURCE_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_SOURCE_HOST: &str = "localhost";
const DEFAULT_SOURCE_PORT: u16 = 3306;
const DEFAULT_SOURCE_USER: &str = "vacatia";
const DEFAULT_SOURCE_PASSWORD: &str = "vacatia";
const DEFAULT_SOURCE_DATABASE: &str = "vacatia";

const DEFAULT_PAYLOAD_URL: &str = "http://localhost:4001";
const DEFAULT_PAYLOAD_AUTH_COLLECTION: &str = "users";
const DEFAULT_PAYLOAD_TIMEOUT_SECS: u64 = 30;

/// Legacy MySQL connection parameters.
#[derive(Clone)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Full configuration of a seed run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub source: SourceConfig,
    pub target: PayloadConfig,
}

impl SeedConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `VACATIA_DB_HOST`: legacy host (default: localhost)
    /// - `VACATIA_DB_PORT`: legacy port (default: 3306)
    /// - `VACATIA_DB_USER`: legacy user (default: vacatia)
    /// - `VACATIA_DB_PASSWORD`: legacy password (default: vacatia)
    /// - `VACATIA_DB_NAME`: legacy database (default: vacatia)
    /// - `PAYLOAD_URL`: Payload server URL (default: http://localhost:4001)
    /// - `PAYLOAD_API_KEY`: API key used to authenticate writes (optional)
    /// - `PAYLOAD_AUTH_COLLECTION`: collection owning the API key (default: users)
    /// - `PAYLOAD_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let source = SourceConfig {
            host: var("VACATIA_DB_HOST", DEFAULT_SOURCE_HOST),
            port: parse_var(&lookup, "VACATIA_DB_PORT", DEFAULT_SOURCE_PORT)?,
            user: var("VACATIA_DB_USER", DEFAULT_SOURCE_USER),
            password: var("VACATIA_DB_PASSWORD", DEFAULT_SOURCE_PASSWORD),
            database: var("VACATIA_DB_NAME", DEFAULT_SOURCE_DATABASE),
        };

        let url = var("PAYLOAD_URL", DEFAULT_PAYLOAD_URL);
        let timeout = parse_var(
            &lookup,
            "PAYLOAD_REQUEST_TIMEOUT_SECS",
            DEFAULT_PAYLOAD_TIMEOUT_SECS,
        )?;

        let mut target = PayloadConfig::new(&url)
            .map_err(|e| ConfigError::invalid("PAYLOAD_URL", &url, e.to_string()))?
            .with_auth_collection(var(
                "PAYLOAD_AUTH_COLLECTION",
                DEFAULT_PAYLOAD_AUTH_COLLECTION,
            ))
            .with_timeout(Duration::from_secs(timeout));

        if let Some(api_key) = lookup("PAYLOAD_API_KEY").filter(|k| !k.trim().is_empty()) {
            target = target.with_api_key(api_key);
        }

        Ok(Self { source, target })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, &raw, e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SeedConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.source.host, "localhost");
        assert_eq!(config.source.port, 3306);
        assert_eq!(config.source.user, "vacatia");
        assert_eq!(config.source.database, "vacatia");
        assert_eq!(config.target.base_url.as_str(), "http://localhost:4001/");
        assert_eq!(config.target.api_key, None);
        assert_eq!(config.target.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = SeedConfig::from_lookup(lookup(&[
            ("VACATIA_DB_HOST", "legacy-db"),
            ("VACATIA_DB_PORT", "3307"),
            ("VACATIA_DB_NAME", "vacatia_prod"),
            ("PAYLOAD_URL", "https://cms.example.com"),
            ("PAYLOAD_API_KEY", "key-123"),
            ("PAYLOAD_AUTH_COLLECTION", "service-accounts"),
            ("PAYLOAD_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.source.host, "legacy-db");
        assert_eq!(config.source.port, 3307);
        assert_eq!(config.source.database, "vacatia_prod");
        assert_eq!(config.target.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.target.auth_collection, "service-accounts");
        assert_eq!(config.target.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = SeedConfig::from_lookup(lookup(&[("PAYLOAD_API_KEY", "  ")])).unwrap();
        assert_eq!(config.target.api_key, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = SeedConfig::from_lookup(lookup(&[("VACATIA_DB_PORT", "mysql")])).unwrap_err();
        assert!(err.to_string().contains("VACATIA_DB_PORT"));

        let err = SeedConfig::from_lookup(lookup(&[("PAYLOAD_URL", "::")])).unwrap_err();
        assert!(err.to_string().contains("PAYLOAD_URL"));
    }

    #[test]
    fn test_password_is_not_printed() {
        let config = SeedConfig::from_lookup(lookup(&[("VACATIA_DB_PASSWORD", "hunter2")])).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
