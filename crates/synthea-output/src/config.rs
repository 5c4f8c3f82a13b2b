//! PostgreSQL store settings.

use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_SCHEMA: &str = "digital_health";

/// Settings that must be present and non-empty.
pub const REQUIRED_SETTINGS: [&str; 4] = ["PGHOST", "PGDATABASE", "PGUSER", "PGPASSWORD"];

/// Connection settings for the PostgreSQL store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub schema: String,
}

impl StoreConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`.
    ///
    /// Every missing required setting is reported in one error. Empty values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let missing: Vec<String> = REQUIRED_SETTINGS
            .iter()
            .filter(|name| get(**name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing { names: missing });
        }

        let port = match get("PGPORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid {
                    name: "PGPORT".to_string(),
                    value: raw.clone(),
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("PGHOST").unwrap_or_default(),
            port,
            database: get("PGDATABASE").unwrap_or_default(),
            user: get("PGUSER").unwrap_or_default(),
            password: get("PGPASSWORD").unwrap_or_default(),
            schema: get("PGSCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
        })
    }

    /// Client parameters for this store.
    pub fn connection_params(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database)
            .user(&self.user)
            .password(&self.password)
            .application_name("synthea-pipeline");
        config
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PGHOST", "db.local"),
            ("PGDATABASE", "clinical"),
            ("PGUSER", "etl"),
            ("PGPASSWORD", "s3cret"),
        ]
    }

    #[test]
    fn applies_port_and_schema_defaults() {
        let config = StoreConfig::from_lookup(lookup(&complete())).unwrap();
        assert_eq!(config.port, 5432);
        assert_eq!(config.schema, "digital_health");
        assert_eq!(config.host, "db.local");
    }

    #[test]
    fn reports_every_missing_setting() {
        let err = StoreConfig::from_lookup(lookup(&[("PGHOST", "db.local"), ("PGUSER", "")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                names: vec![
                    "PGDATABASE".to_string(),
                    "PGUSER".to_string(),
                    "PGPASSWORD".to_string()
                ]
            }
        );
    }

    #[test]
    fn rejects_non_numeric_port() {
        let mut pairs = complete();
        pairs.push(("PGPORT", "fivefour"));
        let err = StoreConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == "PGPORT"));
    }

    #[test]
    fn overrides_port_and_schema() {
        let mut pairs = complete();
        pairs.push(("PGPORT", "6543"));
        pairs.push(("PGSCHEMA", "staging"));
        let config = StoreConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 6543);
        assert_eq!(config.schema, "staging");
    }

    #[test]
    fn debug_output_hides_password() {
        let config = StoreConfig::from_lookup(lookup(&complete())).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn connection_params_carry_settings() {
        let config = StoreConfig::from_lookup(lookup(&complete())).unwrap();
        let params = config.connection_params();
        assert_eq!(params.get_dbname(), Some("clinical"));
        assert_eq!(params.get_user(), Some("etl"));
        assert_eq!(params.get_ports(), &[5432]);
    }
}
