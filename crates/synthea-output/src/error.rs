//! Error types for export and store loading.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures writing the processed outputs.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {path} for writing: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("store configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to PostgreSQL at {host}:{port}/{database}: {source}")]
    Connect {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: postgres::Error,
    },

    #[error("failed to load {table} into the store: {source}")]
    Store {
        table: String,
        #[source]
        source: postgres::Error,
    },

    #[error("failed to stream {table} into the store: {source}")]
    Copy {
        table: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {table} for the store: {source}")]
    Encode {
        table: String,
        #[source]
        source: PolarsError,
    },
}

/// Invalid or incomplete store settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required settings: {}", names.join(", "))]
    Missing { names: Vec<String> },

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_are_listed_together() {
        let err = ConfigError::Missing {
            names: vec!["PGHOST".to_string(), "PGUSER".to_string()],
        };
        assert_eq!(err.to_string(), "missing required settings: PGHOST, PGUSER");
    }

    #[test]
    fn config_errors_wrap_into_export_errors() {
        let err: ExportError = ConfigError::Invalid {
            name: "PGPORT".to_string(),
            value: "abc".to_string(),
        }
        .into();
        assert!(err.to_string().contains("PGPORT"));
    }
}
