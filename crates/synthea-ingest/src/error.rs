//! Error types for Synthea ingestion.

use std::path::PathBuf;

use synthea_model::SourceTable;
use thiserror::Error;

/// Errors that can occur while loading and normalizing source tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input directory does not exist or is not a directory.
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A required source file is absent from the input directory.
    #[error("missing required Synthea file for {table}: {path}")]
    MissingSource { table: SourceTable, path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Two raw headers normalize to the same column name.
    #[error("{table}: more than one column normalizes to '{column}'")]
    DuplicateColumn { table: SourceTable, column: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
