//! Output writers for processed Synthea frames.
//!
//! - [`export_csv`] writes `<table>_clean.csv` files and the feedback dataset
//! - [`PostgresStore`] replaces `raw_<table>` tables in a PostgreSQL schema
//!
//! Store settings come from [`StoreConfig`].

pub mod config;
mod csv_export;
pub mod error;
pub mod store;

pub use config::{DEFAULT_PORT, DEFAULT_SCHEMA, REQUIRED_SETTINGS, StoreConfig};
pub use csv_export::{
    DATETIME_FORMAT, ExportSummary, ExportedTable, FEEDBACK_FILE_NAME, clean_file_name,
    export_csv, write_table,
};
pub use error::{ConfigError, ExportError, Result};
pub use store::{
    LoadedTable, PostgresStore, StorePlan, TablePlan, quote_ident, store_plan, store_table_name,
};
