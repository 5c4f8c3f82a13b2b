//! Ingestion of Synthea CSV extracts.
//!
//! - **reader**: CSV files to Polars frames, every column read as text, null tokens as null
//! - **normalize**: canonical column names and per-table type coercion
//! - **loader**: the fixed set of required source tables, loaded and normalized

pub mod error;
pub mod loader;
pub mod normalize;
pub mod reader;

pub use error::{IngestError, Result};
pub use loader::{SourceTables, load_core_tables, required_source_paths};
pub use normalize::{
    NormalizeStats, normalize_column_name, normalize_frame, parse_f64, parse_timestamp,
};
pub use reader::{NULL_TOKENS, read_csv_frame};
