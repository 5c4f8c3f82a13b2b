//! Shared types for the Synthea ingestion pipeline.
//!
//! - **source**: the fixed catalogue of Synthea source tables and their typed columns
//! - **frame**: polars helpers for the UTC timestamp and text columns every stage shares
//! - **feedback**: synthetic feedback records and their categorical values

pub mod error;
pub mod feedback;
pub mod frame;
pub mod source;

pub use error::{ModelError, Result};
pub use feedback::{
    ComplaintCategory, FEEDBACK_COLUMNS, FEEDBACK_TABLE_NAME, FeedbackRecord, NpsCategory,
    QualitativeComment, SurveyResponse,
};
pub use frame::{
    TIMESTAMP_UNIT, is_utc_timestamp, text_values, timestamp_column, timestamp_values,
    utc_timestamp_dtype,
};
pub use source::SourceTable;
