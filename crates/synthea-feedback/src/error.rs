use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("encounters table is missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("encounters column '{column}' must be {expected}, found {found}")]
    ColumnType {
        column: String,
        expected: String,
        found: DataType,
    },

    #[error("feedback frame operation failed: {0}")]
    Frame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
