use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown source table: {0}")]
    UnknownTable(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
