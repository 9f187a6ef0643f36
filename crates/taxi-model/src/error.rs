use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema contract has no columns")]
    Empty,
    #[error("duplicate column in schema contract: {0}")]
    DuplicateColumn(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
