use thiserror::Error;

/// Failure while loading a coerced batch into the storage engine.
///
/// Any variant raised between transaction begin and commit triggers a
/// rollback; the loader never retries internally.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("storage connection failed: {0}")]
    Connection(#[source] postgres::Error),
    #[error("transaction begin failed: {0}")]
    Begin(#[source] postgres::Error),
    #[error("statement failed: {0}")]
    Statement(String),
    #[error("bulk copy failed: {0}")]
    Copy(String),
    #[error("commit failed: {0}")]
    Commit(String),
    #[error("transfer serialization failed: {0}")]
    Transfer(#[from] csv::Error),
    #[error(transparent)]
    Frame(#[from] polars::error::PolarsError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
