use std::path::PathBuf;

use thiserror::Error;

/// Failure to retrieve or parse a source dataset.
///
/// These are fatal pre-pipeline failures: no normalization is attempted and
/// no storage transaction is opened.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
