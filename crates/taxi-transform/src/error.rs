use thiserror::Error;

/// Structural failure while projecting a raw batch onto the contract.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A required contract column has no counterpart in the raw batch.
    /// Fatal: the run aborts before any storage-engine interaction.
    #[error("required column missing from source batch: {column}")]
    SchemaMismatch { column: String },
    #[error(transparent)]
    Frame(#[from] polars::error::PolarsError),
}

/// Failure while converting a normalized batch to its declared types.
///
/// In lenient mode value-level anomalies never surface here; they are
/// absorbed into the coercion report. Strict mode promotes them to errors.
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("column {column}: {count} value(s) failed coercion in strict mode")]
    Anomalies { column: String, count: usize },
    #[error(transparent)]
    Frame(#[from] polars::error::PolarsError),
}
