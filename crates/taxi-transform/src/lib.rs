//! Batch transformation for the taxi warehouse loader.
//!
//! - **normalize**: project raw batches onto the schema contract
//! - **coerce**: convert normalized batches to declared storage types
//!
//! The two stages preserve row count and row order; the asymmetry between
//! them is deliberate: normalization failures are structural and fatal,
//! coercion failures are value-level and degrade to null/default.

pub mod coerce;
pub mod error;
pub mod normalize;

pub use coerce::{CoercedBatch, CoercionReport, coerce_batch};
pub use error::{CoerceError, NormalizeError};
pub use normalize::normalize_batch;
