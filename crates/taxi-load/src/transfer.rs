//! Bulk-transfer serialization.
//!
//! A coerced batch is rendered as newline-terminated CSV records in
//! contract column order, the storage engine's bulk-ingest format. Null
//! cells become empty unquoted fields, which COPY reads back as NULL.
//! This is one streamed buffer, never per-row statements.

use polars::prelude::{AnyValue, DataFrame, Series};

use taxi_ingest::any_to_string;
use taxi_model::SchemaContract;

use crate::error::{LoadError, Result};

/// Serialize `batch` into the CSV transfer buffer, columns in contract order.
pub fn serialize_batch(batch: &DataFrame, contract: &SchemaContract) -> Result<Vec<u8>> {
    let mut columns: Vec<&Series> = Vec::with_capacity(contract.len());
    for def in contract.columns() {
        columns.push(batch.column(def.name.as_str())?.as_materialized_series());
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::with_capacity(batch.height() * contract.len() * 8));
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for row in 0..batch.height() {
        record.clear();
        for series in &columns {
            let value = series.get(row).unwrap_or(AnyValue::Null);
            record.push(any_to_string(value));
        }
        writer.write_record(&record)?;
    }
    writer
        .into_inner()
        .map_err(|error| LoadError::Io(error.into_error()))
}
