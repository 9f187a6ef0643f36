//! Record normalization: project a raw batch onto the schema contract.
//!
//! For each contract column the raw batch is searched by storage name or
//! source alias, case-insensitively. Extra source columns are dropped,
//! missing optional columns are injected as all-null, and a missing
//! required column fails the whole batch. Rows are never reordered or
//! filtered; only columns move.

use polars::prelude::{Column, DataFrame, DataType};
use tracing::debug;

use taxi_model::SchemaContract;

use crate::error::NormalizeError;

/// Project, reorder and rename `raw` onto exactly the contract's columns.
pub fn normalize_batch(
    raw: &DataFrame,
    contract: &SchemaContract,
) -> Result<DataFrame, NormalizeError> {
    let height = raw.height();
    let headers = raw.get_column_names();
    let mut columns: Vec<Column> = Vec::with_capacity(contract.len());

    for def in contract.columns() {
        let matched = headers.iter().find(|header| def.matches(header.as_str()));
        match matched {
            Some(header) => {
                let mut series = raw.column(header.as_str())?.as_materialized_series().clone();
                series.rename(def.name.as_str().into());
                columns.push(series.into());
            }
            None if !def.required => {
                debug!(column = %def.name, "optional column absent, injecting nulls");
                columns.push(Column::full_null(
                    def.name.as_str().into(),
                    height,
                    &DataType::Null,
                ));
            }
            None => {
                return Err(NormalizeError::SchemaMismatch {
                    column: def.name.clone(),
                });
            }
        }
    }

    let dropped: Vec<&str> = headers
        .iter()
        .filter(|header| {
            !contract
                .columns()
                .iter()
                .any(|def| def.matches(header.as_str()))
        })
        .map(|header| header.as_str())
        .collect();
    if !dropped.is_empty() {
        debug!(count = dropped.len(), columns = ?dropped, "dropping extra source columns");
    }

    let normalized = DataFrame::new(columns)?;
    debug_assert_eq!(normalized.height(), height);
    Ok(normalized)
}
