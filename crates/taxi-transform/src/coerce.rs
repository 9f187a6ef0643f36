//! Type coercion: convert a normalized batch to its declared storage types.
//!
//! Conversion is greedy by default: a malformed cell becomes null (or the
//! column's fill default) and the batch survives. Only structural failures
//! abort a run; value failures degrade and are counted in the
//! [`CoercionReport`] for observability. Strict mode inverts the value-level
//! policy and fails on the first column with anomalies.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{
    DataFrame, DataType, Float64Chunked, Int64Chunked, IntoSeries, Series, StringChunked, TimeUnit,
};
use tracing::{debug, warn};

use taxi_model::{ColumnDef, ColumnType, CoercionMode, FillPolicy, SchemaContract};

use crate::error::CoerceError;

/// Per-column anomaly counts produced by a coercion pass.
#[derive(Debug, Clone, Default)]
pub struct CoercionReport {
    /// Cells that failed conversion and became null.
    pub invalid: BTreeMap<String, usize>,
    /// Nulls replaced by a column's fill default.
    pub filled: BTreeMap<String, usize>,
    /// Nulls remaining in columns declared non-nullable.
    pub residual_nulls: BTreeMap<String, usize>,
}

impl CoercionReport {
    pub fn total_invalid(&self) -> usize {
        self.invalid.values().sum()
    }

    pub fn total_filled(&self) -> usize {
        self.filled.values().sum()
    }

    pub fn total_residual_nulls(&self) -> usize {
        self.residual_nulls.values().sum()
    }

    /// True when no cell was nulled, filled or left null against declaration.
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.filled.is_empty() && self.residual_nulls.is_empty()
    }
}

/// A batch whose values all match their declared storage types.
#[derive(Debug, Clone)]
pub struct CoercedBatch {
    pub data: DataFrame,
    pub report: CoercionReport,
}

fn target_dtype(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Integer => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Timestamp => DataType::Datetime(TimeUnit::Microseconds, None),
        ColumnType::Text => DataType::String,
    }
}

/// Cast `series` to the declared type, nulling unparseable cells.
///
/// String timestamp columns go through chrono: a plain dtype cast does not
/// parse text, and CSV sources carry timestamps as SQL-format strings.
fn cast_series(series: &Series, column_type: ColumnType) -> Result<Series, CoerceError> {
    if column_type == ColumnType::Timestamp && series.dtype() == &DataType::String {
        let parsed: Int64Chunked = series
            .str()?
            .iter()
            .map(|cell| cell.and_then(parse_timestamp_micros))
            .collect();
        let cast = parsed
            .with_name(series.name().clone())
            .into_series()
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
        return Ok(cast);
    }
    Ok(series.cast(&target_dtype(column_type))?)
}

/// Parse a timestamp string to epoch microseconds.
///
/// Accepts SQL format (`2023-01-01 00:00:00`, optional fraction), the ISO
/// `T` separator, and a bare date.
fn parse_timestamp_micros(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|datetime| datetime.and_utc().timestamp_micros())
}

/// Coerce every column of `normalized` to its declared type.
///
/// Row count and order are preserved; only cell values change.
pub fn coerce_batch(
    normalized: &DataFrame,
    contract: &SchemaContract,
    mode: CoercionMode,
) -> Result<CoercedBatch, CoerceError> {
    let mut columns = Vec::with_capacity(contract.len());
    let mut report = CoercionReport::default();

    for def in contract.columns() {
        let series = normalized
            .column(def.name.as_str())?
            .as_materialized_series();
        let nulls_before = series.null_count();

        // Non-strict cast: unparseable cells become null instead of failing.
        let cast = cast_series(series, def.data_type)?;
        let invalid = cast.null_count().saturating_sub(nulls_before);
        if invalid > 0 {
            if mode == CoercionMode::Strict {
                return Err(CoerceError::Anomalies {
                    column: def.name.clone(),
                    count: invalid,
                });
            }
            debug!(column = %def.name, count = invalid, "unparseable cells nulled");
            report.invalid.insert(def.name.clone(), invalid);
        }

        let (filled, fill_count) = apply_fill(&cast, def)?;
        if fill_count > 0 {
            debug!(column = %def.name, count = fill_count, "nulls replaced by fill default");
            report.filled.insert(def.name.clone(), fill_count);
        }

        let residual = filled.null_count();
        if residual > 0 && !def.nullable {
            warn!(
                column = %def.name,
                count = residual,
                "nulls remain in non-nullable column"
            );
            report.residual_nulls.insert(def.name.clone(), residual);
        }

        columns.push(filled.into());
    }

    let data = DataFrame::new(columns)?;
    Ok(CoercedBatch { data, report })
}

/// Replace nulls per the column's fill policy, returning the filled series
/// and the number of cells replaced.
fn apply_fill(series: &Series, def: &ColumnDef) -> Result<(Series, usize), CoerceError> {
    let nulls = series.null_count();
    if nulls == 0 || def.fill.is_none() {
        return Ok((series.clone(), 0));
    }
    let name = def.name.as_str();
    let filled = match (&def.fill, def.data_type) {
        (FillPolicy::Numeric(value), ColumnType::Float) => {
            let ca = series.f64()?;
            ca.iter()
                .map(|cell| cell.or(Some(*value)))
                .collect::<Float64Chunked>()
                .with_name(name.into())
                .into_series()
        }
        (FillPolicy::Numeric(value), ColumnType::Integer) => {
            // Integer columns round the fill value to the nearest integer.
            let fill = value.round() as i64;
            let ca = series.i64()?;
            ca.iter()
                .map(|cell| cell.or(Some(fill)))
                .collect::<Int64Chunked>()
                .with_name(name.into())
                .into_series()
        }
        (FillPolicy::Text(value), ColumnType::Text) => {
            let ca = series.str()?;
            ca.iter()
                .map(|cell| cell.or(Some(value.as_str())))
                .collect::<StringChunked>()
                .with_name(name.into())
                .into_series()
        }
        // A fill policy that does not match the declared type is ignored;
        // the contract constructor keeps the canonical schema consistent.
        _ => series.clone(),
    };
    let replaced = nulls.saturating_sub(filled.null_count());
    Ok((filled, replaced))
}
