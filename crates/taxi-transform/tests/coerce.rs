//! Coercer behavior: lenient casts, fill policies, strict mode.

use polars::prelude::{Column, DataFrame, DataType, TimeUnit};

use taxi_model::{CoercionMode, ColumnDef, ColumnType, FillPolicy, SchemaContract};
use taxi_transform::{CoerceError, coerce_batch};

fn count_contract() -> SchemaContract {
    SchemaContract::new(vec![
        ColumnDef::new("id", ColumnType::Integer),
        ColumnDef::new("count", ColumnType::Float)
            .not_null()
            .with_fill(FillPolicy::Numeric(0.0)),
    ])
    .expect("valid contract")
}

#[test]
fn bad_numeric_cell_becomes_fill_default() {
    // Row 2 carries a non-numeric count; the other cells must be untouched.
    let normalized = DataFrame::new(vec![
        Column::new("id".into(), vec![1_i64, 2, 3]),
        Column::new("count".into(), vec!["4", "garbage", "2"]),
    ])
    .expect("frame");

    let coerced = coerce_batch(&normalized, &count_contract(), CoercionMode::Lenient)
        .expect("lenient coercion");
    let counts = coerced.data.column("count").expect("count column");
    let counts = counts.as_materialized_series().f64().expect("float column");
    assert_eq!(counts.get(0), Some(4.0));
    assert_eq!(counts.get(1), Some(0.0));
    assert_eq!(counts.get(2), Some(2.0));
    assert_eq!(coerced.report.invalid.get("count"), Some(&1));
    assert_eq!(coerced.report.filled.get("count"), Some(&1));
    assert!(coerced.report.residual_nulls.is_empty());
}

#[test]
fn bad_numeric_cell_without_fill_becomes_null() {
    let contract = SchemaContract::new(vec![ColumnDef::new("amount", ColumnType::Float)])
        .expect("valid contract");
    let normalized = DataFrame::new(vec![Column::new(
        "amount".into(),
        vec!["1.5", "oops", "3.25"],
    )])
    .expect("frame");

    let coerced =
        coerce_batch(&normalized, &contract, CoercionMode::Lenient).expect("lenient coercion");
    let amounts = coerced.data.column("amount").expect("amount column");
    assert_eq!(amounts.null_count(), 1);
    let amounts = amounts.as_materialized_series().f64().expect("float column");
    assert_eq!(amounts.get(0), Some(1.5));
    assert_eq!(amounts.get(2), Some(3.25));
}

#[test]
fn strict_mode_fails_on_first_anomaly() {
    let normalized = DataFrame::new(vec![
        Column::new("id".into(), vec![1_i64, 2, 3]),
        Column::new("count".into(), vec!["4", "garbage", "2"]),
    ])
    .expect("frame");

    let error = coerce_batch(&normalized, &count_contract(), CoercionMode::Strict).unwrap_err();
    match error {
        CoerceError::Anomalies { column, count } => {
            assert_eq!(column, "count");
            assert_eq!(count, 1);
        }
        other => panic!("expected Anomalies, got {other:?}"),
    }
}

#[test]
fn residual_nulls_in_non_nullable_column_are_counted_not_fatal() {
    let contract = SchemaContract::new(vec![
        ColumnDef::new("ts", ColumnType::Timestamp).not_null(),
    ])
    .expect("valid contract");
    let normalized = DataFrame::new(vec![Column::new(
        "ts".into(),
        vec![Some(1_672_531_200_000_000_i64), None],
    )])
    .expect("frame");

    let coerced =
        coerce_batch(&normalized, &contract, CoercionMode::Lenient).expect("lenient coercion");
    assert_eq!(coerced.report.residual_nulls.get("ts"), Some(&1));
    assert_eq!(coerced.data.height(), 2);
}

#[test]
fn string_timestamps_parse_instead_of_nulling() {
    let contract = SchemaContract::new(vec![
        ColumnDef::new("ts", ColumnType::Timestamp).not_null(),
    ])
    .expect("valid contract");
    // SQL format, ISO separator, bare date, and one malformed cell.
    let normalized = DataFrame::new(vec![Column::new(
        "ts".into(),
        vec![
            "2023-01-01 01:00:00",
            "2023-01-01T02:00:00.250000",
            "2023-01-02",
            "not a time",
        ],
    )])
    .expect("frame");

    let coerced =
        coerce_batch(&normalized, &contract, CoercionMode::Lenient).expect("lenient coercion");
    let ts = coerced.data.column("ts").expect("ts column");
    assert_eq!(
        ts.dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );
    // Only the malformed cell is nulled; the valid ones survive parsing.
    assert_eq!(ts.null_count(), 1);
    let micros = ts
        .as_materialized_series()
        .cast(&DataType::Int64)
        .expect("physical repr");
    let micros = micros.i64().expect("int column");
    assert_eq!(micros.get(0), Some(1_672_534_800_000_000));
    assert_eq!(micros.get(1), Some(1_672_538_400_250_000));
    assert_eq!(micros.get(2), Some(1_672_617_600_000_000));
    assert_eq!(coerced.report.invalid.get("ts"), Some(&1));
    assert_eq!(coerced.report.residual_nulls.get("ts"), Some(&1));
}

#[test]
fn integer_fill_rounds_to_nearest() {
    let contract = SchemaContract::new(vec![
        ColumnDef::new("riders", ColumnType::Integer).with_fill(FillPolicy::Numeric(1.7)),
    ])
    .expect("valid contract");
    let normalized = DataFrame::new(vec![Column::new(
        "riders".into(),
        vec![Some(3_i64), None],
    )])
    .expect("frame");

    let coerced =
        coerce_batch(&normalized, &contract, CoercionMode::Lenient).expect("lenient coercion");
    let riders = coerced.data.column("riders").expect("riders column");
    let riders = riders.as_materialized_series().i64().expect("int column");
    assert_eq!(riders.get(0), Some(3));
    assert_eq!(riders.get(1), Some(2));
}

#[test]
fn timestamps_cast_to_microsecond_datetime() {
    let contract = SchemaContract::new(vec![
        ColumnDef::new("pickup", ColumnType::Timestamp),
    ])
    .expect("valid contract");
    // Epoch microseconds for 2023-01-01T00:00:00.
    let normalized = DataFrame::new(vec![Column::new(
        "pickup".into(),
        vec![1_672_531_200_000_000_i64],
    )])
    .expect("frame");

    let coerced =
        coerce_batch(&normalized, &contract, CoercionMode::Lenient).expect("lenient coercion");
    let pickup = coerced.data.column("pickup").expect("pickup column");
    assert_eq!(
        pickup.dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );
    assert_eq!(pickup.null_count(), 0);
}
