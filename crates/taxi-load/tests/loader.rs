//! Bulk loader transaction semantics against the in-memory engine.

use polars::prelude::{Column, DataFrame};

use taxi_load::{BulkLoader, FailPoint, LoadError, MemoryConnection};
use taxi_model::{ColumnDef, ColumnType, SchemaContract};

fn contract() -> SchemaContract {
    SchemaContract::new(vec![
        ColumnDef::new("id", ColumnType::Integer),
        ColumnDef::new("count", ColumnType::Float),
    ])
    .expect("valid contract")
}

fn batch() -> DataFrame {
    DataFrame::new(vec![
        Column::new("id".into(), vec![1_i64, 2, 3]),
        Column::new("count".into(), vec![Some(1.0_f64), None, Some(2.5)]),
    ])
    .expect("frame")
}

#[test]
fn load_commits_all_rows() {
    let contract = contract();
    let loader = BulkLoader::new(&contract, "trips");
    let mut conn = MemoryConnection::new();

    let copied = loader.load(&mut conn, &batch()).expect("load");
    assert_eq!(copied, 3);
    assert_eq!(conn.row_count("trips"), 3);

    let table = conn.table("trips").expect("table exists");
    assert_eq!(table.columns, vec!["id", "count"]);
    // The null cell survives as NULL.
    assert_eq!(table.rows[1], vec![Some("2".to_string()), None]);
}

#[test]
fn copy_failure_rolls_back_everything() {
    let contract = contract();
    let loader = BulkLoader::new(&contract, "trips");
    let mut conn = MemoryConnection::new();
    conn.inject_failure(FailPoint::Copy);

    let error = loader.load(&mut conn, &batch()).unwrap_err();
    assert!(matches!(error, LoadError::Copy(_)));
    // Not even the table creation survives the rollback.
    assert!(conn.table("trips").is_none());
    assert_eq!(conn.row_count("trips"), 0);
    assert_eq!(conn.transactions_started, 1);
}

#[test]
fn commit_failure_leaves_no_rows() {
    let contract = contract();
    let loader = BulkLoader::new(&contract, "trips");
    let mut conn = MemoryConnection::new();
    conn.inject_failure(FailPoint::Commit);

    let error = loader.load(&mut conn, &batch()).unwrap_err();
    assert!(matches!(error, LoadError::Commit(_)));
    assert_eq!(conn.row_count("trips"), 0);
}

#[test]
fn repeated_runs_keep_table_creation_idempotent() {
    let contract = contract();
    let loader = BulkLoader::new(&contract, "trips");
    let mut conn = MemoryConnection::new();

    loader.load(&mut conn, &batch()).expect("first load");
    loader.load(&mut conn, &batch()).expect("second load");

    assert_eq!(conn.tables_created, 1);
    assert_eq!(conn.creates_skipped, 1);
    // Duplicate rows across successful runs are accepted; dedup is out of scope.
    assert_eq!(conn.row_count("trips"), 6);
}

#[test]
fn statements_name_table_and_columns() {
    let contract = contract();
    let loader = BulkLoader::new(&contract, "raw_yellow_tripdata");
    let create = loader.create_table_statement();
    assert!(create.starts_with("CREATE TABLE IF NOT EXISTS raw_yellow_tripdata"));
    assert!(create.contains("INTEGER"));
    let copy = loader.copy_statement();
    assert_eq!(
        copy,
        "COPY raw_yellow_tripdata (id, count) FROM STDIN WITH (FORMAT CSV)"
    );
}
