//! End-to-end pipeline runs against the in-memory storage engine.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use taxi_cli::pipeline::{self, RunState};
use taxi_ingest::CsvProvider;
use taxi_load::MemoryConnection;
use taxi_model::{
    CoercionMode, ColumnDef, ColumnType, FillPolicy, LoadOptions, SchemaContract,
};

fn contract() -> SchemaContract {
    SchemaContract::new(vec![
        ColumnDef::new("id", ColumnType::Integer),
        ColumnDef::new("pickup", ColumnType::Timestamp).not_null(),
        ColumnDef::new("count", ColumnType::Float)
            .not_null()
            .with_fill(FillPolicy::Numeric(0.0)),
    ])
    .expect("valid contract")
}

fn write_fixture(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("trips.csv");
    fs::write(&path, body).expect("write fixture");
    path
}

#[test]
fn malformed_cell_degrades_to_fill_default_and_run_commits() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(
        &dir,
        "id,pickup,count\n\
         1,2023-01-01 00:00:00,2\n\
         2,2023-01-01 01:00:00,abc\n\
         3,2023-01-01 02:00:00,4\n",
    );
    let contract = contract();
    let options = LoadOptions::new("trips");
    let mut conn = MemoryConnection::new();

    let report = pipeline::run(&CsvProvider, &path, &mut conn, &contract, &options)
        .expect("run commits");

    assert_eq!(report.rows_fetched, 3);
    assert_eq!(report.rows_loaded, 3);
    assert_eq!(report.coercion.invalid.get("count"), Some(&1));
    assert_eq!(report.coercion.filled.get("count"), Some(&1));

    let table = conn.table("trips").expect("table committed");
    assert_eq!(table.rows.len(), 3);
    // The malformed cell became the fill default; its neighbors are intact.
    assert_eq!(table.rows[1][0], Some("2".to_string()));
    assert_eq!(table.rows[1][1], Some("2023-01-01 01:00:00.000000".to_string()));
    assert_eq!(table.rows[1][2], Some("0".to_string()));
    assert_eq!(table.rows[2][2], Some("4".to_string()));
}

#[test]
fn missing_required_column_fails_before_any_storage_work() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(
        &dir,
        "id,pickup\n\
         1,2023-01-01 00:00:00\n",
    );
    let contract = contract();
    let options = LoadOptions::new("trips");
    let mut conn = MemoryConnection::new();

    let error = pipeline::run(&CsvProvider, &path, &mut conn, &contract, &options).unwrap_err();
    assert_eq!(error.state(), RunState::Normalizing);
    assert_eq!(conn.transactions_started, 0);
    assert!(conn.table("trips").is_none());
}

#[test]
fn strict_mode_aborts_on_anomalies_without_loading() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_fixture(
        &dir,
        "id,pickup,count\n\
         1,2023-01-01 00:00:00,abc\n",
    );
    let contract = contract();
    let options = LoadOptions::new("trips").with_coercion(CoercionMode::Strict);
    let mut conn = MemoryConnection::new();

    let error = pipeline::run(&CsvProvider, &path, &mut conn, &contract, &options).unwrap_err();
    assert_eq!(error.state(), RunState::Coercing);
    assert_eq!(conn.transactions_started, 0);
}

#[test]
fn unreadable_dataset_fails_in_fetch_state() {
    let contract = contract();
    let options = LoadOptions::new("trips");
    let mut conn = MemoryConnection::new();

    let error = pipeline::run(
        &CsvProvider,
        std::path::Path::new("/nonexistent/trips.csv"),
        &mut conn,
        &contract,
        &options,
    )
    .unwrap_err();
    assert_eq!(error.state(), RunState::Fetching);
    assert_eq!(conn.transactions_started, 0);
}
