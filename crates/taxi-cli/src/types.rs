use std::path::PathBuf;

use taxi_transform::CoercionReport;

/// Outcome of a committed load run.
#[derive(Debug)]
pub struct RunReport {
    pub dataset: PathBuf,
    pub table: String,
    pub rows_fetched: usize,
    pub rows_loaded: u64,
    pub coercion: CoercionReport,
    pub duration_ms: u128,
}
