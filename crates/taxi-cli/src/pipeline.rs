//! The load run as an explicit state machine.
//!
//! States advance strictly forward:
//!
//! `Fetching -> Normalizing -> Coercing -> Loading -> Committed`
//!
//! Any failure moves the run to the terminal `Failed` state; there is no
//! resumption and no partial commit. The storage connection is borrowed for
//! the duration of the run, and an uncommitted transaction rolls back when
//! its guard drops on the error path.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, info_span};

use taxi_ingest::{DatasetProvider, IngestError};
use taxi_load::{BulkLoader, LoadError, StorageConnection};
use taxi_model::{LoadOptions, SchemaContract};
use taxi_transform::{CoerceError, NormalizeError, coerce_batch, normalize_batch};

use crate::types::RunReport;

/// Observable state of a load run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Fetching,
    Normalizing,
    Coercing,
    Loading,
    Committed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Fetching => "fetching",
            RunState::Normalizing => "normalizing",
            RunState::Coercing => "coercing",
            RunState::Loading => "loading",
            RunState::Committed => "committed",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A run failure, tagged with the stage it occurred in.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset retrieval failed: {0}")]
    Fetch(#[from] IngestError),
    #[error("normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("coercion failed: {0}")]
    Coerce(#[from] CoerceError),
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
}

impl PipelineError {
    /// The state the run was in when it failed.
    pub fn state(&self) -> RunState {
        match self {
            PipelineError::Fetch(_) => RunState::Fetching,
            PipelineError::Normalize(_) => RunState::Normalizing,
            PipelineError::Coerce(_) => RunState::Coercing,
            PipelineError::Load(_) => RunState::Loading,
        }
    }
}

/// Drive one dataset through fetch, normalize, coerce and load.
///
/// Returns the committed run report, or the first stage error. Nothing is
/// retried here; retrying a failed run is the operator's decision.
pub fn run(
    provider: &dyn DatasetProvider,
    dataset: &Path,
    connection: &mut dyn StorageConnection,
    contract: &SchemaContract,
    options: &LoadOptions,
) -> Result<RunReport, PipelineError> {
    let span = info_span!("run", dataset = %dataset.display(), table = %options.table);
    let _guard = span.enter();
    let start = Instant::now();

    debug!(state = %RunState::Fetching, "state transition");
    let raw = provider.fetch(dataset)?;
    let rows_fetched = raw.height();

    debug!(state = %RunState::Normalizing, "state transition");
    let normalized = normalize_batch(&raw, contract)?;

    debug!(state = %RunState::Coercing, "state transition");
    let coerced = coerce_batch(&normalized, contract, options.coercion)?;

    debug!(state = %RunState::Loading, "state transition");
    let loader = BulkLoader::new(contract, options.table.as_str());
    let rows_loaded = loader.load(connection, &coerced.data)?;

    let duration_ms = start.elapsed().as_millis();
    info!(
        state = %RunState::Committed,
        rows_fetched,
        rows_loaded,
        invalid = coerced.report.total_invalid(),
        filled = coerced.report.total_filled(),
        duration_ms,
        "run committed"
    );

    Ok(RunReport {
        dataset: dataset.to_path_buf(),
        table: options.table.clone(),
        rows_fetched,
        rows_loaded,
        coercion: coerced.report,
        duration_ms,
    })
}
