//! Run options for the load pipeline.

use serde::{Deserialize, Serialize};

/// Default warehouse table for yellow-taxi trip records.
pub const DEFAULT_TABLE: &str = "raw_yellow_tripdata";

/// Value-level coercion policy.
///
/// Lenient mode trades per-value strictness for batch availability: a
/// malformed cell becomes null (or the column's fill default) and the run
/// continues. Strict mode fails the run on the first column that produced
/// any coercion anomaly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
    #[default]
    Lenient,
    Strict,
}

/// Options for a single load run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Target table name.
    pub table: String,
    /// Value-level coercion policy.
    #[serde(default)]
    pub coercion: CoercionMode,
}

impl LoadOptions {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            coercion: CoercionMode::default(),
        }
    }

    #[must_use]
    pub fn with_coercion(mut self, mode: CoercionMode) -> Self {
        self.coercion = mode;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE)
    }
}
