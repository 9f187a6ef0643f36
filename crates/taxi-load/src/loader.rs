//! The bulk loader: one atomic transaction per batch.
//!
//! Sequence: create-table-if-absent, serialize, COPY, commit. Any failure
//! before the commit drops the transaction, which rolls everything back;
//! no partial table creation and no partial row visibility. Retrying is
//! the caller's decision, never the loader's.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use taxi_model::SchemaContract;

use crate::connection::StorageConnection;
use crate::error::Result;
use crate::transfer::serialize_batch;

/// Loads coerced batches into one target table.
pub struct BulkLoader<'a> {
    contract: &'a SchemaContract,
    table: String,
}

impl<'a> BulkLoader<'a> {
    pub fn new(contract: &'a SchemaContract, table: impl Into<String>) -> Self {
        Self {
            contract,
            table: table.into(),
        }
    }

    /// The idempotent table-creation statement.
    pub fn create_table_statement(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            self.table,
            self.contract.ddl()
        )
    }

    /// The bulk-ingest statement with the explicit contract column order.
    pub fn copy_statement(&self) -> String {
        format!(
            "COPY {} ({}) FROM STDIN WITH (FORMAT CSV)",
            self.table,
            self.contract.column_names().join(", ")
        )
    }

    /// Load `batch` in a single transaction, returning the row count copied.
    pub fn load(&self, connection: &mut dyn StorageConnection, batch: &DataFrame) -> Result<u64> {
        let span = info_span!("bulk_load", table = %self.table, rows = batch.height());
        let _guard = span.enter();
        let start = Instant::now();

        let mut tx = connection.begin()?;
        tx.execute(&self.create_table_statement())?;
        let payload = serialize_batch(batch, self.contract)?;
        let copied = tx.copy_in(&self.copy_statement(), &mut payload.as_slice())?;
        tx.commit()?;

        info!(
            table = %self.table,
            rows = copied,
            bytes = payload.len(),
            duration_ms = start.elapsed().as_millis(),
            "bulk load committed"
        );
        Ok(copied)
    }
}
