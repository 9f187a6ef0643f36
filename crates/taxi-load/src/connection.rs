//! The seam between the loader and a storage engine.
//!
//! A connection is exclusively owned by one run for its duration. A
//! transaction is scoped: committing consumes it, and dropping an
//! uncommitted transaction rolls everything back, on every exit path.

use std::io::Read;

use crate::error::Result;

/// A relational storage engine reachable over an authenticated connection.
pub trait StorageConnection {
    /// Begin a transaction. The transaction borrows the connection, so at
    /// most one can be open at a time.
    fn begin(&mut self) -> Result<Box<dyn StorageTransaction + '_>>;
}

/// One atomic unit of work against the storage engine.
pub trait StorageTransaction {
    /// Execute a statement with no result rows (DDL, mostly).
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Stream newline-terminated CSV records into the bulk-ingest channel
    /// opened by `sql`. Returns the number of rows ingested.
    fn copy_in(&mut self, sql: &str, data: &mut dyn Read) -> Result<u64>;

    /// Commit the transaction. Dropping without committing rolls back.
    fn commit(self: Box<Self>) -> Result<()>;
}
