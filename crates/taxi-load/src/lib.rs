//! Transactional bulk loading for the taxi warehouse.
//!
//! - **connection**: the storage-engine seam (transactions, COPY channel)
//! - **pg**: PostgreSQL implementation over the synchronous client
//! - **memory**: staged in-memory engine for tests
//! - **transfer**: contract-ordered CSV transfer serialization
//! - **loader**: create-if-absent + COPY + commit in one transaction

pub mod connection;
pub mod error;
pub mod loader;
pub mod memory;
pub mod pg;
pub mod transfer;

pub use connection::{StorageConnection, StorageTransaction};
pub use error::{LoadError, Result};
pub use loader::BulkLoader;
pub use memory::{FailPoint, MemoryConnection, MemoryTable};
pub use pg::PgConnection;
pub use transfer::serialize_batch;
