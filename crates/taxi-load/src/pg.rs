//! PostgreSQL implementation of the storage seam.
//!
//! Uses the synchronous `postgres` client: the pipeline is single-threaded
//! per run, and the only blocking points are the connection and the COPY
//! stream itself.

use std::io::Read;
use std::time::Duration;

use postgres::{Client, NoTls, Transaction};
use tracing::debug;

use taxi_model::DatabaseConfig;

use crate::connection::{StorageConnection, StorageTransaction};
use crate::error::{LoadError, Result};

/// An exclusive connection to the warehouse database.
pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    /// Connect with the given parameters.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut pg = postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(&config.password)
            .dbname(&config.dbname)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        let client = pg.connect(NoTls).map_err(LoadError::Connection)?;
        debug!(host = %config.host, dbname = %config.dbname, "connected to warehouse");
        Ok(Self { client })
    }

    /// Direct access for read-only query paths (summary export).
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}

impl StorageConnection for PgConnection {
    fn begin(&mut self) -> Result<Box<dyn StorageTransaction + '_>> {
        let tx = self.client.transaction().map_err(LoadError::Begin)?;
        Ok(Box::new(PgTransaction { tx }))
    }
}

/// Wraps `postgres::Transaction`; dropping it uncommitted issues ROLLBACK.
struct PgTransaction<'a> {
    tx: Transaction<'a>,
}

impl StorageTransaction for PgTransaction<'_> {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.tx
            .batch_execute(sql)
            .map_err(|error| LoadError::Statement(error.to_string()))
    }

    fn copy_in(&mut self, sql: &str, data: &mut dyn Read) -> Result<u64> {
        let mut writer = self
            .tx
            .copy_in(sql)
            .map_err(|error| LoadError::Copy(error.to_string()))?;
        std::io::copy(data, &mut writer)?;
        writer
            .finish()
            .map_err(|error| LoadError::Copy(error.to_string()))
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.tx
            .commit()
            .map_err(|error| LoadError::Commit(error.to_string()))
    }
}
