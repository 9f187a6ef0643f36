//! Storage connection configuration.
//!
//! Connection parameters are carried in an explicit structure handed to the
//! run at construction; nothing in the pipeline reads ambient process state.

use serde::{Deserialize, Serialize};

/// PostgreSQL connection parameters for the warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    pub password: String,
    #[serde(default = "default_dbname")]
    pub dbname: String,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_dbname() -> String {
    "postgres".to_string()
}

fn default_connect_timeout() -> u64 {
    15
}

impl DatabaseConfig {
    /// Build a config with default port, user, dbname and timeout.
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            user: default_user(),
            password: password.into(),
            dbname: default_dbname(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
