//! CLI argument definitions for the taxi warehouse loader.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use taxi_model::DEFAULT_TABLE;

#[derive(Parser)]
#[command(
    name = "taxi-warehouse",
    version,
    about = "NYC yellow-taxi trip record warehouse loader",
    long_about = "Load TLC yellow-taxi trip records into a relational warehouse.\n\n\
                  Reads Parquet or CSV trip files, normalizes them against the\n\
                  canonical schema contract, coerces values to their declared\n\
                  storage types and bulk-loads them in a single transaction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a trip-record dataset into the warehouse.
    Load(LoadArgs),

    /// Export a daily trip summary for a date range as CSV.
    Summary(SummaryArgs),

    /// Print the canonical schema contract and its table DDL.
    Schema,
}

/// Connection flags shared by commands that reach the warehouse.
///
/// Every flag falls back to a `TAXI_DB_*` environment variable; host and
/// password have no built-in default and must come from one of the two.
#[derive(Args)]
pub struct DbArgs {
    /// Warehouse host (falls back to TAXI_DB_HOST).
    #[arg(long = "db-host", value_name = "HOST")]
    pub db_host: Option<String>,

    /// Warehouse port (falls back to TAXI_DB_PORT, then 5432).
    #[arg(long = "db-port", value_name = "PORT")]
    pub db_port: Option<u16>,

    /// Warehouse user (falls back to TAXI_DB_USER, then "postgres").
    #[arg(long = "db-user", value_name = "USER")]
    pub db_user: Option<String>,

    /// Warehouse password (falls back to TAXI_DB_PASSWORD).
    #[arg(long = "db-password", value_name = "PASSWORD")]
    pub db_password: Option<String>,

    /// Warehouse database name (falls back to TAXI_DB_NAME, then "postgres").
    #[arg(long = "db-name", value_name = "DBNAME")]
    pub db_name: Option<String>,
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Path to the trip-record dataset (.parquet or .csv).
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Target warehouse table.
    #[arg(long = "table", value_name = "TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Fail the run on any value-level coercion anomaly.
    ///
    /// By default malformed cells become null (or the column's fill
    /// default) and the run continues; anomalies are reported per column
    /// in the run summary.
    #[arg(long = "strict-coercion")]
    pub strict_coercion: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// First pickup date of the range (inclusive).
    #[arg(value_name = "START", help = "Start date (YYYY-MM-DD)")]
    pub start: NaiveDate,

    /// Last pickup date of the range (inclusive).
    #[arg(value_name = "END", help = "End date (YYYY-MM-DD)")]
    pub end: NaiveDate,

    /// Source warehouse table.
    #[arg(long = "table", value_name = "TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Output CSV path.
    #[arg(
        long = "output",
        value_name = "PATH",
        default_value = "taxi_daily_summary.csv"
    )]
    pub output: PathBuf,

    #[command(flatten)]
    pub db: DbArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
