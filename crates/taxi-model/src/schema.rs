//! Schema contract: the authoritative ordered definition of the target table.
//!
//! The contract drives both sides of a load: the normalizer projects raw
//! batches onto it, and the loader derives the `CREATE TABLE` column
//! definitions and the bulk-transfer column order from it. It is declared
//! once at process start and never changes for the lifetime of a run.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Storage type declared for a contract column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    Integer,
    Float,
    Timestamp,
    Text,
}

impl ColumnType {
    /// The storage-engine type name used in DDL.
    pub fn ddl_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "DOUBLE PRECISION",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Text => "TEXT",
        }
    }

    /// Returns true for types coerced through lenient numeric parsing.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Per-column rule for replacing null or unparseable cells during coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Nulls are preserved.
    None,
    /// Nulls are replaced with the given numeric constant. For Integer
    /// columns the constant is rounded to the nearest integer.
    Numeric(f64),
    /// Nulls are replaced with the given text.
    Text(String),
}

impl FillPolicy {
    pub fn is_none(&self) -> bool {
        matches!(self, FillPolicy::None)
    }
}

/// One column of the schema contract.
///
/// `source` carries the external column name when the dataset provider
/// spells it differently from the storage name (e.g. `VendorID` vs
/// `vendorid`). Matching is case-insensitive on both names.
///
/// `required: false` marks columns that may be wholly absent from older
/// dataset versions; absence of an optional column is filled with nulls
/// instead of failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    pub data_type: ColumnType,
    pub nullable: bool,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default = "default_fill")]
    pub fill: FillPolicy,
}

fn default_required() -> bool {
    true
}

fn default_fill() -> FillPolicy {
    FillPolicy::None
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            source: None,
            data_type,
            nullable: true,
            required: true,
            fill: FillPolicy::None,
        }
    }

    /// Set the external source column name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Declare the column non-nullable after coercion.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as optional: absence in the raw batch is tolerated.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the null-fill policy.
    #[must_use]
    pub fn with_fill(mut self, fill: FillPolicy) -> Self {
        self.fill = fill;
        self
    }

    /// Returns true if `header` names this column (storage name or source
    /// alias, case-insensitive).
    pub fn matches(&self, header: &str) -> bool {
        if self.name.eq_ignore_ascii_case(header) {
            return true;
        }
        self.source
            .as_deref()
            .is_some_and(|source| source.eq_ignore_ascii_case(header))
    }
}

/// The ordered column set of the target table.
///
/// Column order defines both the relational table's column order and the
/// bulk-transfer record order. Names are unique; the set is validated at
/// construction and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaContract {
    columns: Vec<ColumnDef>,
}

impl SchemaContract {
    /// Build a contract, rejecting an empty column set or duplicate names.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (idx, column) in columns.iter().enumerate() {
            let duplicate = columns[..idx]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&column.name));
            if duplicate {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// The ordered column definitions.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Storage names in contract order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a column by storage name (case-insensitive).
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The column-definition body for a `CREATE TABLE` statement.
    ///
    /// Nullability is enforced by coercion accounting, not by a storage
    /// constraint, so no `NOT NULL` clauses are emitted.
    pub fn ddl(&self) -> String {
        let width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        self.columns
            .iter()
            .map(|c| format!("    {:<width$}  {}", c.name, c.data_type.ddl_type()))
            .collect::<Vec<_>>()
            .join(",\n")
    }
}

/// The canonical contract for TLC yellow-taxi trip records.
///
/// Column names, order and types match the raw warehouse table; source
/// aliases cover the mixed-case spellings used in the TLC Parquet files.
/// `passenger_count` keeps a zero fill because older files carry nulls
/// there, and `congestion_surcharge` is optional because it is missing
/// entirely from pre-2019 data.
pub fn yellow_tripdata() -> SchemaContract {
    use ColumnType::{Float, Integer, Text, Timestamp};
    let columns = vec![
        ColumnDef::new("vendorid", Integer).with_source("VendorID"),
        ColumnDef::new("tpep_pickup_datetime", Timestamp).not_null(),
        ColumnDef::new("tpep_dropoff_datetime", Timestamp).not_null(),
        ColumnDef::new("passenger_count", Float)
            .not_null()
            .with_fill(FillPolicy::Numeric(0.0)),
        ColumnDef::new("trip_distance", Float),
        ColumnDef::new("ratecodeid", Float).with_source("RatecodeID"),
        ColumnDef::new("store_and_fwd_flag", Text),
        ColumnDef::new("pulocationid", Integer).with_source("PULocationID"),
        ColumnDef::new("dolocationid", Integer).with_source("DOLocationID"),
        ColumnDef::new("payment_type", Integer),
        ColumnDef::new("fare_amount", Float),
        ColumnDef::new("extra", Float),
        ColumnDef::new("mta_tax", Float),
        ColumnDef::new("tip_amount", Float),
        ColumnDef::new("tolls_amount", Float),
        ColumnDef::new("improvement_surcharge", Float),
        ColumnDef::new("total_amount", Float),
        ColumnDef::new("congestion_surcharge", Float).optional(),
    ];
    SchemaContract::new(columns).expect("canonical yellow tripdata contract is valid")
}
