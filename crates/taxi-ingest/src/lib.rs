pub mod error;
pub mod polars_utils;
pub mod provider;

pub use error::{IngestError, Result};
pub use polars_utils::{any_to_string, datetime_to_string, format_numeric};
pub use provider::{CsvProvider, DatasetProvider, ParquetProvider, open_dataset, provider_for};
