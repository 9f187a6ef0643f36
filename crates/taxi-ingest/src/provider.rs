//! Dataset providers: file-backed sources of raw record batches.
//!
//! A provider turns a dataset identifier (a file path) into an in-memory
//! columnar table with whatever column set, order and types the source
//! format carries. Validation against the schema contract happens later in
//! the normalizer, never here.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use polars::prelude::{CsvReadOptions, DataFrame, ParquetReader, SerReader};
use tracing::info;

use crate::error::{IngestError, Result};

/// A source of raw record batches.
pub trait DatasetProvider {
    /// Fetch the raw record batch for the given dataset path.
    fn fetch(&self, path: &Path) -> Result<DataFrame>;
}

/// Reads TLC trip-record Parquet files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParquetProvider;

impl DatasetProvider for ParquetProvider {
    fn fetch(&self, path: &Path) -> Result<DataFrame> {
        let start = Instant::now();
        let file = File::open(path).map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => IngestError::NotFound(path.to_path_buf()),
            _ => IngestError::Io(error),
        })?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "parquet dataset fetched"
        );
        Ok(df)
    }
}

/// Reads trip records from headered CSV files.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvProvider;

impl DatasetProvider for CsvProvider {
    fn fetch(&self, path: &Path) -> Result<DataFrame> {
        let start = Instant::now();
        if !path.exists() {
            return Err(IngestError::NotFound(path.to_path_buf()));
        }
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .finish()
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "csv dataset fetched"
        );
        Ok(df)
    }
}

/// Select a provider from the file extension.
pub fn provider_for(path: &Path) -> Result<Box<dyn DatasetProvider>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(Box::new(ParquetProvider)),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Box::new(CsvProvider)),
        _ => Err(IngestError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Fetch a dataset, selecting the provider from the file extension.
pub fn open_dataset(path: &Path) -> Result<DataFrame> {
    provider_for(path)?.fetch(path)
}
