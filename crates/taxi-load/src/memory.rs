//! In-memory storage engine implementing the seam traits.
//!
//! Work is staged inside the transaction and only applied on commit, so
//! atomicity, idempotent table creation and rollback-on-drop are all
//! observable in tests without a live server. Failure injection points
//! simulate the engine rejecting a statement, the copy stream, or the
//! commit itself.

use std::collections::BTreeMap;
use std::io::Read;

use crate::connection::{StorageConnection, StorageTransaction};
use crate::error::{LoadError, Result};

/// Where an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Statement,
    Copy,
    Commit,
}

/// A committed table: column names plus textual rows (None = NULL).
#[derive(Debug, Default, Clone)]
pub struct MemoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// An in-memory warehouse connection.
#[derive(Debug, Default)]
pub struct MemoryConnection {
    tables: BTreeMap<String, MemoryTable>,
    fail_at: Option<FailPoint>,
    /// Transactions begun over this connection's lifetime.
    pub transactions_started: usize,
    /// CREATE statements that actually created a table.
    pub tables_created: usize,
    /// CREATE statements that were no-ops because the table existed.
    pub creates_skipped: usize,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next matching operation fail.
    pub fn inject_failure(&mut self, point: FailPoint) {
        self.fail_at = Some(point);
    }

    pub fn clear_failure(&mut self) {
        self.fail_at = None;
    }

    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables.get(name)
    }

    pub fn row_count(&self, name: &str) -> usize {
        self.tables.get(name).map_or(0, |table| table.rows.len())
    }
}

impl StorageConnection for MemoryConnection {
    fn begin(&mut self) -> Result<Box<dyn StorageTransaction + '_>> {
        self.transactions_started += 1;
        Ok(Box::new(MemoryTransaction {
            connection: self,
            staged: Vec::new(),
        }))
    }
}

enum StagedOp {
    CreateTable {
        name: String,
        columns: Vec<String>,
    },
    AppendRows {
        name: String,
        rows: Vec<Vec<Option<String>>>,
    },
}

/// Staged operations; dropped uncommitted, they simply vanish.
struct MemoryTransaction<'a> {
    connection: &'a mut MemoryConnection,
    staged: Vec<StagedOp>,
}

impl StorageTransaction for MemoryTransaction<'_> {
    fn execute(&mut self, sql: &str) -> Result<()> {
        if self.connection.fail_at == Some(FailPoint::Statement) {
            return Err(LoadError::Statement("injected statement failure".into()));
        }
        let (name, columns) = parse_create_statement(sql)?;
        self.staged.push(StagedOp::CreateTable { name, columns });
        Ok(())
    }

    fn copy_in(&mut self, sql: &str, data: &mut dyn Read) -> Result<u64> {
        let (name, columns) = parse_copy_statement(sql)?;
        let mut buffer = Vec::new();
        data.read_to_end(&mut buffer)?;
        if self.connection.fail_at == Some(FailPoint::Copy) {
            return Err(LoadError::Copy("injected failure mid-stream".into()));
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(buffer.as_slice());
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(LoadError::Copy(format!(
                    "record has {} fields, expected {}",
                    record.len(),
                    columns.len()
                )));
            }
            let row: Vec<Option<String>> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }
        let count = rows.len() as u64;
        self.staged.push(StagedOp::AppendRows { name, rows });
        Ok(count)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        if self.connection.fail_at == Some(FailPoint::Commit) {
            return Err(LoadError::Commit("injected commit failure".into()));
        }
        for op in self.staged {
            match op {
                StagedOp::CreateTable { name, columns } => {
                    if self.connection.tables.contains_key(&name) {
                        self.connection.creates_skipped += 1;
                    } else {
                        self.connection.tables.insert(
                            name,
                            MemoryTable {
                                columns,
                                rows: Vec::new(),
                            },
                        );
                        self.connection.tables_created += 1;
                    }
                }
                StagedOp::AppendRows { name, rows } => {
                    let table = self.connection.tables.get_mut(&name).ok_or_else(|| {
                        LoadError::Copy(format!("copy into unknown table: {name}"))
                    })?;
                    table.rows.extend(rows);
                }
            }
        }
        Ok(())
    }
}

fn parse_create_statement(sql: &str) -> Result<(String, Vec<String>)> {
    let rest = sql
        .trim()
        .strip_prefix("CREATE TABLE IF NOT EXISTS ")
        .ok_or_else(|| LoadError::Statement(format!("unsupported statement: {sql}")))?;
    let open = rest
        .find('(')
        .ok_or_else(|| LoadError::Statement("create statement has no column list".into()))?;
    let close = rest
        .rfind(')')
        .ok_or_else(|| LoadError::Statement("create statement has no column list".into()))?;
    let name = rest[..open].trim().to_string();
    let columns = rest[open + 1..close]
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
        .collect();
    Ok((name, columns))
}

fn parse_copy_statement(sql: &str) -> Result<(String, Vec<String>)> {
    let rest = sql
        .trim()
        .strip_prefix("COPY ")
        .ok_or_else(|| LoadError::Copy(format!("unsupported copy statement: {sql}")))?;
    let open = rest
        .find('(')
        .ok_or_else(|| LoadError::Copy("copy statement has no column list".into()))?;
    let close = rest
        .find(')')
        .ok_or_else(|| LoadError::Copy("copy statement has no column list".into()))?;
    let name = rest[..open].trim().to_string();
    let columns = rest[open + 1..close]
        .split(',')
        .map(|entry| entry.trim().to_string())
        .collect();
    Ok((name, columns))
}

#[cfg(test)]
mod tests {
    use super::{parse_copy_statement, parse_create_statement};

    #[test]
    fn parses_create_statement() {
        let sql = "CREATE TABLE IF NOT EXISTS trips (\n    id  INTEGER,\n    fare  DOUBLE PRECISION\n)";
        let (name, columns) = parse_create_statement(sql).expect("parse");
        assert_eq!(name, "trips");
        assert_eq!(columns, vec!["id", "fare"]);
    }

    #[test]
    fn parses_copy_statement() {
        let sql = "COPY trips (id, fare) FROM STDIN WITH (FORMAT CSV)";
        let (name, columns) = parse_copy_statement(sql).expect("parse");
        assert_eq!(name, "trips");
        assert_eq!(columns, vec!["id", "fare"]);
    }
}
