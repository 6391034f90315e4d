//! Ingest pipeline: headers → table → batch insert

pub mod statement;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::db::Connection;
use crate::error::{Error, Result};
use crate::model::{ColumnSet, TableName};
use crate::parser::{read_headers, read_records};

pub use statement::{build_create_table, build_insert, placeholders, InsertStatement};

/// Outcome of a successful ingest run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub file: PathBuf,
    pub table: String,
    pub columns: ColumnSet,
    pub rows_inserted: usize,
    /// Whether the table was new; only known when it was checked beforehand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_created: Option<bool>,
    /// Row count read back after loading, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_rows: Option<u64>,
    pub dry_run: bool,
}

/// Create `table` with one `String` column per entry in `columns`, unless it
/// already exists.
///
/// An existing table is left untouched even if its columns differ. Nothing
/// reaches the connection unless every name passes validation.
pub fn ensure_table(conn: &mut dyn Connection, table: &str, columns: &ColumnSet) -> Result<()> {
    let sql = build_create_table(table, columns)?;
    debug!(%sql, "ensuring table");
    conn.execute(&sql, &[])?;
    info!(table, columns = columns.len(), "table created or already exists");
    Ok(())
}

/// Insert every data row of the CSV file at `path` into `table` as one batch.
///
/// Returns the number of rows sent. On a storage error the number of rows
/// that actually landed is unknown.
pub fn load(conn: &mut dyn Connection, path: &Path, table: &str) -> Result<usize> {
    let data = read_records(path)?;
    let insert = build_insert(table, &data)?;

    info!(table, rows = insert.rows, params = insert.params.len(), "inserting rows");
    conn.execute(&insert.sql, &insert.params)?;
    Ok(insert.rows)
}

/// Ask the server whether `table` exists
pub fn table_exists(conn: &mut dyn Connection, table: &str) -> Result<bool> {
    let table: TableName = table.parse()?;
    let answer = conn.query_scalar(&format!("EXISTS TABLE {}", table.quoted()))?;
    match answer.as_str() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(Error::storage(format!(
            "unexpected EXISTS TABLE response: {:?}",
            other
        ))),
    }
}

/// Count the rows currently stored in `table`
pub fn row_count(conn: &mut dyn Connection, table: &str) -> Result<u64> {
    let table: TableName = table.parse()?;
    let answer = conn.query_scalar(&format!("SELECT count() FROM {}", table.quoted()))?;
    answer
        .parse()
        .map_err(|_| Error::storage(format!("unexpected count() response: {:?}", answer)))
}

/// Run the whole pipeline for one file: headers, table, batch insert
pub fn ingest(conn: &mut dyn Connection, path: &Path, table: &str) -> Result<IngestReport> {
    let columns = read_headers(path)?;
    ensure_table(conn, table, &columns)?;
    let rows_inserted = load(conn, path, table)?;

    Ok(IngestReport {
        file: path.to_path_buf(),
        table: table.to_string(),
        columns,
        rows_inserted,
        table_created: None,
        verified_rows: None,
        dry_run: false,
    })
}
