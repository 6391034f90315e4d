//! csvhouse - Load CSV files into ClickHouse
//!
//! Reads the header of a CSV file, creates a table with one `String` column
//! per header field (`CREATE TABLE IF NOT EXISTS`, unordered MergeTree) and
//! inserts every data row in a single batch.
//!
//! A failed run is not rolled back: a table created before the insert failed
//! stays behind, and after a storage error during the insert it is unknown
//! how many rows landed.

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod model;
pub mod output;
pub mod parser;

pub use config::{Config, ConnectionConfig};
pub use db::{ClickHouseConnection, Connection, DryRunConnection};
pub use error::{Error, Result};
pub use ingest::{ensure_table, ingest, load, IngestReport};
pub use model::ColumnSet;
pub use parser::read_headers;
