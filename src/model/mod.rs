//! Data model for loaded CSV files and target tables

mod schema;
mod table;

pub use schema::{ColumnSet, Identifier, TableName};
pub use table::{CsvData, Row};
