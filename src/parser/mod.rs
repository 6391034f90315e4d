//! Parser layer for reading CSV input files

pub mod csv;
mod quoting;

pub use self::csv::{parse_header_row, read_headers, read_records};
