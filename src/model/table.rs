//! Materialized CSV contents

use super::schema::ColumnSet;

/// A data row: its field values and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Field values in source order
    pub fields: Vec<String>,
    /// 1-indexed line in the source file
    pub source_line: usize,
}

impl Row {
    pub fn new(fields: Vec<String>, source_line: usize) -> Self {
        Self {
            fields,
            source_line,
        }
    }
}

/// A whole CSV file held in memory: header columns plus data rows
#[derive(Debug, Clone, Default)]
pub struct CsvData {
    pub columns: ColumnSet,
    pub rows: Vec<Row>,
}

impl CsvData {
    pub fn new(columns: ColumnSet, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find the first row whose width differs from the header.
    ///
    /// Returns the 1-based data row index alongside the row.
    pub fn first_ragged_row(&self) -> Option<(usize, &Row)> {
        let width = self.columns.len();
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.fields.len() != width)
            .map(|(i, row)| (i + 1, row))
    }
}
