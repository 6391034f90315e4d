//! Connection that prints statements instead of running them

use std::io::Write;

use super::bind::bind_params;
use super::Connection;
use crate::error::{Error, Result};

/// Writes each statement, with parameters bound, to `out`.
///
/// Scalar queries are not answered by a server; they print as skipped and
/// return `"0"`.
pub struct DryRunConnection<W: Write> {
    out: W,
    statements: usize,
}

impl<W: Write> DryRunConnection<W> {
    pub fn new(out: W) -> Self {
        Self { out, statements: 0 }
    }

    /// Number of statements printed so far
    pub fn statements(&self) -> usize {
        self.statements
    }

    fn write(&mut self, text: std::fmt::Arguments<'_>) -> Result<()> {
        self.out
            .write_fmt(text)
            .map_err(|err| Error::storage(format!("failed to write dry-run output: {}", err)))
    }
}

impl<W: Write> Connection for DryRunConnection<W> {
    fn execute(&mut self, statement: &str, params: &[String]) -> Result<()> {
        let sql = bind_params(statement, params)?;
        self.statements += 1;
        let number = self.statements;
        self.write(format_args!(
            "-- statement {} ({} parameters)\n{};\n",
            number,
            params.len(),
            sql
        ))
    }

    fn query_scalar(&mut self, statement: &str) -> Result<String> {
        self.write(format_args!("-- skipped: {}\n", statement))?;
        Ok("0".to_string())
    }
}
