//! JSON output format

use anyhow::Result;
use termcolor::WriteColor;

use crate::ingest::IngestReport;

use super::OutputFormatter;

/// Pretty-printed JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, report: &IngestReport, writer: &mut dyn WriteColor) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)?;
        Ok(())
    }
}
