//! Output formatting for ingest reports

mod json;
mod terminal;

use anyhow::Result;
use termcolor::WriteColor;

use crate::config::OutputFormat;
use crate::ingest::IngestReport;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render an ingest report to a writer
    fn render(&self, report: &IngestReport, writer: &mut dyn WriteColor) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render an ingest report in the requested format
pub fn render_report(
    report: &IngestReport,
    format: OutputFormat,
    writer: &mut dyn WriteColor,
) -> Result<()> {
    OutputFactory::create(format).render(report, writer)
}

#[cfg(test)]
pub(crate) fn sample_report() -> IngestReport {
    use crate::model::ColumnSet;

    IngestReport {
        file: "data/people.csv".into(),
        table: "people".to_string(),
        columns: ColumnSet::from(vec!["name", "age", "city"]),
        rows_inserted: 2,
        table_created: Some(true),
        verified_rows: None,
        dry_run: false,
    }
}
