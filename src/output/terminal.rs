//! Colored terminal output

use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::ingest::IngestReport;

use super::OutputFormatter;

/// Human-readable summary with a colored status line
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_status(&self, report: &IngestReport, writer: &mut dyn WriteColor) -> Result<()> {
        let (color, text) = if report.dry_run {
            (
                Color::Yellow,
                format!(
                    "Dry run: {} rows would be loaded into {}",
                    report.rows_inserted, report.table
                ),
            )
        } else {
            (
                Color::Green,
                format!("Loaded {} rows into {}", report.rows_inserted, report.table),
            )
        };

        writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(writer, "{}", text)?;
        writer.reset()?;

        let table_note = match report.table_created {
            Some(true) => " (table created)",
            Some(false) => " (table already existed)",
            None => "",
        };
        writeln!(writer, "{}", table_note)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, report: &IngestReport, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_status(report, writer)?;
        writeln!(writer, "  source:  {}", report.file.display())?;
        writeln!(
            writer,
            "  columns: {}",
            report.columns.iter().collect::<Vec<_>>().join(", ")
        )?;
        if let Some(count) = report.verified_rows {
            writeln!(writer, "  rows now in table: {}", count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_report;
    use termcolor::Buffer;

    fn render(report: &IngestReport) -> String {
        let mut buffer = Buffer::no_color();
        TerminalOutput::new().render(report, &mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_render_loaded() {
        let out = render(&sample_report());
        assert_eq!(
            out,
            "Loaded 2 rows into people (table created)\n  \
             source:  data/people.csv\n  \
             columns: name, age, city\n"
        );
    }

    #[test]
    fn test_render_without_existence_check() {
        let mut report = sample_report();
        report.table_created = None;
        assert!(render(&report).starts_with("Loaded 2 rows into people\n"));
    }

    #[test]
    fn test_render_dry_run_with_count() {
        let mut report = sample_report();
        report.dry_run = true;
        report.table_created = None;
        report.verified_rows = Some(7);
        let out = render(&report);
        assert!(out.starts_with("Dry run: 2 rows would be loaded into people\n"));
        assert!(out.ends_with("  rows now in table: 7\n"));
    }
}
