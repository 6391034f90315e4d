//! CSV file parser

use std::fs;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{ColumnSet, CsvData, Row};

use super::quoting::check_quoting;

/// Normalize a header record into column names.
///
/// Both table creation and insertion take their column names from here, so
/// the two statements always agree.
pub fn parse_header_row(record: &StringRecord) -> ColumnSet {
    ColumnSet::new(record.iter().map(|field| field.trim().to_string()).collect())
}

/// Read only the first record of a CSV file as column names.
///
/// A file whose first line is blank yields an empty [`ColumnSet`]; rejecting
/// it is left to the schema stage.
pub fn read_headers(path: &Path) -> Result<ColumnSet> {
    let input = read_file(path)?;
    let (columns, _) = read_header(&input, path, true)?;
    debug!(path = %path.display(), columns = columns.len(), "read CSV headers");
    Ok(columns)
}

/// Read the whole file: header plus every data row
pub fn read_records(path: &Path) -> Result<CsvData> {
    let input = read_file(path)?;
    let (columns, mut reader) = read_header(&input, path, false)?;

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {
                let line = record.position().map_or(rows.len() + 2, |p| p.line() as usize);
                rows.push(Row::new(record.iter().map(str::to_string).collect(), line));
            }
            Ok(false) => break,
            Err(err) => return Err(csv_error(path, err)),
        }
    }

    debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "read CSV records"
    );
    Ok(CsvData::new(columns, rows))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| Error::io(path, err))
}

fn csv_reader(input: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

/// Consume the header record, leaving the reader positioned at the data rows.
///
/// Quoting is checked up front: only the first record when `header_only`,
/// otherwise the whole input.
fn read_header<'a>(
    input: &'a [u8],
    path: &Path,
    header_only: bool,
) -> Result<(ColumnSet, csv::Reader<&'a [u8]>)> {
    if input.is_empty() {
        return Err(Error::format(path, "file is empty"));
    }
    // The csv reader skips blank lines, so an empty first record has to be
    // spotted before it gets the input.
    let blank_first_line = input.starts_with(b"\n") || input.starts_with(b"\r\n");

    check_quoting(input, header_only).map_err(|fault| Error::format(path, fault.to_string()))?;

    let mut reader = csv_reader(input);
    if blank_first_line {
        return Ok((ColumnSet::default(), reader));
    }

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok((parse_header_row(&record), reader)),
        Ok(false) => Err(Error::format(path, "file contains no records")),
        Err(err) => Err(csv_error(path, err)),
    }
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::io(path, source),
        _ => Error::format(path, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_headers() {
        let file = temp_csv(b"name,age,city\nJohn,30,New York\nDoe,25,San Francisco");
        let headers = read_headers(file.path()).unwrap();
        assert_eq!(headers, ColumnSet::from(vec!["name", "age", "city"]));
    }

    #[test]
    fn test_read_headers_trims_whitespace() {
        let file = temp_csv(b" col1 ,\tcol2, col3  \n1,2,3\n");
        let headers = read_headers(file.path()).unwrap();
        assert_eq!(headers, ColumnSet::from(vec!["col1", "col2", "col3"]));
    }

    #[test]
    fn test_read_headers_quoted_fields() {
        let file = temp_csv(b"\"first name\",\"say \"\"hi\"\"\",plain\n");
        let headers = read_headers(file.path()).unwrap();
        assert_eq!(
            headers.names(),
            &["first name", "say \"hi\"", "plain"].map(String::from)
        );
    }

    #[test]
    fn test_read_headers_empty_file() {
        let file = temp_csv(b"");
        let err = read_headers(file.path()).unwrap_err();
        assert!(err.is_format(), "unexpected error: {err}");
    }

    #[test]
    fn test_read_headers_blank_first_line() {
        let file = temp_csv(b"\nJohn,30,New York");
        let headers = read_headers(file.path()).unwrap();
        assert!(headers.is_empty());

        let file = temp_csv(b"\r\nJohn,30,New York");
        assert!(read_headers(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_read_headers_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_headers(&dir.path().join("nonexistent.csv")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_read_headers_invalid_utf8() {
        let file = temp_csv(&[0x66, 0xff, 0xfe, b',', b'b', b'\n']);
        let err = read_headers(file.path()).unwrap_err();
        assert!(err.is_format(), "unexpected error: {err}");
    }

    #[test]
    fn test_read_records() {
        let file = temp_csv(b"name , age\nJohn,30\n\nDoe, 25 \n");
        let data = read_records(file.path()).unwrap();

        assert_eq!(data.columns, ColumnSet::from(vec!["name", "age"]));
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.rows[0].fields, vec!["John", "30"]);
        assert_eq!(data.rows[0].source_line, 2);
        // data values are kept verbatim
        assert_eq!(data.rows[1].fields, vec!["Doe", " 25 "]);
        assert_eq!(data.rows[1].source_line, 4);
    }

    #[test]
    fn test_read_records_keeps_ragged_rows() {
        let file = temp_csv(b"a,b\n1,2\n3\n");
        let data = read_records(file.path()).unwrap();
        assert_eq!(data.rows[1].fields, vec!["3"]);
        assert_eq!(data.first_ragged_row().map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_read_records_header_only() {
        let file = temp_csv(b"a,b,c\n");
        let data = read_records(file.path()).unwrap();
        assert_eq!(data.row_count(), 0);
    }

    #[test]
    fn test_read_headers_unterminated_quote() {
        let file = temp_csv(b"a,\"b\n1,2\n");
        let err = read_headers(file.path()).unwrap_err();
        assert!(err.is_format(), "unexpected error: {err}");
        assert!(err.to_string().contains("never closed"));
    }

    #[test]
    fn test_read_headers_bare_quote() {
        let file = temp_csv(b"a,b\"c\n1,2\n");
        let err = read_headers(file.path()).unwrap_err();
        assert!(err.is_format(), "unexpected error: {err}");
        assert!(err.to_string().contains("bare \""));
    }

    #[test]
    fn test_read_headers_ignores_later_quoting() {
        let file = temp_csv(b"a,b\n1,\"2\n");
        let headers = read_headers(file.path()).unwrap();
        assert_eq!(headers, ColumnSet::from(vec!["a", "b"]));
    }

    #[test]
    fn test_read_records_unterminated_quote() {
        let file = temp_csv(b"a,b\n1,\"2\n");
        let err = read_records(file.path()).unwrap_err();
        assert!(err.is_format(), "unexpected error: {err}");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_read_records_bare_quote() {
        let file = temp_csv(b"a,b\n1,x\"y\n");
        let err = read_records(file.path()).unwrap_err();
        assert!(err.is_format(), "unexpected error: {err}");
    }

    #[test]
    fn test_read_records_quoted_newline() {
        let file = temp_csv(b"a,b\n1,\"two\nlines\"\n3,4\n");
        let data = read_records(file.path()).unwrap();
        assert_eq!(data.rows[0].fields, vec!["1", "two\nlines"]);
        assert_eq!(data.rows[1].source_line, 4);
    }
}
