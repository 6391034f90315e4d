//! Statement text for table creation and batch inserts

use crate::error::{Error, Result};
use crate::model::{ColumnSet, CsvData, Identifier, TableName};

/// Every column is stored as text in an unordered MergeTree
const COLUMN_TYPE: &str = "String";
const ENGINE: &str = "MergeTree() ORDER BY tuple()";

/// A batch insert ready to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub sql: String,
    /// Field values for every row, row-major
    pub params: Vec<String>,
    /// Number of rows the statement carries
    pub rows: usize,
}

/// `?, ?, ?` for `n` columns
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn column_list(columns: &[Identifier]) -> String {
    columns
        .iter()
        .map(Identifier::quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_create_table(table: &str, columns: &ColumnSet) -> Result<String> {
    let columns = columns.identifiers()?;
    let table: TableName = table.parse()?;

    let definitions = columns
        .iter()
        .map(|col| format!("{} {}", col.quoted(), COLUMN_TYPE))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({}) ENGINE = {}",
        table.quoted(),
        definitions,
        ENGINE
    ))
}

pub fn build_insert(table: &str, data: &CsvData) -> Result<InsertStatement> {
    if data.rows.is_empty() {
        return Err(Error::validation(
            "file must contain a header and at least one data row",
        ));
    }
    let columns = data.columns.identifiers()?;
    let table: TableName = table.parse()?;

    if let Some((index, row)) = data.first_ragged_row() {
        return Err(Error::validation(format!(
            "row {} (line {}) has {} fields but the header has {} columns",
            index,
            row.source_line,
            row.fields.len(),
            columns.len()
        )));
    }

    let group = format!("({})", placeholders(columns.len()));
    let values = vec![group.as_str(); data.row_count()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES {}",
        table.quoted(),
        column_list(&columns),
        values
    );

    let params = data
        .rows
        .iter()
        .flat_map(|row| row.fields.iter().cloned())
        .collect();

    Ok(InsertStatement {
        sql,
        params,
        rows: data.row_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn data(columns: Vec<&str>, rows: &[&[&str]]) -> CsvData {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, fields)| Row::new(fields.iter().map(|s| s.to_string()).collect(), i + 2))
            .collect();
        CsvData::new(ColumnSet::from(columns), rows)
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(0), "");
    }

    #[test]
    fn test_create_table_statement() {
        let sql =
            build_create_table("people", &ColumnSet::from(vec!["name", "age", "city"])).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS `people` (`name` String, `age` String, `city` String) \
             ENGINE = MergeTree() ORDER BY tuple()"
        );
    }

    #[test]
    fn test_create_table_qualified_name() {
        let sql = build_create_table("warehouse.events", &ColumnSet::from(vec!["id"])).unwrap();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS `warehouse`.`events` (`id` String)"));
    }

    #[test]
    fn test_create_table_rejects_unsafe_names() {
        let columns = ColumnSet::from(vec!["id", "name"]);
        assert!(build_create_table("user-data-123", &columns)
            .unwrap_err()
            .is_validation());

        let columns = ColumnSet::from(vec!["user@id", "first-name", "last_name"]);
        let err = build_create_table("users", &columns).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("user@id"));
    }

    #[test]
    fn test_insert_statement() {
        let data = data(
            vec!["name", "age", "city"],
            &[&["John", "30", "New York"], &["Doe", "25", "San Francisco"]],
        );
        let insert = build_insert("people", &data).unwrap();

        assert_eq!(
            insert.sql,
            "INSERT INTO `people` (`name`, `age`, `city`) VALUES (?, ?, ?), (?, ?, ?)"
        );
        assert_eq!(insert.sql.matches('?').count(), 6);
        assert_eq!(
            insert.params,
            vec!["John", "30", "New York", "Doe", "25", "San Francisco"]
        );
        assert_eq!(insert.rows, 2);
    }

    #[test]
    fn test_insert_requires_data_rows() {
        let err = build_insert("people", &data(vec!["name"], &[])).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "file must contain a header and at least one data row"
        );
    }

    #[test]
    fn test_insert_rejects_ragged_rows() {
        let data = data(vec!["a", "b"], &[&["1", "2"], &["3", "4"], &["5"]]);
        let err = build_insert("t", &data).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "row 3 (line 4) has 1 fields but the header has 2 columns"
        );
    }

    #[test]
    fn test_insert_rejects_empty_header() {
        let data = data(vec![], &[&["1"]]);
        assert_eq!(
            build_insert("t", &data).unwrap_err().to_string(),
            "no columns provided"
        );
    }
}
