//! Column and table identifiers

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{Error, Result};

/// A table or column name that is safe to embed in statement text.
///
/// Only ASCII alphanumerics and `_` are accepted, so the backtick quoting
/// applied by [`Identifier::quoted`] can never be broken out of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::validation("identifier must not be empty"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(Error::validation(format!(
                "invalid identifier {:?}: character {:?} is not allowed (use letters, digits and '_')",
                name, bad
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick-quoted form for statement text
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target table, optionally qualified with a database (`db.table`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub database: Option<Identifier>,
    pub table: Identifier,
}

impl TableName {
    pub fn quoted(&self) -> String {
        match &self.database {
            Some(db) => format!("{}.{}", db.quoted(), self.table.quoted()),
            None => self.table.quoted(),
        }
    }
}

impl FromStr for TableName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((db, table)) => Ok(Self {
                database: Some(Identifier::new(db)?),
                table: Identifier::new(table)?,
            }),
            None => Ok(Self {
                database: None,
                table: Identifier::new(s)?,
            }),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(db) => write!(f, "{}.{}", db, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Ordered column names taken from a header row.
///
/// May be empty straight out of the reader; [`ColumnSet::identifiers`] is the
/// gate every statement builder goes through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSet {
    names: Vec<String>,
}

impl ColumnSet {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Validate every name and return them as identifiers, in order.
    ///
    /// Fails on an empty set, an unsafe name or a repeated name.
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        if self.names.is_empty() {
            return Err(Error::validation("no columns provided"));
        }

        let mut seen = FxHashSet::default();
        let mut identifiers = Vec::with_capacity(self.names.len());
        for name in &self.names {
            if !seen.insert(name.as_str()) {
                return Err(Error::validation(format!("duplicate column name {:?}", name)));
            }
            identifiers.push(Identifier::new(name)?);
        }
        Ok(identifiers)
    }
}

impl From<Vec<&str>> for ColumnSet {
    fn from(names: Vec<&str>) -> Self {
        Self::new(names.into_iter().map(str::to_string).collect())
    }
}
