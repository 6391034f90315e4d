//! Database connections
//!
//! The ingest pipeline only ever talks to a [`Connection`]; the concrete
//! backends are ClickHouse over HTTP and a dry-run printer.

pub mod bind;
mod clickhouse;
mod dry_run;

use crate::error::Result;

pub use bind::{bind_params, quote_literal};
pub use clickhouse::ClickHouseConnection;
pub use dry_run::DryRunConnection;

/// A live database session
pub trait Connection {
    /// Run a statement, binding `params` to its `?` placeholders in order
    fn execute(&mut self, statement: &str, params: &[String]) -> Result<()>;

    /// Run a query that yields a single value and return it as text
    fn query_scalar(&mut self, statement: &str) -> Result<String>;
}
