//! Configuration handling for csvhouse

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_URL: &str = "http://localhost:8123";
pub const DEFAULT_DATABASE: &str = "default";
pub const DEFAULT_USER: &str = "default";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Output format for the ingest report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Where and how to reach ClickHouse
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// HTTP endpoint of the server
    pub url: Url,
    /// Database used for unqualified table names
    pub database: String,
    pub user: String,
    pub password: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL is valid"),
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given endpoint with default credentials
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| Error::validation(format!("invalid ClickHouse URL {:?}: {}", url, err)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "unsupported URL scheme {:?} (expected http or https)",
                url.scheme()
            )));
        }
        Ok(Self {
            url,
            ..Default::default()
        })
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Settings for one ingest run
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file to load
    pub file: PathBuf,
    /// Target table, optionally `database.table`
    pub table: String,
    /// Output format
    pub output_format: OutputFormat,
    /// Print statements instead of executing them
    pub dry_run: bool,
    /// Check for the table before loading and count its rows after
    pub verify: bool,
}

impl Config {
    /// Create a new Config for a file and target table
    pub fn new(file: PathBuf, table: impl Into<String>) -> Self {
        Self {
            file,
            table: table.into(),
            output_format: OutputFormat::default(),
            dry_run: false,
            verify: false,
        }
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable the existence check and post-load row count
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
