//! csvhouse - Load CSV files into ClickHouse

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use termcolor::{ColorChoice, StandardStream};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use csvhouse::config::{self, Config, ConnectionConfig, OutputFormat};
use csvhouse::db::{ClickHouseConnection, Connection, DryRunConnection};
use csvhouse::ingest::{ingest, row_count, table_exists, IngestReport};
use csvhouse::output::render_report;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Load a CSV file into a ClickHouse table, creating the table if needed
#[derive(Parser, Debug)]
#[command(name = "csvhouse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the CSV file
    #[arg(long)]
    file: PathBuf,

    /// Target table (`table` or `database.table`)
    #[arg(long)]
    table: String,

    /// ClickHouse HTTP endpoint
    #[arg(long, env = "CLICKHOUSE_URL", default_value = config::DEFAULT_URL)]
    url: String,

    /// Database for unqualified table names
    #[arg(long, env = "CLICKHOUSE_DATABASE", default_value = config::DEFAULT_DATABASE)]
    database: String,

    /// ClickHouse user
    #[arg(long, env = "CLICKHOUSE_USER", default_value = config::DEFAULT_USER)]
    user: String,

    /// ClickHouse password
    #[arg(long, env = "CLICKHOUSE_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Request timeout in seconds
    #[arg(long, env = "CLICKHOUSE_TIMEOUT_SECS", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Print the statements instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Check whether the table existed beforehand and count its rows after loading
    #[arg(long)]
    verify: bool,
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::new(cli.file, cli.table)
        .with_output_format(cli.format.into())
        .with_dry_run(cli.dry_run)
        .with_verify(cli.verify);

    let report = if config.dry_run {
        if config.verify {
            warn!("--verify has no effect with --dry-run");
        }
        let stdout = std::io::stdout();
        let mut conn = DryRunConnection::new(stdout.lock());
        let mut report = load_file(&mut conn, &config)?;
        info!(statements = conn.statements(), "dry run finished");
        report.dry_run = true;
        report
    } else {
        let conn_config = ConnectionConfig::new(&cli.url)?
            .with_database(cli.database)
            .with_credentials(cli.user, cli.password)
            .with_timeout(Duration::from_secs(cli.timeout_secs));

        // dropped at the end of this block on every path
        let mut conn = ClickHouseConnection::open(&conn_config)
            .with_context(|| format!("Failed to connect to ClickHouse at {}", conn_config.url))?;
        let existed = if config.verify {
            Some(table_exists(&mut conn, &config.table).context("Failed to check for table")?)
        } else {
            None
        };
        let mut report = load_file(&mut conn, &config)?;
        report.table_created = existed.map(|existed| !existed);
        if config.verify {
            report.verified_rows = Some(
                row_count(&mut conn, &config.table).context("Failed to verify row count")?,
            );
        }
        report
    };

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    render_report(&report, config.output_format, &mut stdout)
}

fn load_file(conn: &mut dyn Connection, config: &Config) -> Result<IngestReport> {
    ingest(conn, &config.file, &config.table).with_context(|| {
        format!(
            "Failed to load {} into {}",
            config.file.display(),
            config.table
        )
    })
}
