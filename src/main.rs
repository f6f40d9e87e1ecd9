//! Vaccine distribution loader.
//!
//! # Usage
//!
//! ```bash
//! vaccine-loader --workbook ../data/vaccine-distribution-data.xlsx --credentials credentials.json
//! vaccine-loader --database vaccines.duckdb --log-level debug
//! ```
//!
//! Environment variables can also be used:
//! - `VACCINE_WORKBOOK`: Workbook path or URL
//! - `VACCINE_SCHEMA`: Schema SQL script
//! - `VACCINE_CREDENTIALS`: PostgreSQL credentials JSON
//! - `VACCINE_DATABASE`: Local DuckDB file used instead of PostgreSQL
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use anyhow::Context;
use vaccine_loader::config::Config;
use vaccine_loader::credentials::Credentials;
use vaccine_loader::database::target::DuckDbTarget;
use vaccine_loader::logging::init_tracing;
use vaccine_loader::migration::load_workbook;
use vaccine_loader::migration::VACCINE_SHEETS;
use vaccine_loader::script::run_sql_from_file;
use vaccine_loader::spreadsheet::open_workbook;

fn open_target(config: &Config) -> anyhow::Result<DuckDbTarget> {
    match &config.database {
        Some(path) => {
            tracing::info!(database = %path.display(), "Writing to local DuckDB database");
            DuckDbTarget::open(path).with_context(|| format!("Failed to open database '{}'", path.display()))
        }
        None => {
            let credentials = Credentials::load(&config.credentials)
                .with_context(|| format!("Failed to read credentials from '{}'", config.credentials.display()))?;
            tracing::info!(url = %credentials.redacted_url(), "Connecting to PostgreSQL");
            DuckDbTarget::attach_postgres(&credentials).context("Failed to connect to PostgreSQL")
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse_args();
    init_tracing(&config.log_level);

    let mut target = open_target(&config)?;

    let script = run_sql_from_file(&config.schema, &mut target, config.statement_error_policy())?;
    if !script.failures.is_empty() {
        tracing::warn!(failed = script.failures.len(), "Some schema statements failed");
    }

    let mut workbook = open_workbook(&config.workbook, config.read_options())?;
    let report = load_workbook(&mut workbook, &mut target, VACCINE_SHEETS)?;
    for load in &report.loads {
        tracing::info!(sheet = %load.sheet, table = %load.table, rows = load.rows, "Sheet summary");
    }
    tracing::info!(tables = report.loads.len(), rows = report.total_rows(), "Migration complete");
    Ok(())
}
