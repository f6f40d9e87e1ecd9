//! Command-line configuration for the loader.
//!
//! Every option can also be set through an environment variable, and the defaults
//! are the fixed paths the loader has always used, so a bare run needs no arguments.

use crate::script::StatementErrorPolicy;
use crate::spreadsheet::ReadOptions;
use clap::Parser;
use std::path::PathBuf;

/// Loads the vaccine distribution workbook into its database tables.
#[derive(Parser, Debug, Clone)]
#[command(name = "vaccine-loader")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Workbook to load: a local path or an http(s)/s3/gs URL
    #[arg(short, long, env = "VACCINE_WORKBOOK", default_value = "../data/vaccine-distribution-data.xlsx")]
    pub workbook: String,

    /// SQL script creating the destination tables
    #[arg(short, long, env = "VACCINE_SCHEMA", default_value = "project_create_tables_script.sql")]
    pub schema: PathBuf,

    /// JSON file with PostgreSQL user, password, host, database and port
    #[arg(short, long, env = "VACCINE_CREDENTIALS", default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Write into a local DuckDB file instead of PostgreSQL
    #[arg(short, long, env = "VACCINE_DATABASE")]
    pub database: Option<PathBuf>,

    /// Abort when a schema statement fails instead of logging it and continuing
    #[arg(long)]
    pub fail_on_statement_error: bool,

    /// Fail on workbook error cells (#N/A, #DIV/0!, ...) instead of loading them as null
    #[arg(long)]
    pub strict_cells: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn statement_error_policy(&self) -> StatementErrorPolicy {
        if self.fail_on_statement_error {
            StatementErrorPolicy::Propagate
        } else {
            StatementErrorPolicy::Continue
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            error_as_null: !self.strict_cells,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: "../data/vaccine-distribution-data.xlsx".into(),
            schema: PathBuf::from("project_create_tables_script.sql"),
            credentials: PathBuf::from("credentials.json"),
            database: None,
            fail_on_statement_error: false,
            strict_cells: false,
            log_level: "info".into(),
        }
    }
}
