//! # Vaccine Distribution Loader
//!
//! Migrates the vaccine distribution workbook into a relational database.
//!
//! A run has two phases:
//!
//! 1. **Schema**: a SQL script of `;`-terminated statements is executed statement by
//!    statement ([`script`]). By default a failing statement is logged and skipped.
//! 2. **Data**: every sheet of the `.xlsx` workbook ([`spreadsheet`]) is read into a
//!    table, null cells become `0`, headers are renamed to the destination columns,
//!    flag columns are coerced to booleans, Diagnosis dates are repaired, and the rows
//!    are written to their destination table ([`migration`]).
//!
//! The destination is a [`Target`](database::target::Target). The bundled
//! [`DuckDbTarget`](database::target::DuckDbTarget) writes to a local DuckDB file or,
//! through DuckDB's `postgres` extension, to the PostgreSQL database named by
//! [`Credentials`](credentials::Credentials).
//!
//! ## Example
//!
//! ```no_run
//! use vaccine_loader::database::target::DuckDbTarget;
//! use vaccine_loader::migration::{load_workbook, VACCINE_SHEETS};
//! use vaccine_loader::script::{run_sql_from_file, StatementErrorPolicy};
//! use vaccine_loader::spreadsheet::{open_workbook, ReadOptions};
//!
//! # fn main() -> Result<(), vaccine_loader::error::LoaderError> {
//! let mut target = DuckDbTarget::open("vaccines.duckdb")?;
//! run_sql_from_file("project_create_tables_script.sql", &mut target, StatementErrorPolicy::Continue)?;
//! let mut workbook = open_workbook("vaccine-distribution-data.xlsx", ReadOptions::default())?;
//! let report = load_workbook(&mut workbook, &mut target, VACCINE_SHEETS)?;
//! println!("{} rows loaded", report.total_rows());
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod credentials;
pub mod database;
pub mod error;
pub mod logging;
pub mod migration;
pub mod script;
pub mod spreadsheet;

mod helpers;
