//! Destination databases for the schema script and the sheet datasets.

use crate::credentials::Credentials;
use crate::database::table::Table;
use crate::error::LoaderError;
use duckdb::params_from_iter;
use duckdb::Connection;
use std::path::Path;
use thiserror::Error;

/// Catalog alias under which a PostgreSQL database is attached.
const POSTGRES_ALIAS: &str = "vaccine";

#[derive(Error, Debug)]
pub enum TargetError {
    #[error("Table '{0}' has no columns to write")]
    NoColumnsError(String),

    #[error("Write to table '{table}' failed: {source}")]
    WriteError {
        table: String,
        #[source]
        source: duckdb::Error,
    },
}

/// How a dataset lands in its destination table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Insert after the existing rows, creating the table if it is missing
    #[default]
    Append,
    /// Drop the table and recreate it from the dataset
    Replace,
}

/// A database that accepts SQL statements and bulk table writes.
pub trait Target {
    /// Executes one SQL statement.
    fn execute(&mut self, statement: &str) -> Result<(), LoaderError>;

    /// Writes every row of `table` into `destination`, returning the number of rows written.
    fn write_table(&mut self, table: &Table, destination: &str, mode: WriteMode) -> Result<usize, LoaderError>;
}

/// DuckDB connection, either on a local database or with PostgreSQL attached as the default catalog.
pub struct DuckDbTarget {
    connection: Connection,
}

impl DuckDbTarget {
    /// Opens (or creates) a DuckDB database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        Ok(DuckDbTarget {
            connection: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, LoaderError> {
        Ok(DuckDbTarget {
            connection: Connection::open_in_memory()?,
        })
    }

    /// Attaches the PostgreSQL database described by `credentials` and makes it the default catalog,
    /// so unqualified statements and writes go to PostgreSQL.
    pub fn attach_postgres(credentials: &Credentials) -> Result<Self, LoaderError> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch("INSTALL postgres; LOAD postgres;")?;
        connection.execute_batch(&format!(
            "ATTACH {} AS {POSTGRES_ALIAS} (TYPE postgres); USE {POSTGRES_ALIAS};",
            quote_literal(&credentials.connection_string()),
        ))?;
        tracing::info!(host = %credentials.host, database = %credentials.database, "Attached PostgreSQL database");
        Ok(DuckDbTarget { connection })
    }

    /// Underlying connection, for ad-hoc queries against the loaded tables.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Number of rows currently stored in a table.
    pub fn row_count(&self, table: &str) -> Result<usize, LoaderError> {
        let sql = format!("SELECT count(*) FROM {}", quote_identifier(table));
        let count: i64 = self.connection.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_rows(&mut self, table: &Table, destination: &str, mode: WriteMode) -> Result<usize, duckdb::Error> {
        let transaction = self.connection.transaction()?;
        let create = match mode {
            WriteMode::Append => "CREATE TABLE IF NOT EXISTS",
            WriteMode::Replace => {
                transaction.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(destination)))?;
                "CREATE TABLE"
            }
        };
        let definitions = table
            .schema()
            .iter()
            .map(|column| format!("{} {}", quote_identifier(&column.name), column.kind.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        transaction.execute_batch(&format!("{create} {} ({definitions})", quote_identifier(destination)))?;

        let columns = table
            .columns
            .iter()
            .map(|name| quote_identifier(name))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; table.columns.len()].join(", ");
        let sql = format!("INSERT INTO {} ({columns}) VALUES ({placeholders})", quote_identifier(destination));
        {
            let mut statement = transaction.prepare(&sql)?;
            for row in &table.rows {
                statement.execute(params_from_iter(row.iter().map(|value| value.to_sql_value())))?;
            }
        }
        transaction.commit()?;
        Ok(table.len())
    }
}

impl Target for DuckDbTarget {
    fn execute(&mut self, statement: &str) -> Result<(), LoaderError> {
        self.connection.execute_batch(statement)?;
        Ok(())
    }

    fn write_table(&mut self, table: &Table, destination: &str, mode: WriteMode) -> Result<usize, LoaderError> {
        if table.columns.is_empty() {
            Err(TargetError::NoColumnsError(destination.to_owned()))?;
        }
        let rows = self.insert_rows(table, destination, mode).map_err(|source| TargetError::WriteError {
            table: destination.to_owned(),
            source,
        })?;
        tracing::debug!(table = destination, rows, ?mode, "Wrote table");
        Ok(rows)
    }
}

/// Quotes an identifier for SQL, doubling embedded quotes.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a string literal for SQL, doubling embedded quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
