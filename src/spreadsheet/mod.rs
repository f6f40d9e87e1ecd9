//! # Workbook Reading
//!
//! Reads the sheets of an Office Open XML workbook (`.xlsx`) into [`Table`] datasets.
//! The package is opened from a local path or downloaded from an `http(s)`, `s3` or `gs` URL,
//! and each sheet becomes one table whose first row supplies the column names.
//!
//! Cell values keep their spreadsheet type: numbers become integers or doubles,
//! number cells with a date or time format become dates, times or timestamps
//! (honouring the workbook's 1900 or 1904 date system), and error cells become null
//! unless [`ReadOptions::error_as_null`] is switched off.
mod cell;
mod excel;
mod reference;
mod sheet;
mod xlsx;

use crate::database::table::Table;
use crate::error::LoaderError;
use crate::error::ResultMessage;
use thiserror::Error;

pub use xlsx::XlsxWorkbook;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing part '{0}' in workbook package")]
    FileError(String),

    #[error("Workbook '{0}' has no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Sheet '{1}' not found in workbook '{0}'")]
    SheetNotFoundError(String, String),

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    /// Read error cells (`#N/A`, `#DIV/0!`, ...) as null instead of failing
    pub error_as_null: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions { error_as_null: true }
    }
}

/// A workbook whose sheets can be read as tables.
pub trait Spreadsheet {
    /// Path or URL the workbook was opened from
    fn location(&self) -> &str;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Reads one sheet by exact name
    fn read_sheet(&mut self, name: &str) -> Result<Table, LoaderError>;
}

/// Opens an `.xlsx` workbook from a local path or a remote URL.
pub fn open_workbook(location: &str, options: ReadOptions) -> Result<XlsxWorkbook, LoaderError> {
    let workbook = XlsxWorkbook::open(location, options).with_prefix(&format!("Open workbook '{location}'"))?;
    tracing::info!(workbook = location, sheets = workbook.sheet_names().len(), "Opened workbook");
    Ok(workbook)
}
