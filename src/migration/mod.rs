//! Loads workbook sheets into their destination tables.
//!
//! Each sheet is read into a [`Table`](crate::database::table::Table), transformed
//! according to its [`SheetSpec`] and written through a [`Target`]. Sheets are loaded
//! independently and in order; a failing sheet aborts the run without undoing the
//! sheets written before it.

pub mod date_repair;
pub mod sheets;
pub mod transform;

use crate::database::target::Target;
use crate::error::LoaderError;
use crate::error::ResultMessage;
use crate::spreadsheet::Spreadsheet;

pub use sheets::sheet_spec;
pub use sheets::SheetSpec;
pub use sheets::VACCINE_SHEETS;

/// One sheet written to one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLoad {
    pub sheet: String,
    pub table: String,
    pub rows: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loads: Vec<SheetLoad>,
}

impl LoadReport {
    pub fn total_rows(&self) -> usize {
        self.loads.iter().map(|load| load.rows).sum()
    }
}

/// Reads, transforms and writes a single sheet.
pub fn load_sheet<S, T>(workbook: &mut S, target: &mut T, spec: &SheetSpec) -> Result<SheetLoad, LoaderError>
where
    S: Spreadsheet + ?Sized,
    T: Target + ?Sized,
{
    let context = format!("Load sheet '{}' into '{}'", spec.sheet, spec.table);
    let mut table = workbook.read_sheet(spec.sheet).with_prefix(&context)?;
    // Sheets with a required column fail here when blank, before any write.
    let summary = transform::apply(spec, &mut table).map_err(LoaderError::from).with_prefix(&context)?;
    if table.columns.is_empty() {
        tracing::warn!(sheet = spec.sheet, "Sheet is empty, nothing to load");
        return Ok(SheetLoad {
            sheet: spec.sheet.to_owned(),
            table: spec.table.to_owned(),
            rows: 0,
        });
    }

    tracing::debug!(
        sheet = spec.sheet,
        filled = summary.filled,
        repaired = summary.repaired,
        renamed = summary.renamed,
        "Transformed sheet"
    );

    let rows = target.write_table(&table, spec.table, spec.mode).with_prefix(&context)?;
    tracing::info!(sheet = spec.sheet, table = spec.table, rows, mode = ?spec.mode, "Loaded sheet");
    Ok(SheetLoad {
        sheet: spec.sheet.to_owned(),
        table: spec.table.to_owned(),
        rows,
    })
}

/// Loads every sheet in `specs` in order, stopping at the first failure.
pub fn load_workbook<S, T>(workbook: &mut S, target: &mut T, specs: &[SheetSpec]) -> Result<LoadReport, LoaderError>
where
    S: Spreadsheet + ?Sized,
    T: Target + ?Sized,
{
    let mut report = LoadReport::default();
    for spec in specs {
        report.loads.push(load_sheet(workbook, target, spec)?);
    }
    tracing::info!(workbook = workbook.location(), sheets = report.loads.len(), rows = report.total_rows(), "Workbook loaded");
    Ok(report)
}
