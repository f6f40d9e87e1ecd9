use crate::database::table::Table;
use crate::database::value::Value;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::SpreadsheetError;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Cells collected from one worksheet, with the bounding box of the data.
pub(crate) struct Sheet {
    /// Source workbook location
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, widening the data range to include it.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Builds a dataset: the first data row is the header, every later row that holds
    /// at least one value becomes a record. An empty sheet yields a table without columns.
    pub(crate) fn into_table(self, shared_strings: &[String]) -> Result<Table, SpreadsheetError> {
        let (Some(header_row), Some(col_lower), Some(col_upper)) = (self.row_lower_bound, self.col_lower_bound, self.col_upper_bound) else {
            return Ok(Table::new(&self.name, Vec::new()));
        };
        let width = col_upper - col_lower + 1;

        let mut header = vec![Value::Null; width];
        let mut records = BTreeMap::<usize, Vec<Value>>::new();
        for cell in &self.cells {
            let value = cell.to_value(shared_strings).map_err(|message| {
                SpreadsheetError::CellValueError(self.file_name.to_owned(), self.name.to_owned(), cell.reference(), message)
            })?;
            let slot = if cell.row == header_row {
                &mut header[cell.col - col_lower]
            } else {
                &mut records.entry(cell.row).or_insert_with(|| vec![Value::Null; width])[cell.col - col_lower]
            };
            *slot = value;
        }

        let mut table = Table::new(&self.name, column_names(header));
        for (_, record) in records {
            if record.iter().any(|value| !value.is_null()) {
                table.push_row(record);
            }
        }
        Ok(table)
    }
}

/// Turns header values into column names: blanks become `Unnamed: <index>`
/// and repeated names get a `.1`, `.2`, ... suffix.
fn column_names(header: Vec<Value>) -> Vec<String> {
    let mut seen = HashMap::<String, usize>::new();
    header
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let name = match value {
                Value::Null => format!("Unnamed: {index}"),
                value => value.to_string(),
            };
            let count = seen.entry(name.to_owned()).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{name}.{}", *count - 1)
            } else {
                name
            }
        })
        .collect()
}
