use crate::database::column::Column;
use crate::database::column::ColumnType;
use crate::database::value::Value;

/// A dataset read from one sheet: ordered column names and ordered rows.
/// Every row holds exactly one value per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Table/sheet name
    pub name: String,
    /// Column names in sheet order
    pub columns: Vec<String>,
    /// Rows in sheet order
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<String>) -> Self {
        Table {
            name: name.to_owned(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matching names exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Values of one column in row order, `None` when the column is absent.
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Replaces every null with `replacement` and returns how many cells changed.
    pub fn fill_nulls(&mut self, replacement: &Value) -> usize {
        let mut filled = 0usize;
        for value in self.rows.iter_mut().flatten().filter(|value| value.is_null()) {
            *value = replacement.to_owned();
            filled += 1;
        }
        filled
    }

    /// Renames columns by an old → new mapping and returns how many were renamed.
    /// Old names are compared after trimming surrounding whitespace; absent names are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) -> usize {
        let mut renamed = 0usize;
        for column in self.columns.iter_mut() {
            if let Some((_, new_name)) = renames.iter().find(|(old_name, _)| column.trim() == *old_name) {
                *column = (*new_name).to_owned();
                renamed += 1;
            }
        }
        renamed
    }

    /// Rewrites every value of a column in place.
    /// Returns `Ok(false)` without calling `f` when the column does not exist.
    pub fn map_column<F, E>(&mut self, name: &str, mut f: F) -> Result<bool, E>
    where
        F: FnMut(usize, &Value) -> Result<Value, E>,
    {
        let Some(index) = self.column_index(name) else {
            return Ok(false);
        };
        for (row_index, row) in self.rows.iter_mut().enumerate() {
            row[index] = f(row_index, &row[index])?;
        }
        Ok(true)
    }

    /// Column definitions with types detected from the current values.
    pub fn schema(&self) -> Vec<Column> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, name)| Column {
                name: name.to_owned(),
                kind: ColumnType::detect(self.rows.iter().map(|row| ColumnType::from(&row[index])).collect()),
            })
            .collect()
    }
}
