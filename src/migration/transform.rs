use crate::database::table::Table;
use crate::database::value::Value;
use crate::migration::date_repair::repair_value;
use crate::migration::sheets::SheetSpec;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Column '{1}' missing from sheet '{0}'")]
    MissingColumnError(String, String),

    #[error("Cannot read '{value}' as boolean in sheet '{sheet}' column '{column}' row {row}")]
    BooleanCoercionError {
        sheet: String,
        column: String,
        row: usize,
        value: String,
    },
}

/// Counts of what [`apply`] changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub filled: usize,
    pub repaired: usize,
    pub renamed: usize,
}

/// Applies a sheet's transforms in load order:
/// null fill, date repair, renames, then boolean coercion on the renamed column.
pub fn apply(spec: &SheetSpec, table: &mut Table) -> Result<TransformSummary, TransformError> {
    let mut summary = TransformSummary {
        filled: table.fill_nulls(&Value::Integer(0)),
        ..Default::default()
    };

    if let Some(column) = spec.date_repair_column {
        let found = table.map_column(column, |_, value| {
            Ok::<_, TransformError>(match repair_value(value) {
                Some(repaired) => {
                    summary.repaired += 1;
                    repaired
                }
                None => value.to_owned(),
            })
        })?;
        if !found {
            Err(TransformError::MissingColumnError(spec.sheet.to_owned(), column.to_owned()))?
        }
    }

    summary.renamed = table.rename_columns(spec.renames);

    if let Some(column) = spec.boolean_column {
        let found = table.map_column(column, |row, value| {
            coerce_boolean(value).ok_or_else(|| TransformError::BooleanCoercionError {
                sheet: spec.sheet.to_owned(),
                column: column.to_owned(),
                row,
                value: value.to_string(),
            })
        })?;
        if !found {
            Err(TransformError::MissingColumnError(spec.sheet.to_owned(), column.to_owned()))?
        }
    }

    Ok(summary)
}

/// Reads a value as a tri-state boolean. Nulls stay unset; `None` means the value is not a boolean.
pub fn coerce_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Null),
        Value::Boolean(value) => Some(Value::Boolean(*value)),
        Value::Integer(value) => Some(Value::Boolean(*value != 0)),
        Value::Double(value) if !value.is_nan() => Some(Value::Boolean(*value != 0.0)),
        Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(Value::Boolean(true)),
            "false" | "no" | "0" => Some(Value::Boolean(false)),
            _ => None,
        },
        _ => None,
    }
}
