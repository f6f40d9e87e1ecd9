use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use duckdb::types::Value as SqlValue;
use std::fmt::Display;

/// A single typed value of a loaded dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts to the value bound into an insert statement.
    /// Temporal values travel as ISO text and are cast by the database to the column type.
    pub(crate) fn to_sql_value(&self) -> SqlValue {
        match self {
            Value::Null => SqlValue::Null,
            Value::Boolean(value) => SqlValue::Boolean(*value),
            Value::Integer(value) => SqlValue::BigInt(*value),
            Value::Double(value) => SqlValue::Double(*value),
            Value::Text(value) => SqlValue::Text(value.to_owned()),
            Value::Date(value) => SqlValue::Text(value.format("%Y-%m-%d").to_string()),
            Value::Time(value) => SqlValue::Text(value.format("%H:%M:%S%.f").to_string()),
            Value::Timestamp(value) => SqlValue::Text(value.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        }
    }
}

impl Display for Value {
    /// Whole doubles keep a trailing `.0` so `43831.0` never reads like the integer `43831`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Double(value) if value.is_finite() && value.fract() == 0.0 => write!(f, "{value:.1}"),
            Value::Double(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value}"),
            Value::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Value::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
            Value::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<Option<bool>> for Value {
    fn from(value: Option<bool>) -> Self {
        value.map(Value::Boolean).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_spreadsheet_text() {
        assert_eq!(Value::Integer(43831).to_string(), "43831");
        assert_eq!(Value::Double(43831.0).to_string(), "43831.0");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2021-03-07");
        assert_eq!(Value::Timestamp(date.and_hms_opt(8, 30, 0).unwrap()).to_string(), "2021-03-07 08:30:00");
    }

    #[test]
    fn temporal_values_bind_as_iso_text() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(Value::Date(date).to_sql_value(), SqlValue::Text("2021-03-07".to_owned()));
        assert_eq!(Value::Null.to_sql_value(), SqlValue::Null);
        assert_eq!(Value::from(Some(true)).to_sql_value(), SqlValue::Boolean(true));
        assert_eq!(Value::from(None::<bool>), Value::Null);
    }
}
