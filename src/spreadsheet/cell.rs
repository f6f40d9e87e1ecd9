use crate::database::value::Value;
use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Analyzes format codes for date/time patterns, skipping literals, escapes and `[...]` sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    fn is_1904(&self) -> bool {
        matches!(self, Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904)
    }
}

/// Represents a single cell in a spreadsheet with position, type, and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the worksheet
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts the stored text to a typed value, resolving shared strings and serial dates.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Result<Value, String> {
        match self.kind {
            CellType::Empty | CellType::Error => Ok(Value::Null),
            CellType::Boolean => Ok(Value::Boolean(self.value == "1" || self.value.eq_ignore_ascii_case("true"))),
            CellType::Number => match self.value.parse::<i64>() {
                Ok(integer) => Ok(Value::Integer(integer)),
                Err(_) => self.to_double().map(Value::Double),
            },
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                Ok(Value::Date(self.to_datetime()?.date()))
            }
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                Ok(Value::Timestamp(self.to_datetime()?))
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                Ok(Value::Time(self.to_datetime()?.time()))
            }
            CellType::IsoDateTime => self.parse_iso_datetime(),
            CellType::InlineString => Ok(Value::Text(self.value.to_owned())),
            CellType::SharedString => {
                let index = self.value
                    .parse::<usize>()
                    .map_err(|_| format!("parse shared string index '{}' failed", self.value))?;
                shared_strings
                    .get(index)
                    .map(|string| Value::Text(string.to_owned()))
                    .ok_or_else(|| format!("shared string {index} out of range"))
            }
        }
    }

    /// Converts cell value to double-precision floating point.
    fn to_double(&self) -> Result<f64, String> {
        self.value.parse::<f64>().map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    /// Converts an Excel serial number to a date and time.
    /// The 1900 system counts from 1899-12-30 and carries the Lotus 1-2-3 leap year bug,
    /// so serials before 60 are shifted by one day.
    fn to_datetime(&self) -> Result<NaiveDateTime, String> {
        let serial = self.to_double()?;
        let days = serial.trunc() as i64;
        let offset = if self.kind.is_1904() {
            1462
        } else if days < 60 {
            1
        } else {
            0
        };
        let microseconds = (serial.fract() * 86_400_000_000f64).round() as i64;
        NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
            .zip(days.checked_add(offset).and_then(Duration::try_days))
            .and_then(|(epoch, days)| {
                let delta = days.checked_add(&Duration::microseconds(microseconds))?;
                epoch.checked_add_signed(delta)
            })
            .ok_or_else(|| format!("serial date '{}' out of range", self.value))
    }

    fn parse_iso_datetime(&self) -> Result<Value, String> {
        if self.value.contains('T') {
            NaiveDateTime::parse_from_str(&self.value, "%Y-%m-%dT%H:%M:%S%.f")
                .map(Value::Timestamp)
                .map_err(|_| format!("parse '{}' to NaiveDateTime failed", self.value))
        } else {
            NaiveDate::parse_from_str(&self.value, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| format!("parse '{}' to NaiveDate failed", self.value))
        }
    }
}
