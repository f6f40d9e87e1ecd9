//! Repairs the free-form report dates of the Diagnosis sheet.
//!
//! A value is normalized to `YYYY-MM-DD` when it parses as a date, read as a day
//! serial when it is five characters long, and otherwise rolled forward to the
//! first day of the following month when it looks like `<year>-<month>-<day>`.
//! Anything else is left alone.

use crate::database::value::Value;
use chrono::Duration;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

const DATE_FORMAT: &str = "%Y-%m-%d";

static DASHED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^-]+)-([^-]+)-([^-]+)$").expect("Hardcode regex pattern"));

/// Repaired replacement for one cell, `None` when the cell should stay as it is.
pub fn repair_value(value: &Value) -> Option<Value> {
    match value {
        Value::Date(date) => Some(Value::Text(date.format(DATE_FORMAT).to_string())),
        Value::Timestamp(timestamp) => Some(Value::Text(timestamp.date().format(DATE_FORMAT).to_string())),
        Value::Null => None,
        value => repair_date(&value.to_string()).map(Value::Text),
    }
}

pub fn repair_date(value: &str) -> Option<String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date.format(DATE_FORMAT).to_string());
    }
    if value.chars().count() == 5 {
        if let Some(date) = value.parse::<i64>().ok().and_then(from_serial) {
            return Some(date.format(DATE_FORMAT).to_string());
        }
    }
    roll_forward(value)
}

/// Moves `<year>-<month>-<day>` to the first of the next month.
/// Month 12 and above wrap to January of the next year.
pub fn roll_forward(value: &str) -> Option<String> {
    let captures = DASHED.captures(value)?;
    let (year, month) = (&captures[1], &captures[2]);
    let month = month.trim().parse::<i64>().ok()?;
    if month < 12 {
        Some(format!("{year}-{:02}-01", month + 1))
    } else {
        let year = year.trim().parse::<i64>().ok()?;
        Some(format!("{}-01-01", year.checked_add(1)?))
    }
}

/// Day serial counted from 1899-12-30.
fn from_serial(days: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::try_days(days)?)
}
