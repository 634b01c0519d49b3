//! Row-level primitives shared by every entity processor.
//!
//! All functions take rows by reference and hand back new rows; nothing here
//! mutates its input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::constants::FORMATTED_SUFFIX;
use crate::types::{Row, Rows};

/// Offset timestamps RFC 3339 rejects, e.g. `+0000` without a colon
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive timestamp layouts accepted besides RFC 3339. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Display layout of the `_FORMATADO` twin (pt-BR, UTC)
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// How much of a parsed timestamp the canonical date field keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    /// Truncate to midnight UTC of the calendar day
    #[default]
    Day,
    /// Keep the full timestamp, millisecond precision
    Instant,
}

/// Convert the named date columns using day precision.
pub fn convert_dates(rows: &[Row], columns: &[&str]) -> Rows {
    convert_dates_with(rows, columns, DatePrecision::Day)
}

/// Convert the named date columns of every row.
///
/// A column that is present and truthy is parsed as a date. On success the
/// column is rewritten as an ISO-8601 UTC string and `<column>_FORMATADO`
/// receives the `dd/mm/yyyy` display value. On failure the column becomes
/// null and the display twin is removed. Absent or falsy columns are left
/// exactly as they were.
pub fn convert_dates_with(rows: &[Row], columns: &[&str], precision: DatePrecision) -> Rows {
    if columns.is_empty() {
        return rows.to_vec();
    }

    let mut failures: BTreeMap<&str, u64> = BTreeMap::new();

    let converted = rows
        .iter()
        .map(|row| {
            let mut next = row.clone();
            for &column in columns {
                let Some(value) = row.get(column) else {
                    continue;
                };
                if !is_truthy(value) {
                    continue;
                }

                let twin = format!("{}{}", column, FORMATTED_SUFFIX);
                match parse_date(value) {
                    Some(parsed) => {
                        let canonical = match precision {
                            DatePrecision::Day => truncate_to_day(parsed),
                            DatePrecision::Instant => parsed,
                        };
                        next.insert(
                            column.to_string(),
                            Value::String(canonical.to_rfc3339_opts(SecondsFormat::Millis, true)),
                        );
                        next.insert(
                            twin,
                            Value::String(parsed.format(DISPLAY_DATE_FORMAT).to_string()),
                        );
                    }
                    None => {
                        next.insert(column.to_string(), Value::Null);
                        next.shift_remove(&twin);
                        *failures.entry(column).or_insert(0) += 1;
                    }
                }
            }
            next
        })
        .collect();

    for (column, count) in failures {
        warn!(column, count, "Unparsable date values set to null");
        crate::observability::metrics::pipeline::unparsable_dates(column, count);
    }
    debug!(rows = rows.len(), columns = columns.len(), "Converted date columns");

    converted
}

/// Parse a scalar into a UTC timestamp.
///
/// Strings may be RFC 3339 (the offset colon is optional), a naive
/// `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]` or a bare `YYYY-MM-DD`; `/` is accepted as
/// the date separator. Numbers are milliseconds since the Unix epoch.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| Utc.timestamp_millis_opt(ms.trunc() as i64).single()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn truncate_to_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(dt)
}

/// Remove the named columns from every row. Absent columns are ignored.
pub fn drop_columns<S: AsRef<str>>(rows: &[Row], columns: &[S]) -> Rows {
    if columns.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .map(|row| {
            let mut next = row.clone();
            for column in columns {
                next.shift_remove(column.as_ref());
            }
            next
        })
        .collect()
}

/// Coerce any scalar to a finite number, falling back to zero.
pub fn to_number(value: &Value) -> f64 {
    try_number(value).unwrap_or(0.0)
}

/// Read a column as a number; absent columns count as zero.
pub fn column_number(row: &Row, column: &str) -> f64 {
    row.get(column).map(to_number).unwrap_or(0.0)
}

/// Numeric coercion that reports failure instead of zero-filling.
///
/// `None` for null, empty strings, unparsable strings, arrays, objects and
/// anything that parses to a non-finite value.
pub fn try_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Null => None,
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s.trim()),
        Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => i64::from_str_radix(&s[2..], radix).ok().map(|n| n as f64),
        None => s.parse::<f64>().ok(),
    }
}

/// Encode a computed number as JSON, integral values without a fraction.
pub fn number_value(n: f64) -> Value {
    if !n.is_finite() {
        return Value::from(0);
    }
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Truthiness of a scalar: null, false, zero, NaN and "" are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a scalar used when building lookup keys.
pub fn value_as_key(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.fract() == 0.0 && f.abs() < 9.0e15 {
                    (f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
        }
        other => other.to_string(),
    }
}

/// Trimmed, uppercased key of a column; empty when the column is absent.
pub fn normalized_key(row: &Row, column: &str) -> String {
    row.get(column)
        .map(value_as_key)
        .unwrap_or_default()
        .trim()
        .to_uppercase()
}

/// Rebuild a row with the named columns first, remaining columns after in
/// their original order.
pub fn move_to_front(row: &Row, columns: &[&str]) -> Row {
    let mut next = Row::new();
    for &column in columns {
        if let Some(value) = row.get(column) {
            next.insert(column.to_string(), value.clone());
        }
    }
    for (key, value) in row {
        if !next.contains_key(key) {
            next.insert(key.clone(), value.clone());
        }
    }
    next
}

/// Rebuild a row holding only the named columns, in the given order.
pub fn project_ordered<S: AsRef<str>>(row: &Row, columns: &[S]) -> Row {
    let mut next = Row::new();
    for column in columns {
        let column = column.as_ref();
        if let Some(value) = row.get(column) {
            next.insert(column.to_string(), value.clone());
        }
    }
    next
}
