//! Row-to-entity parsing helpers.
//!
//! `created_at` may hold either Rust's `to_rfc3339()` output or `SQLite`'s
//! `datetime('now')` default, so both formats are accepted.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DatabaseError;

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a required TEXT column as a calendar date.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Read an INTEGER column that must fit an `i32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the stored value is out of range.
pub fn get_i32(row: &libsql::Row, idx: i32) -> Result<i32, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    i32::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("column {idx} out of i32 range: {value}")))
}
