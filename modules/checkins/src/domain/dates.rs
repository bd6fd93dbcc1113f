//! Calendar-date helpers.
//!
//! Dates are `YYYY-MM-DD` calendar tuples in the device's zone; nothing here
//! touches instants, so results do not drift with the time of day.

use chrono::NaiveDate;

use crate::domain::error::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The day before `today`, or `None` at the start of the calendar range.
pub fn yesterday(today: NaiveDate) -> Option<NaiveDate> {
    today.pred_opt()
}

/// Parse a strict `YYYY-MM-DD` literal.
///
/// chrono alone accepts unpadded fields (`2024-1-5`), so the shape is checked first.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(DomainError::invalid_date(value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DomainError::invalid_date(value))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Absolute number of calendar days separating `a` and `b`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> u64 {
    (a - b).num_days().unsigned_abs()
}
