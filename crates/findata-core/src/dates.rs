//! Calendar date range helpers and key-safe date formatting.

use chrono::{Duration, NaiveDate};

use crate::error::{DataError, Result};

/// Earliest year accepted by the range helpers.
const MIN_YEAR: i32 = 2000;

/// Maximum number of days a year range may be extended by.
const MAX_EXTEND_DAYS: i64 = 350;

/// Returns the first and last day of `year`, with the end date extended by
/// `extend_by_days`.
///
/// # Errors
///
/// Returns [`DataError::InvalidParameter`] if `year` is before 2000 or the
/// extension exceeds 350 days.
pub fn year_range(year: i32, extend_by_days: i64) -> Result<(NaiveDate, NaiveDate)> {
    validate_year(year)?;
    if !(0..=MAX_EXTEND_DAYS).contains(&extend_by_days) {
        return Err(DataError::InvalidParameter(format!(
            "extend_by_days must be between 0 and {MAX_EXTEND_DAYS}, got {extend_by_days}"
        )));
    }

    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| DataError::InvalidParameter(format!("invalid year: {year}")))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| DataError::InvalidParameter(format!("invalid year: {year}")))?
        + Duration::days(extend_by_days);
    Ok((start, end))
}

/// Returns the first and last calendar day of the given month.
///
/// # Errors
///
/// Returns [`DataError::InvalidParameter`] if `year` is before 2000 or
/// `month` is outside 1-12.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    validate_year(year)?;
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        DataError::InvalidParameter(format!("month must be between 1 and 12, got {month}"))
    })?;
    // First of the following month, minus one day.
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next.ok_or_else(|| DataError::InvalidParameter(format!("invalid year: {year}")))?
        - Duration::days(1);
    Ok((start, end))
}

/// Renders a date as `YYYYMMDD`, the normalized form used in cache keys.
#[must_use]
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn validate_year(year: i32) -> Result<()> {
    if year < MIN_YEAR {
        return Err(DataError::InvalidParameter(format!(
            "year must be {MIN_YEAR} or later, got {year}"
        )));
    }
    Ok(())
}
