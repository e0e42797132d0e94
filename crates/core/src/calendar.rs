//! Calendar arithmetic shared by the expander and the aggregator.
//!
//! Everything here works on `chrono::NaiveDate` (no time zone, daily
//! granularity). Functions that can run off the end of chrono's supported
//! range return `Option` instead of panicking.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::errors::CoreError;

/// Gregorian leap year rule. Years outside chrono's range are never leap.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|first| first.leap_year())
}

/// Number of days in `month` (1-12) of `year`. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    month_bounds(year, month).map_or(0, |(_, last)| last.day())
}

/// Build a date, clamping `day` to the last day of the month.
///
/// `clamped_date(2023, 2, 31)` is Feb 28, `clamped_date(2024, 2, 31)` is Feb 29.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let (first, last) = month_bounds(year, month).ok()?;
    first.with_day(day.clamp(1, last.day()))
}

/// Months since year 0, used to do month arithmetic as plain integers.
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Add `months` calendar months to `anchor`, keeping the anchor's day of month
/// and clamping it when the target month is shorter.
///
/// Always derive from the original anchor: stepping from an already clamped
/// date would lose the day (Jan 31 -> Feb 28 -> Mar 28).
pub fn add_months_clamped(anchor: NaiveDate, months: u64) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok()?;
    anchor.checked_add_months(Months::new(months))
}

/// Shift a date by a signed number of days.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// Unpadded forms like `2024-1-5` and surrounding whitespace are rejected.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, CoreError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(CoreError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Returns `true` if `value` is a valid `YYYY-MM-DD` calendar date.
pub fn is_iso_date(value: &str) -> bool {
    parse_iso_date(value).is_ok()
}

/// Format as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First and last day of a month. The last day is the day before the first
/// of the following month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let invalid = || CoreError::InvalidDate(format!("{year}-{month:02}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next_first| next_first.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

/// Step `(year, month)` forward by `offset` months.
pub fn shift_year_month(year: i32, month: u32, offset: u32) -> Option<(i32, u32)> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let index = i64::from(year) * 12 + i64::from(month - 1) + i64::from(offset);
    let y = i32::try_from(index.div_euclid(12)).ok()?;
    let m = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((y, m))
}
