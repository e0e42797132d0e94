use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::errors::CoreError;

/// Closed date interval `[start, end]`, inclusive on both ends.
///
/// A range with `start > end` is valid and simply contains no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a range from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Ok(Self {
            start: calendar::parse_iso_date(start)?,
            end: calendar::parse_iso_date(end)?,
        })
    }

    /// The whole of `month` in `year`.
    pub fn month(year: i32, month: u32) -> Result<Self, CoreError> {
        let (start, end) = calendar::month_bounds(year, month)?;
        Ok(Self { start, end })
    }

    /// `start` plus the following `days` days (`window(d, 0)` is just `d`).
    /// Saturates at chrono's last representable date.
    pub fn window(start: NaiveDate, days: u32) -> Self {
        let end = calendar::add_days(start, i64::from(days)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
