use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;

/// How often a recurring entry repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurrenceFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceFrequency {
    /// Parse a stored frequency value (`WEEKLY`, `monthly`, ...).
    /// Unknown values yield `None` so the entry falls back to one-shot.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Occurrences per year at interval 1, used for annualizing.
    pub fn periods_per_year(self) -> f64 {
        match self {
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
            Self::Yearly => 1.0,
        }
    }
}

impl std::fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "WEEKLY"),
            Self::Monthly => write!(f, "MONTHLY"),
            Self::Yearly => write!(f, "YEARLY"),
        }
    }
}

/// Resolved schedule of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Once(NaiveDate),
    Repeating {
        anchor: NaiveDate,
        frequency: RecurrenceFrequency,
        /// Always >= 1.
        interval: u32,
    },
}

impl Recurrence {
    pub fn anchor(&self) -> NaiveDate {
        match *self {
            Recurrence::Once(date) => date,
            Recurrence::Repeating { anchor, .. } => anchor,
        }
    }

    /// The `k`-th occurrence (0 is the anchor), or `None` past the end of the
    /// schedule or of chrono's date range.
    ///
    /// Every occurrence is derived from the anchor, so month-end clamping in
    /// one period never shifts the day of later periods.
    pub fn nth(&self, k: u64) -> Option<NaiveDate> {
        match *self {
            Recurrence::Once(date) => (k == 0).then_some(date),
            Recurrence::Repeating {
                anchor,
                frequency,
                interval,
            } => {
                let steps = k.checked_mul(u64::from(interval))?;
                match frequency {
                    RecurrenceFrequency::Weekly => {
                        let days = i64::try_from(steps.checked_mul(7)?).ok()?;
                        calendar::add_days(anchor, days)
                    }
                    RecurrenceFrequency::Monthly => calendar::add_months_clamped(anchor, steps),
                    RecurrenceFrequency::Yearly => {
                        calendar::add_months_clamped(anchor, steps.checked_mul(12)?)
                    }
                }
            }
        }
    }

    /// Closed-form lower bound on the index of the first occurrence on or after
    /// `date`. `nth(result)` may still be slightly before `date` for monthly and
    /// yearly schedules (clamped or earlier day); it is never past the first
    /// qualifying occurrence.
    pub fn first_index_on_or_after(&self, date: NaiveDate) -> u64 {
        match *self {
            Recurrence::Once(_) => 0,
            Recurrence::Repeating {
                anchor,
                frequency,
                interval,
            } => {
                if date <= anchor {
                    return 0;
                }
                let interval = i64::from(interval);
                let periods = match frequency {
                    RecurrenceFrequency::Weekly => {
                        let step = 7 * interval;
                        let days = (date - anchor).num_days();
                        (days + step - 1) / step
                    }
                    RecurrenceFrequency::Monthly => {
                        (calendar::month_index(date) - calendar::month_index(anchor)) / interval
                    }
                    RecurrenceFrequency::Yearly => {
                        (i64::from(date.year()) - i64::from(anchor.year())) / interval
                    }
                };
                u64::try_from(periods).unwrap_or(0)
            }
        }
    }
}
