use chrono::NaiveDate;

use crate::calendar;
use crate::errors::CoreError;
use crate::models::entry::Entry;
use crate::models::range::DateRange;
use crate::models::recurrence::Recurrence;

/// Expands an entry into the concrete dates it occurs on.
///
/// Pure business logic: no I/O, no state. The cost per entry depends on the
/// number of occurrences inside the range, not on how far the range is from
/// the entry's anchor.
pub struct OccurrenceService;

impl OccurrenceService {
    pub fn new() -> Self {
        Self
    }

    /// All occurrences of `entry` within `range`, ascending and without
    /// duplicates.
    ///
    /// - One-shot entries (and recurring entries missing a frequency) yield
    ///   their `start_date` if it lies in the range.
    /// - Recurring entries are aligned to their own anchor, never to the
    ///   range start. Nothing is produced before the anchor.
    /// - An empty range (`start > end`) yields no dates.
    pub fn occurrences(
        &self,
        entry: &Entry,
        range: &DateRange,
    ) -> Result<Vec<NaiveDate>, CoreError> {
        let recurrence = entry.recurrence()?;
        let dates = Self::expand(&recurrence, range);
        tracing::trace!(
            entry = %entry.name,
            %range,
            count = dates.len(),
            "expanded occurrences"
        );
        Ok(dates)
    }

    /// String boundary form of [`occurrences`](Self::occurrences): takes and
    /// returns `YYYY-MM-DD` dates.
    pub fn occurrences_between(
        &self,
        entry: &Entry,
        start: &str,
        end: &str,
    ) -> Result<Vec<String>, CoreError> {
        let range = DateRange::parse(start, end)?;
        Ok(self
            .occurrences(entry, &range)?
            .into_iter()
            .map(calendar::format_iso_date)
            .collect())
    }

    /// Number of occurrences of `entry` in `range`.
    pub fn count_in_range(&self, entry: &Entry, range: &DateRange) -> Result<usize, CoreError> {
        Ok(self.occurrences(entry, range)?.len())
    }

    /// First occurrence on or after `date`, if the schedule has one.
    pub fn next_occurrence(
        &self,
        entry: &Entry,
        date: NaiveDate,
    ) -> Result<Option<NaiveDate>, CoreError> {
        let recurrence = entry.recurrence()?;
        let mut k = recurrence.first_index_on_or_after(date);
        while let Some(candidate) = recurrence.nth(k) {
            if candidate >= date {
                return Ok(Some(candidate));
            }
            k += 1;
        }
        Ok(None)
    }

    fn expand(recurrence: &Recurrence, range: &DateRange) -> Vec<NaiveDate> {
        if range.is_empty() {
            return Vec::new();
        }

        let mut dates = Vec::new();
        // Skip whole periods that end before the range, then walk.
        let mut k = recurrence.first_index_on_or_after(range.start);
        while let Some(date) = recurrence.nth(k) {
            if date > range.end {
                break;
            }
            if date >= range.start {
                dates.push(date);
            }
            k += 1;
        }
        dates
    }
}

impl Default for OccurrenceService {
    fn default() -> Self {
        Self::new()
    }
}
