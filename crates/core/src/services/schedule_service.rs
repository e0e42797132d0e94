use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::entry::Entry;
use crate::models::range::DateRange;
use crate::models::schedule::ScheduledOccurrence;
use crate::services::occurrence_service::OccurrenceService;

/// Builds the list of upcoming scheduled transactions shown on dashboards.
pub struct ScheduleService {
    occurrence_service: OccurrenceService,
}

impl ScheduleService {
    pub fn new() -> Self {
        Self {
            occurrence_service: OccurrenceService::new(),
        }
    }

    /// Every occurrence of `entries` between `from` and `from + window_days`
    /// (inclusive), ordered by date, then name, then id, and cut at `limit`.
    ///
    /// Incomes and expenses are listed together; each row keeps its entry's
    /// kind.
    pub fn upcoming<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a Entry>,
        from: NaiveDate,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<ScheduledOccurrence>, CoreError> {
        let range = DateRange::window(from, window_days);
        let mut rows = Vec::new();
        for entry in entries {
            for date in self.occurrence_service.occurrences(entry, &range)? {
                rows.push(ScheduledOccurrence::from_entry(entry, date));
            }
        }

        rows.sort_by(schedule_order);
        rows.truncate(limit);

        tracing::debug!(%range, rows = rows.len(), "built upcoming schedule");
        Ok(rows)
    }

    /// Next date on or after `from` for each entry that still has one.
    /// Entries whose only occurrence is in the past are left out.
    pub fn next_occurrences<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a Entry>,
        from: NaiveDate,
    ) -> Result<Vec<ScheduledOccurrence>, CoreError> {
        let mut rows = Vec::new();
        for entry in entries {
            if let Some(date) = self.occurrence_service.next_occurrence(entry, from)? {
                rows.push(ScheduledOccurrence::from_entry(entry, date));
            }
        }
        rows.sort_by(schedule_order);
        Ok(rows)
    }
}

/// Date, then name, then entry id.
fn schedule_order(a: &ScheduledOccurrence, b: &ScheduledOccurrence) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.entry_id.cmp(&b.entry_id))
}

impl Default for ScheduleService {
    fn default() -> Self {
        Self::new()
    }
}
