use std::collections::BTreeMap;

use crate::calendar;
use crate::errors::CoreError;
use crate::models::entry::Entry;
use crate::models::range::DateRange;
use crate::models::totals::{MonthlySnapshot, MonthlyTotals};
use crate::services::occurrence_service::OccurrenceService;

/// Computes income/expense/net figures from entry sets.
///
/// Two flavours:
/// - exact totals for a period, counting real occurrences via the expander
/// - a smoothed monthly average derived from each entry's annualized rate,
///   without walking any dates
///
/// Callers pass incomes and expenses as separate collections; the entries'
/// `active` flag is not consulted here.
pub struct TotalsService {
    occurrence_service: OccurrenceService,
}

impl TotalsService {
    pub fn new() -> Self {
        Self {
            occurrence_service: OccurrenceService::new(),
        }
    }

    /// Exact totals for calendar month `month` (1-12) of `year`.
    ///
    /// Each occurrence inside the month counts the entry's full amount.
    pub fn totals_for_month<'a>(
        &self,
        incomes: impl IntoIterator<Item = &'a Entry>,
        expenses: impl IntoIterator<Item = &'a Entry>,
        year: i32,
        month: u32,
    ) -> Result<MonthlyTotals, CoreError> {
        let range = DateRange::month(year, month)?;
        self.totals_for_range(incomes, expenses, &range)
    }

    /// Exact totals over an arbitrary closed range.
    pub fn totals_for_range<'a>(
        &self,
        incomes: impl IntoIterator<Item = &'a Entry>,
        expenses: impl IntoIterator<Item = &'a Entry>,
        range: &DateRange,
    ) -> Result<MonthlyTotals, CoreError> {
        let income = self.sum_occurrences(incomes, range)?;
        let expense = self.sum_occurrences(expenses, range)?;
        tracing::debug!(%range, income, expense, "computed totals");
        Ok(MonthlyTotals::new(income, expense))
    }

    /// Smoothed monthly figures: the sum of annualized amounts divided by 12.
    ///
    /// `year`, `month` and `months` are accepted for call-site symmetry with
    /// [`totals_for_month`](Self::totals_for_month) but do not influence the
    /// result: this is a steady-state rate, not a range-bounded actual.
    ///
    /// One-shot entries contribute their raw amount as if it were a yearly
    /// figure.
    pub fn average_monthly_totals<'a>(
        &self,
        incomes: impl IntoIterator<Item = &'a Entry>,
        expenses: impl IntoIterator<Item = &'a Entry>,
        year: i32,
        month: u32,
        months: u32,
    ) -> Result<MonthlyTotals, CoreError> {
        let annual_income = Self::sum_annualized(incomes)?;
        let annual_expense = Self::sum_annualized(expenses)?;
        tracing::debug!(
            year,
            month,
            months,
            annual_income,
            annual_expense,
            "computed average monthly totals"
        );
        Ok(MonthlyTotals::new(annual_income / 12.0, annual_expense / 12.0))
    }

    /// Per-year equivalent of a recurring entry, `None` for one-shot entries.
    pub fn annual_amount(&self, entry: &Entry) -> Result<Option<f64>, CoreError> {
        if entry.is_recurring() {
            Self::annualized(entry).map(Some)
        } else {
            entry.checked_amount().map(|_| None)
        }
    }

    /// Exact totals for `months` consecutive months starting at
    /// `start_year`/`start_month`.
    pub fn monthly_series<'a, I, E>(
        &self,
        incomes: I,
        expenses: E,
        start_year: i32,
        start_month: u32,
        months: u32,
    ) -> Result<Vec<MonthlySnapshot>, CoreError>
    where
        I: IntoIterator<Item = &'a Entry> + Clone,
        E: IntoIterator<Item = &'a Entry> + Clone,
    {
        let mut series = Vec::with_capacity(months as usize);
        for offset in 0..months {
            let (year, month) = calendar::shift_year_month(start_year, start_month, offset)
                .ok_or_else(|| {
                    CoreError::InvalidDate(format!(
                        "{start_year}-{start_month:02} + {offset} months"
                    ))
                })?;
            let totals = self.totals_for_month(incomes.clone(), expenses.clone(), year, month)?;
            series.push(MonthlySnapshot {
                year,
                month,
                totals,
            });
        }
        Ok(series)
    }

    /// Expense totals over `range` grouped by category, largest first.
    ///
    /// Entries without a category share the `None` group. Groups that sum to
    /// zero are dropped, so a range with no occurrences yields an empty list.
    pub fn expense_distribution<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Entry>,
        range: &DateRange,
    ) -> Result<Vec<(Option<i64>, f64)>, CoreError> {
        let mut groups: BTreeMap<Option<i64>, f64> = BTreeMap::new();
        for entry in expenses {
            let amount = entry.checked_amount()?;
            let count = self.occurrence_service.count_in_range(entry, range)?;
            *groups.entry(entry.category_id()).or_insert(0.0) += count as f64 * amount;
        }

        let mut distribution: Vec<(Option<i64>, f64)> =
            groups.into_iter().filter(|(_, total)| *total != 0.0).collect();
        distribution.sort_by(|a, b| b.1.total_cmp(&a.1));

        tracing::debug!(%range, groups = distribution.len(), "computed expense distribution");
        Ok(distribution)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn sum_occurrences<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a Entry>,
        range: &DateRange,
    ) -> Result<f64, CoreError> {
        let mut total = 0.0;
        for entry in entries {
            let amount = entry.checked_amount()?;
            let count = self.occurrence_service.count_in_range(entry, range)?;
            total += count as f64 * amount;
        }
        Ok(total)
    }

    fn sum_annualized<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Result<f64, CoreError> {
        let mut total = 0.0;
        for entry in entries {
            total += Self::annualized(entry)?;
        }
        Ok(total)
    }

    /// Yearly contribution of one entry; a one-shot counts its raw amount.
    fn annualized(entry: &Entry) -> Result<f64, CoreError> {
        let amount = entry.checked_amount()?;
        Ok(match entry.recurrence_frequency {
            Some(frequency) if !entry.one_shot => {
                amount * (frequency.periods_per_year() / f64::from(entry.interval()))
            }
            _ => amount,
        })
    }
}

impl Default for TotalsService {
    fn default() -> Self {
        Self::new()
    }
}
