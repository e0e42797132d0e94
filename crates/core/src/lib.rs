pub mod calendar;
pub mod errors;
pub mod models;
pub mod services;

use chrono::NaiveDate;
use models::{
    entry::Entry,
    range::DateRange,
    schedule::ScheduledOccurrence,
    settings::Settings,
    totals::{MonthlySnapshot, MonthlyTotals},
};
use services::{
    occurrence_service::OccurrenceService, schedule_service::ScheduleService,
    totals_service::TotalsService,
};

use errors::CoreError;

/// Main entry point for the cashflow core library.
///
/// Holds a snapshot of entries handed over by storage plus the planner
/// settings. Every query recomputes from the entries; nothing is cached.
#[must_use]
pub struct CashflowPlanner {
    entries: Vec<Entry>,
    settings: Settings,
    occurrence_service: OccurrenceService,
    totals_service: TotalsService,
    schedule_service: ScheduleService,
}

impl std::fmt::Debug for CashflowPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CashflowPlanner")
            .field("entries", &self.entries.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl CashflowPlanner {
    /// Planner over `entries` with default settings.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self::with_settings(entries, Settings::default())
    }

    pub fn with_settings(entries: Vec<Entry>, settings: Settings) -> Self {
        Self {
            entries,
            settings,
            occurrence_service: OccurrenceService::new(),
            totals_service: TotalsService::new(),
            schedule_service: ScheduleService::new(),
        }
    }

    // ── Entries ─────────────────────────────────────────────────────

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Income entries that take part in aggregation.
    #[must_use]
    pub fn incomes(&self) -> Vec<&Entry> {
        self.aggregated_entries()
            .filter(|e| e.kind.is_income())
            .collect()
    }

    /// Expense entries that take part in aggregation.
    #[must_use]
    pub fn expenses(&self) -> Vec<&Entry> {
        self.aggregated_entries()
            .filter(|e| e.kind.is_expense())
            .collect()
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    // ── Occurrences ─────────────────────────────────────────────────

    /// Dates on which `entry` occurs within `range`.
    pub fn occurrences(
        &self,
        entry: &Entry,
        range: &DateRange,
    ) -> Result<Vec<NaiveDate>, CoreError> {
        self.occurrence_service.occurrences(entry, range)
    }

    /// Upcoming scheduled transactions starting at `from`, over the configured
    /// window and row limit. Inactive entries are listed unless
    /// `skip_inactive` is set.
    pub fn upcoming(&self, from: NaiveDate) -> Result<Vec<ScheduledOccurrence>, CoreError> {
        self.schedule_service.upcoming(
            self.aggregated_entries(),
            from,
            self.settings.upcoming_window_days,
            self.settings.upcoming_limit,
        )
    }

    /// Next occurrence of each entry on or after `from`, soonest first.
    pub fn next_occurrences(&self, from: NaiveDate) -> Result<Vec<ScheduledOccurrence>, CoreError> {
        self.schedule_service
            .next_occurrences(self.aggregated_entries(), from)
    }

    // ── Totals ──────────────────────────────────────────────────────
    //
    // With `skip_inactive` off (the default) every entry is aggregated,
    // active or not.

    /// Exact totals for one calendar month.
    pub fn totals_for_month(&self, year: i32, month: u32) -> Result<MonthlyTotals, CoreError> {
        let incomes = self.incomes();
        let expenses = self.expenses();
        self.totals_service
            .totals_for_month(incomes.iter().copied(), expenses.iter().copied(), year, month)
    }

    /// Smoothed monthly totals. Independent of `year` and `month`.
    pub fn average_monthly_totals(
        &self,
        year: i32,
        month: u32,
    ) -> Result<MonthlyTotals, CoreError> {
        let incomes = self.incomes();
        let expenses = self.expenses();
        self.totals_service.average_monthly_totals(
            incomes.iter().copied(),
            expenses.iter().copied(),
            year,
            month,
            self.settings.average_window_months,
        )
    }

    /// Exact totals for `series_months` consecutive months.
    pub fn monthly_series(
        &self,
        start_year: i32,
        start_month: u32,
    ) -> Result<Vec<MonthlySnapshot>, CoreError> {
        let incomes = self.incomes();
        let expenses = self.expenses();
        self.totals_service.monthly_series(
            incomes.iter().copied(),
            expenses.iter().copied(),
            start_year,
            start_month,
            self.settings.series_months,
        )
    }

    /// Expense totals over `range` per category, largest first. Categories
    /// that sum to zero are left out.
    pub fn expense_distribution(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(Option<i64>, f64)>, CoreError> {
        let expenses = self.expenses();
        self.totals_service
            .expense_distribution(expenses.iter().copied(), range)
    }

    /// Per-year equivalent of a recurring entry, `None` for one-shot entries.
    pub fn annual_amount(&self, entry: &Entry) -> Result<Option<f64>, CoreError> {
        self.totals_service.annual_amount(entry)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn aggregated_entries(&self) -> impl Iterator<Item = &Entry> {
        let skip_inactive = self.settings.skip_inactive;
        self.entries
            .iter()
            .filter(move |e| !skip_inactive || e.active)
    }
}
