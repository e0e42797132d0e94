use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::recurrence::{Recurrence, RecurrenceFrequency};
use crate::calendar;
use crate::errors::CoreError;

/// Cash-flow direction of an entry.
///
/// Both variants are expanded identically; they only decide which bucket
/// (income or expense) an entry is summed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Income,
    Expense {
        /// Category reference owned by storage. Carried through unchanged.
        #[serde(default)]
        category_id: Option<i64>,
    },
}

impl EntryKind {
    pub fn is_income(&self) -> bool {
        matches!(self, EntryKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, EntryKind::Expense { .. })
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Income => write!(f, "Income"),
            EntryKind::Expense { .. } => write!(f, "Expense"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// Storage rows carry flags either as booleans or as `0`/`1` integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

/// Frequency strings go through [`RecurrenceFrequency::parse`], so a value it
/// does not recognise loads as `None` instead of failing the row.
fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Option<RecurrenceFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(RecurrenceFrequency::parse))
}

/// A recurring or one-off income/expense, as handed over by storage.
///
/// Entries are read-only inputs: no computation in this crate mutates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Storage identifier; `None` for drafts that were never persisted.
    #[serde(default)]
    pub id: Option<i64>,

    pub name: String,

    /// Amount per occurrence (currency-agnostic).
    pub amount: f64,

    /// First possible occurrence, `YYYY-MM-DD`. Anchor for all stepping.
    pub start_date: String,

    /// Occurs once on `start_date`, whatever the recurrence fields say.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub one_shot: bool,

    #[serde(default, deserialize_with = "deserialize_frequency")]
    pub recurrence_frequency: Option<RecurrenceFrequency>,

    /// Step multiplier. Missing or non-positive means 1.
    #[serde(default)]
    pub recurrence_interval: Option<i64>,

    /// Not used by the services. Callers (or the planner, when configured)
    /// decide whether inactive entries are aggregated.
    #[serde(default = "default_active", deserialize_with = "deserialize_flag")]
    pub active: bool,

    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub wallet_id: Option<i64>,

    pub kind: EntryKind,
}

impl Entry {
    /// One-shot income on `start_date`.
    pub fn income(name: impl Into<String>, amount: f64, start_date: impl Into<String>) -> Self {
        Self::new(EntryKind::Income, name, amount, start_date)
    }

    /// One-shot expense on `start_date`.
    pub fn expense(
        name: impl Into<String>,
        amount: f64,
        start_date: impl Into<String>,
        category_id: Option<i64>,
    ) -> Self {
        Self::new(EntryKind::Expense { category_id }, name, amount, start_date)
    }

    fn new(
        kind: EntryKind,
        name: impl Into<String>,
        amount: f64,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            amount,
            start_date: start_date.into(),
            one_shot: true,
            recurrence_frequency: None,
            recurrence_interval: None,
            active: true,
            note: None,
            wallet_id: None,
            kind,
        }
    }

    /// Turn this entry into a recurring one.
    #[must_use]
    pub fn recurring(mut self, frequency: RecurrenceFrequency, interval: i64) -> Self {
        self.one_shot = false;
        self.recurrence_frequency = Some(frequency);
        self.recurrence_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Recurrence interval with missing and non-positive values normalized to 1.
    pub fn interval(&self) -> u32 {
        match self.recurrence_interval {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    /// `true` when the entry actually repeats: not one-shot and a frequency is set.
    pub fn is_recurring(&self) -> bool {
        !self.one_shot && self.recurrence_frequency.is_some()
    }

    pub fn category_id(&self) -> Option<i64> {
        match self.kind {
            EntryKind::Expense { category_id } => category_id,
            EntryKind::Income => None,
        }
    }

    /// Parsed anchor date.
    pub fn anchor(&self) -> Result<NaiveDate, CoreError> {
        calendar::parse_iso_date(&self.start_date)
    }

    /// Amount, rejecting NaN and infinities.
    pub fn checked_amount(&self) -> Result<f64, CoreError> {
        if self.amount.is_finite() {
            Ok(self.amount)
        } else {
            Err(CoreError::InvalidAmount {
                name: self.name.clone(),
                amount: self.amount,
            })
        }
    }

    /// Resolve the entry's schedule.
    ///
    /// A non-one-shot entry without a frequency is treated as one-shot
    /// rather than rejected, since stored rows may be incomplete.
    pub fn recurrence(&self) -> Result<Recurrence, CoreError> {
        let anchor = self.anchor()?;
        match (self.one_shot, self.recurrence_frequency) {
            (false, Some(frequency)) => Ok(Recurrence::Repeating {
                anchor,
                frequency,
                interval: self.interval(),
            }),
            (false, None) => {
                tracing::warn!(
                    entry = %self.name,
                    id = ?self.id,
                    "recurring entry has no frequency, treating as one-shot"
                );
                Ok(Recurrence::Once(anchor))
            }
            (true, _) => Ok(Recurrence::Once(anchor)),
        }
    }
}
