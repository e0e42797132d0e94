use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entry::{Entry, EntryKind};

/// A single upcoming cash-flow event, ready for a scheduled-transactions list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOccurrence {
    pub date: NaiveDate,
    pub entry_id: Option<i64>,
    pub name: String,
    pub amount: f64,
    pub kind: EntryKind,
    /// `false` for one-shot entries.
    pub recurring: bool,
}

impl ScheduledOccurrence {
    pub fn from_entry(entry: &Entry, date: NaiveDate) -> Self {
        Self {
            date,
            entry_id: entry.id,
            name: entry.name.clone(),
            amount: entry.amount,
            kind: entry.kind.clone(),
            recurring: entry.is_recurring(),
        }
    }

    /// Amount signed by direction: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        if self.kind.is_income() {
            self.amount
        } else {
            -self.amount
        }
    }
}
