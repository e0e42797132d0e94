use serde::{Deserialize, Serialize};

/// Income, expense and net figures for one month (or any period).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expense: f64,
    /// Always `income - expense`.
    pub net: f64,
}

impl MonthlyTotals {
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}

/// One point of a month-by-month series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub totals: MonthlyTotals,
}
