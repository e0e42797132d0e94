use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Planner configuration. Every field has a default, so a partial (or empty)
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Drop inactive entries before aggregating. Off by default: the
    /// services never filter, and callers opt in here.
    pub skip_inactive: bool,

    /// How many days ahead the upcoming list looks.
    pub upcoming_window_days: u32,

    /// Maximum rows in the upcoming list.
    pub upcoming_limit: usize,

    /// Length of the month-by-month forecast series.
    pub series_months: u32,

    /// Passed as `months` to the average computation. Informational only:
    /// the smoothed average does not depend on it.
    pub average_window_months: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_inactive: false,
            upcoming_window_days: 30,
            upcoming_limit: 20,
            series_months: 12,
            average_window_months: 12,
        }
    }
}

impl Settings {
    /// Load settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
