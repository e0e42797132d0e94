use thiserror::Error;

/// Unified error type for the entire cashflow-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Computation ─────────────────────────────────────────────────
    /// An entry's `start_date`, a range boundary, or a year/month pair is
    /// not a well-formed ISO calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// An entry's amount is NaN or infinite.
    #[error("Invalid amount for entry '{name}': {amount}")]
    InvalidAmount { name: String, amount: f64 },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
