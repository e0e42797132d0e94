pub mod entry;
pub mod range;
pub mod recurrence;
pub mod schedule;
pub mod settings;
pub mod totals;
