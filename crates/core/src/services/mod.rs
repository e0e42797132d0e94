pub mod occurrence_service;
pub mod schedule_service;
pub mod totals_service;
