use cashflow_core::calendar;
use cashflow_core::errors::CoreError;
use cashflow_core::models::entry::{Entry, EntryKind};
use cashflow_core::models::range::DateRange;
use cashflow_core::models::recurrence::{Recurrence, RecurrenceFrequency};
use cashflow_core::models::schedule::ScheduledOccurrence;
use cashflow_core::models::settings::Settings;
use cashflow_core::models::totals::MonthlyTotals;
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  RecurrenceFrequency
// ═══════════════════════════════════════════════════════════════════

mod recurrence_frequency {
    use super::*;

    #[test]
    fn display_is_uppercase() {
        assert_eq!(RecurrenceFrequency::Weekly.to_string(), "WEEKLY");
        assert_eq!(RecurrenceFrequency::Monthly.to_string(), "MONTHLY");
        assert_eq!(RecurrenceFrequency::Yearly.to_string(), "YEARLY");
    }

    #[test]
    fn parse_is_lenient_about_case() {
        assert_eq!(RecurrenceFrequency::parse("weekly"), Some(RecurrenceFrequency::Weekly));
        assert_eq!(RecurrenceFrequency::parse(" Monthly "), Some(RecurrenceFrequency::Monthly));
        assert_eq!(RecurrenceFrequency::parse("YEARLY"), Some(RecurrenceFrequency::Yearly));
        assert_eq!(RecurrenceFrequency::parse("DAILY"), None);
        assert_eq!(RecurrenceFrequency::parse(""), None);
    }

    #[test]
    fn serde_uses_storage_names() {
        let json = serde_json::to_string(&RecurrenceFrequency::Monthly).unwrap();
        assert_eq!(json, "\"MONTHLY\"");
        let back: RecurrenceFrequency = serde_json::from_str("\"WEEKLY\"").unwrap();
        assert_eq!(back, RecurrenceFrequency::Weekly);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Recurrence
// ═══════════════════════════════════════════════════════════════════

mod recurrence {
    use super::*;

    #[test]
    fn once_has_single_index() {
        let r = Recurrence::Once(d(2024, 5, 1));
        assert_eq!(r.nth(0), Some(d(2024, 5, 1)));
        assert_eq!(r.nth(1), None);
        assert_eq!(r.first_index_on_or_after(d(2030, 1, 1)), 0);
    }

    #[test]
    fn nth_derives_from_anchor() {
        let r = Recurrence::Repeating {
            anchor: d(2024, 1, 31),
            frequency: RecurrenceFrequency::Monthly,
            interval: 1,
        };
        assert_eq!(r.nth(1), Some(d(2024, 2, 29)));
        assert_eq!(r.nth(2), Some(d(2024, 3, 31)));
        assert_eq!(r.nth(13), Some(d(2025, 2, 28)));
    }

    #[test]
    fn weekly_lower_bound_is_exact() {
        let r = Recurrence::Repeating {
            anchor: d(2024, 1, 1),
            frequency: RecurrenceFrequency::Weekly,
            interval: 1,
        };
        assert_eq!(r.first_index_on_or_after(d(2024, 1, 8)), 1);
        assert_eq!(r.first_index_on_or_after(d(2024, 1, 9)), 2);
        assert_eq!(r.first_index_on_or_after(d(2023, 1, 9)), 0);
    }

    #[test]
    fn monthly_lower_bound_never_overshoots() {
        let r = Recurrence::Repeating {
            anchor: d(2020, 3, 20),
            frequency: RecurrenceFrequency::Monthly,
            interval: 5,
        };
        for target in [d(2024, 1, 1), d(2024, 6, 25), d(2031, 12, 31)] {
            let k = r.first_index_on_or_after(target);
            if k > 0 {
                assert!(r.nth(k - 1).unwrap() < target);
            }
        }
    }

    #[test]
    fn yearly_overflow_is_none() {
        let r = Recurrence::Repeating {
            anchor: d(2024, 1, 1),
            frequency: RecurrenceFrequency::Yearly,
            interval: u32::MAX,
        };
        assert_eq!(r.nth(1_000_000), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Entry
// ═══════════════════════════════════════════════════════════════════

mod entry {
    use super::*;

    #[test]
    fn constructors_default_to_one_shot_active() {
        let e = Entry::income("Bonus", 300.0, "2024-06-01");
        assert!(e.one_shot);
        assert!(e.active);
        assert_eq!(e.id, None);
        assert_eq!(e.kind, EntryKind::Income);
        assert!(!e.is_recurring());
    }

    #[test]
    fn recurring_builder() {
        let e = Entry::expense("Rent", 900.0, "2024-01-01", Some(4))
            .recurring(RecurrenceFrequency::Monthly, 1)
            .with_id(12)
            .with_note("flat");
        assert!(!e.one_shot);
        assert!(e.is_recurring());
        assert_eq!(e.id, Some(12));
        assert_eq!(e.note.as_deref(), Some("flat"));
        assert_eq!(e.category_id(), Some(4));
    }

    #[test]
    fn interval_normalization() {
        let mut e = Entry::income("X", 1.0, "2024-01-01");
        assert_eq!(e.interval(), 1);
        e.recurrence_interval = Some(0);
        assert_eq!(e.interval(), 1);
        e.recurrence_interval = Some(-4);
        assert_eq!(e.interval(), 1);
        e.recurrence_interval = Some(3);
        assert_eq!(e.interval(), 3);
        e.recurrence_interval = Some(i64::MAX);
        assert_eq!(e.interval(), u32::MAX);
    }

    #[test]
    fn recurrence_resolution() {
        let e = Entry::income("X", 1.0, "2024-01-31").recurring(RecurrenceFrequency::Weekly, 2);
        assert_eq!(
            e.recurrence().unwrap(),
            Recurrence::Repeating {
                anchor: d(2024, 1, 31),
                frequency: RecurrenceFrequency::Weekly,
                interval: 2,
            }
        );

        let mut missing = e.clone();
        missing.recurrence_frequency = None;
        assert_eq!(missing.recurrence().unwrap(), Recurrence::Once(d(2024, 1, 31)));
    }

    #[test]
    fn invalid_start_date() {
        let e = Entry::income("X", 1.0, "31/01/2024");
        assert_eq!(e.anchor(), Err(CoreError::InvalidDate("31/01/2024".into())));
    }

    #[test]
    fn checked_amount() {
        assert_eq!(Entry::income("X", -5.0, "2024-01-01").checked_amount(), Ok(-5.0));
        assert!(Entry::income("X", f64::NAN, "2024-01-01").checked_amount().is_err());
        assert!(Entry::income("X", f64::NEG_INFINITY, "2024-01-01").checked_amount().is_err());
    }

    #[test]
    fn deserializes_storage_row_with_defaults() {
        let json = r#"{
            "id": 7,
            "name": "Rent",
            "amount": 850.5,
            "start_date": "2024-02-01",
            "recurrence_frequency": "MONTHLY",
            "recurrence_interval": 1,
            "kind": { "Expense": { "category_id": 3 } }
        }"#;
        let e: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, Some(7));
        assert!(!e.one_shot);
        assert!(e.active);
        assert_eq!(e.recurrence_frequency, Some(RecurrenceFrequency::Monthly));
        assert_eq!(e.category_id(), Some(3));
        assert_eq!(e.wallet_id, None);
    }

    fn row(fields: &str) -> Entry {
        let json = format!(
            r#"{{
                "name": "Row",
                "amount": 10.0,
                "start_date": "2024-01-15",
                "kind": "Income",
                {fields}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn unknown_frequency_loads_as_one_shot() {
        let e = row(r#""one_shot": false, "recurrence_frequency": "DAILY""#);
        assert_eq!(e.recurrence_frequency, None);
        assert!(!e.is_recurring());
        assert_eq!(e.recurrence().unwrap(), Recurrence::Once(d(2024, 1, 15)));
    }

    #[test]
    fn frequency_is_read_case_insensitively() {
        let e = row(r#""recurrence_frequency": "monthly""#);
        assert_eq!(e.recurrence_frequency, Some(RecurrenceFrequency::Monthly));
        let e = row(r#""recurrence_frequency": " Weekly ""#);
        assert_eq!(e.recurrence_frequency, Some(RecurrenceFrequency::Weekly));
    }

    #[test]
    fn empty_or_null_frequency_is_none() {
        assert_eq!(row(r#""recurrence_frequency": """#).recurrence_frequency, None);
        assert_eq!(row(r#""recurrence_frequency": null"#).recurrence_frequency, None);
    }

    #[test]
    fn integer_flags() {
        let e = row(r#""one_shot": 0, "active": 1, "recurrence_frequency": "YEARLY""#);
        assert!(!e.one_shot);
        assert!(e.active);
        assert!(e.is_recurring());

        let e = row(r#""one_shot": 1, "active": 0, "recurrence_frequency": "YEARLY""#);
        assert!(e.one_shot);
        assert!(!e.active);
        assert!(!e.is_recurring());
    }

    #[test]
    fn non_flag_values_are_rejected() {
        let json = r#"{"name": "Row", "amount": 1.0, "start_date": "2024-01-15",
            "kind": "Income", "one_shot": "yes"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn serde_roundtrip_keeps_pass_through_fields() {
        let mut e = Entry::expense("Phone", 19.99, "2024-03-05", Some(11))
            .recurring(RecurrenceFrequency::Monthly, 1)
            .with_note("family plan");
        e.wallet_id = Some(2);
        let json = serde_json::to_string(&e).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn kind_display() {
        assert_eq!(EntryKind::Income.to_string(), "Income");
        assert_eq!(EntryKind::Expense { category_id: None }.to_string(), "Expense");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DateRange
// ═══════════════════════════════════════════════════════════════════

mod date_range {
    use super::*;

    #[test]
    fn month_range_uses_last_day() {
        assert_eq!(
            DateRange::month(2024, 2).unwrap(),
            DateRange::new(d(2024, 2, 1), d(2024, 2, 29))
        );
        assert_eq!(
            DateRange::month(2023, 2).unwrap(),
            DateRange::new(d(2023, 2, 1), d(2023, 2, 28))
        );
        assert_eq!(
            DateRange::month(2024, 12).unwrap(),
            DateRange::new(d(2024, 12, 1), d(2024, 12, 31))
        );
    }

    #[test]
    fn contains_is_inclusive() {
        let r = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
        assert!(r.contains(d(2024, 1, 1)));
        assert!(r.contains(d(2024, 1, 31)));
        assert!(!r.contains(d(2024, 2, 1)));
        assert!(!r.is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = DateRange::new(d(2024, 2, 1), d(2024, 1, 1));
        assert!(r.is_empty());
        assert!(!r.contains(d(2024, 1, 15)));
    }

    #[test]
    fn window() {
        assert_eq!(
            DateRange::window(d(2024, 2, 20), 10),
            DateRange::new(d(2024, 2, 20), d(2024, 3, 1))
        );
        assert_eq!(DateRange::window(NaiveDate::MAX, 5).end, NaiveDate::MAX);
    }

    #[test]
    fn parse_rejects_bad_boundaries() {
        assert!(DateRange::parse("2024-01-01", "2024-01-31").is_ok());
        assert!(matches!(
            DateRange::parse("2024-01-01", "Jan 31"),
            Err(CoreError::InvalidDate(_))
        ));
    }

    #[test]
    fn display() {
        let r = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(r.to_string(), "2024-01-01..=2024-01-31");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MonthlyTotals / ScheduledOccurrence
// ═══════════════════════════════════════════════════════════════════

mod totals {
    use super::*;

    #[test]
    fn net_is_income_minus_expense() {
        let t = MonthlyTotals::new(1500.0, 1750.0);
        assert_eq!(t.net, -250.0);
    }

    #[test]
    fn default_is_zero() {
        let t = MonthlyTotals::default();
        assert_eq!((t.income, t.expense, t.net), (0.0, 0.0, 0.0));
    }
}

mod scheduled_occurrence {
    use super::*;

    #[test]
    fn from_entry_copies_identity() {
        let e = Entry::income("Salary", 2000.0, "2024-01-27")
            .recurring(RecurrenceFrequency::Monthly, 1)
            .with_id(5);
        let row = ScheduledOccurrence::from_entry(&e, d(2024, 2, 27));
        assert_eq!(row.entry_id, Some(5));
        assert_eq!(row.name, "Salary");
        assert_eq!(row.date, d(2024, 2, 27));
        assert!(row.recurring);
        assert_eq!(row.signed_amount(), 2000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(!s.skip_inactive);
        assert_eq!(s.upcoming_window_days, 30);
        assert_eq!(s.upcoming_limit, 20);
        assert_eq!(s.series_months, 12);
        assert_eq!(s.average_window_months, 12);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "skip_inactive": true, "upcoming_limit": 5 }"#).unwrap();
        assert!(s.skip_inactive);
        assert_eq!(s.upcoming_limit, 5);
        assert_eq!(s.upcoming_window_days, 30);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Calendar helpers
// ═══════════════════════════════════════════════════════════════════

mod calendar_helpers {
    use super::*;

    #[test]
    fn iso_roundtrip() {
        let date = calendar::parse_iso_date("2024-02-29").unwrap();
        assert_eq!(calendar::format_iso_date(date), "2024-02-29");
        assert!(calendar::is_iso_date("2000-02-29"));
        assert!(!calendar::is_iso_date("1900-02-29"));
    }

    #[test]
    fn clamped_date() {
        assert_eq!(calendar::clamped_date(2023, 2, 31), Some(d(2023, 2, 28)));
        assert_eq!(calendar::clamped_date(2024, 2, 31), Some(d(2024, 2, 29)));
        assert_eq!(calendar::clamped_date(2024, 4, 31), Some(d(2024, 4, 30)));
        assert_eq!(calendar::clamped_date(2024, 13, 1), None);
    }
}
