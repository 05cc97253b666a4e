//! Property tests for clamping and calendar parsing.

use chrono::{Datelike, NaiveDate};
use fieldnorm_model::{DateParams, FieldKind, FieldSpec, NumericParams};
use fieldnorm_normalization::{FieldValidator, Validator};
use proptest::prelude::*;

fn build(spec: &FieldSpec) -> Validator {
    Validator::from_spec(spec).expect("valid spec")
}

proptest! {
    #[test]
    fn integer_clamp_is_idempotent(value in -10_000i64..10_000, lo in -500i64..500, span in 0i64..500) {
        let hi = lo + span;
        let spec = FieldSpec::new(
            "reading",
            FieldKind::Integer(
                NumericParams::new()
                    .with_range(lo as f64, hi as f64)
                    .with_clamp(true),
            ),
        );
        let validator = build(&spec);

        let once = validator.validate(&value.to_string());
        prop_assert!(once.is_valid());
        let first = once.processed_value().unwrap_or_default().to_string();
        let parsed: i64 = first.parse().expect("integer output");
        prop_assert!((lo..=hi).contains(&parsed));

        let twice = validator.validate(&first);
        prop_assert_eq!(twice.processed_value(), Some(first.as_str()));
        prop_assert!(twice.notes().is_empty());
    }

    #[test]
    fn float_clamp_is_idempotent(value in -1_000.0f64..1_000.0, lo in -100.0f64..100.0, span in 0.0f64..100.0) {
        let hi = lo + span;
        let spec = FieldSpec::new(
            "reading",
            FieldKind::Float(
                NumericParams::new()
                    .with_range(lo, hi)
                    .with_clamp(true)
                    .with_outlier_detection(false),
            ),
        );
        let validator = build(&spec);

        let once = validator.validate(&value.to_string());
        prop_assert!(once.is_valid());
        let first = once.processed_value().unwrap_or_default().to_string();
        let twice = validator.validate(&first);
        prop_assert_eq!(twice.processed_value(), Some(first.as_str()));
    }

    #[test]
    fn month_first_dates_round_trip(days in 0i64..3_650) {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date") + chrono::Duration::days(days);
        let spec = FieldSpec::new(
            "event",
            FieldKind::Date(DateParams::default().with_future_dates(true)),
        );
        let validator = build(&spec);

        let raw = format!("{}/{}/{}", date.month(), date.day(), date.year());
        let outcome = validator.validate(&raw);
        let iso = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(outcome.processed_value(), Some(iso.as_str()));
    }
}
