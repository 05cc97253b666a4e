//! End-to-end scenarios through the dispatcher.
//!
//! Each test builds a field spec the way a schema would declare it and runs
//! raw survey values through `normalize`.

use fieldnorm_model::{
    BooleanParams, DateParams, ErrorKind, FieldKind, FieldSpec, LogicalType, MulticlassParams,
    NumericParams, TextParams,
};
use fieldnorm_normalization::{DateProcessor, FieldValidator, Normalizer, normalize};

fn gender_field() -> FieldSpec {
    FieldSpec::new(
        "เพศ",
        FieldKind::Multiclass(
            MulticlassParams::with_vocabulary(["ชาย", "หญิง", "ไม่ระบุ"]).with_alias("male", "ชาย"),
        ),
    )
}

// =========================================================================
// Scalars
// =========================================================================

#[test]
fn test_age_clamped_to_upper_bound() {
    let spec = FieldSpec::new(
        "อายุ(ปี)",
        FieldKind::Integer(
            NumericParams::new()
                .with_range(0.0, 120.0)
                .with_clamp(true),
        ),
    );
    let outcome = normalize(&spec.name, "150", &spec);
    assert!(outcome.is_valid());
    assert_eq!(outcome.processed_value(), Some("120"));
    assert_eq!(outcome.notes(), ["Value clamped from 150 to 120"]);
}

#[test]
fn test_range_error_without_clamp() {
    let spec = FieldSpec::new(
        "count",
        FieldKind::Integer(NumericParams::new().with_range(0.0, 10.0)),
    );
    let outcome = normalize("count", "11", &spec);
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Range));
    assert_eq!(outcome.error_message(), Some("Value 11 is above maximum 10"));
}

#[test]
fn test_body_temperature_outlier_is_flagged_after_clamp() {
    let spec = FieldSpec::new(
        "อุณหภูมิร่างกาย",
        FieldKind::Float(NumericParams::new().with_clamp(true)),
    );
    let outcome = normalize(&spec.name, "52,0 °C", &spec);
    assert_eq!(outcome.processed_value(), Some("45.0"));
    assert_eq!(
        outcome.notes(),
        [
            "Value clamped from 52 to 45",
            "Potential outlier detected: 52"
        ]
    );
}

// =========================================================================
// Dates and times
// =========================================================================

#[test]
fn test_buddhist_era_date() {
    let spec = FieldSpec::new(
        "วันที่เสียชีวิต",
        FieldKind::Date(DateParams::default().with_future_dates(true)),
    );
    let outcome = normalize(&spec.name, "15/3/2567", &spec);
    assert_eq!(outcome.processed_value(), Some("2024-03-15"));
    assert!(outcome.notes()[0].contains("converted Buddhist year 2567 to Gregorian 2024"));
}

#[test]
fn test_thai_month_name_with_label() {
    let params = DateParams::default();
    let spec = FieldSpec::new("วันที่", FieldKind::Date(params.clone()));
    let processor = DateProcessor::new(&spec, &params)
        .with_today(chrono::NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"));
    let outcome = processor.validate("วันที่ 5 เม.ย. 2567");
    assert_eq!(outcome.processed_value(), Some("2024-04-05"));
    assert_eq!(processor.extract_month_name("2024-04-05"), Some("เมษายน"));
}

#[test]
fn test_time_of_death() {
    let spec = FieldSpec::new("เวลา", FieldKind::default_for(LogicalType::Time));
    assert_eq!(
        normalize("เวลา", "เวลา 7.05 น.", &spec).processed_value(),
        Some("07:05:00")
    );
}

// =========================================================================
// Boolean
// =========================================================================

#[test]
fn test_boolean_negative_phrase() {
    let spec = FieldSpec::new("โรคประจำตัว", FieldKind::default_for(LogicalType::Boolean));
    assert_eq!(normalize(&spec.name, "ไม่มี", &spec).processed_value(), Some("0"));
    assert_eq!(
        normalize(&spec.name, "ไม่มีอาการป่วย", &spec).processed_value(),
        Some("0")
    );
    assert_eq!(normalize(&spec.name, "มี", &spec).processed_value(), Some("1"));
    assert_eq!(normalize(&spec.name, "ไม่ทราบ", &spec).processed_value(), Some(""));
}

#[test]
fn test_boolean_caller_phrases() {
    let params = BooleanParams {
        true_values: vec!["ดื่มประจำ".into()],
        ..BooleanParams::default()
    };
    let spec = FieldSpec::new("alcohol", FieldKind::Boolean(params));
    assert_eq!(normalize("alcohol", "ดื่มประจำ", &spec).processed_value(), Some("1"));
    let outcome = normalize("alcohol", "7", &spec);
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Parse));
}

// =========================================================================
// Multiclass
// =========================================================================

#[test]
fn test_alias_normalization_note() {
    let spec = gender_field();
    let outcome = normalize(&spec.name, "Male", &spec);
    assert_eq!(outcome.processed_value(), Some("ชาย"));
    insta::assert_json_snapshot!(outcome, @r#"
    {
      "is_valid": true,
      "processed_value": "ชาย",
      "error_message": null,
      "error_kind": null,
      "confidence_score": 1.0,
      "notes": [
        "Normalized: Male -> ชาย"
      ]
    }
    "#);
}

#[test]
fn test_strict_multiclass_never_defaults() {
    let mut spec = gender_field().with_default_value("ไม่ระบุ");
    if let FieldKind::Multiclass(params) = &mut spec.kind {
        params.strict = true;
    }
    let outcome = normalize(&spec.name, "zzz", &spec);
    assert!(!outcome.is_valid());
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Vocabulary));
    assert!(outcome.processed_value().is_none());
}

// =========================================================================
// Text
// =========================================================================

#[test]
fn test_text_truncation() {
    let spec = FieldSpec::new("comment", FieldKind::Text(TextParams::default().with_max_length(10)));
    let outcome = normalize("comment", "This is a long text string", &spec);
    assert_eq!(outcome.processed_value(), Some("This is a"));
    assert_eq!(outcome.notes(), ["Text truncated from 26 to 9 characters"]);
}

// =========================================================================
// Null handling
// =========================================================================

#[test]
fn test_every_type_accepts_null_when_allowed() {
    for logical_type in LogicalType::ALL {
        let spec = FieldSpec::new("x", FieldKind::default_for(logical_type));
        for raw in ["", "   "] {
            let outcome = normalize("x", raw, &spec);
            assert!(outcome.is_valid(), "{logical_type} rejected {raw:?}");
            assert_eq!(outcome.processed_value(), Some(""), "{logical_type}");
        }
    }
}

#[test]
fn test_every_type_rejects_null_when_required() {
    for logical_type in LogicalType::ALL {
        let spec = FieldSpec::new("x", FieldKind::default_for(logical_type)).with_required(true);
        let outcome = normalize("x", "", &spec);
        assert_eq!(
            outcome.error_kind(),
            Some(ErrorKind::MissingValue),
            "{logical_type}"
        );
        assert_eq!(
            outcome.error_message(),
            Some("Null value not allowed for this column")
        );
    }
}

// =========================================================================
// Dispatcher
// =========================================================================

#[test]
fn test_dispatcher_routes_each_type() {
    let fields: Vec<FieldSpec> = LogicalType::ALL
        .iter()
        .map(|&t| FieldSpec::new(t.as_str(), FieldKind::default_for(t)))
        .collect();
    let normalizer = Normalizer::new(&fields).expect("default specs are valid");

    let routed: Vec<LogicalType> = normalizer
        .validators()
        .iter()
        .map(FieldValidator::logical_type)
        .collect();
    assert_eq!(routed, LogicalType::ALL);
    assert_eq!(
        normalizer.field_names().collect::<Vec<_>>(),
        LogicalType::ALL.map(|t| t.as_str())
    );
}

#[test]
fn test_row_in_schema_order() {
    let fields = [
        gender_field(),
        FieldSpec::new("อายุ", FieldKind::default_for(LogicalType::Integer)),
        FieldSpec::new("เวลา", FieldKind::default_for(LogicalType::Time)),
    ];
    let normalizer = Normalizer::new(&fields).expect("valid fields");
    let row = normalizer.normalize_row(&["หญิง", "๓๕ ปี"]);
    assert!(row.is_valid());
    assert_eq!(row.values(), ["หญิง", "35", ""]);
}
