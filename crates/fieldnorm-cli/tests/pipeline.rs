//! Integration tests for the `normalize` stages.

use std::fs;
use std::num::NonZeroUsize;

use fieldnorm_cli::pipeline::{
    ColumnMapping, INVALID_UTF8_NOTE, IssueReport, decode_cell, default_output_path, field_stats,
    normalize_rows, read_input, write_csv,
};
use fieldnorm_model::{
    DateParams, ErrorKind, FieldKind, FieldSpec, MulticlassParams, NumericParams, TextParams,
};
use fieldnorm_normalization::Normalizer;
use fieldnorm_standards::SchemaRegistry;
use tempfile::tempdir;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new(
        "test",
        vec![
            FieldSpec::new(
                "เพศ",
                FieldKind::Multiclass(
                    MulticlassParams::with_vocabulary(["ชาย", "หญิง", "ไม่ระบุ"])
                        .with_alias("male", "ชาย"),
                ),
            ),
            FieldSpec::new(
                "อายุ(ปี)",
                FieldKind::Integer(NumericParams::new().with_range(0.0, 120.0).with_clamp(true)),
            ),
            FieldSpec::new("วันที่", FieldKind::Date(DateParams::default())),
            FieldSpec::new("note", FieldKind::Text(TextParams::default().with_max_length(10))),
        ],
    )
    .expect("valid schema")
}

fn write_input(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("records.csv");
    let mut bytes = "เพศ,อายุ(ปี),extra\nMale,150,x\nหญิง,abc,y\n".as_bytes().to_vec();
    bytes.extend_from_slice("ช".as_bytes());
    bytes.push(0xff);
    bytes.extend_from_slice("าย,7,z\n".as_bytes());
    fs::write(&path, bytes).expect("write input");
    path
}

#[test]
fn decode_drops_invalid_bytes() {
    assert_eq!(decode_cell(b"heat\xffstroke"), ("heatstroke".to_string(), true));
    assert_eq!(decode_cell("ปกติ".as_bytes()), ("ปกติ".to_string(), false));
}

#[test]
fn reads_and_maps_columns() {
    let dir = tempdir().expect("create temp dir");
    let input = read_input(&write_input(dir.path())).expect("read input");
    assert_eq!(input.headers, ["เพศ", "อายุ(ปี)", "extra"]);
    assert_eq!(input.rows.len(), 3);
    assert_eq!(input.rows[2][0], "ชาย");
    assert_eq!(input.repaired, [(2, 0)]);

    let mapping = ColumnMapping::new(&registry(), &input.headers);
    assert_eq!(mapping.missing(), ["วันที่", "note"]);
    assert_eq!(mapping.schema_position(1), Some(1));
    assert_eq!(mapping.schema_position(2), None);
    assert_eq!(mapping.align(&input.rows[0]), ["Male", "150", "", ""]);
}

#[test]
fn normalizes_and_writes_schema_order() {
    let dir = tempdir().expect("create temp dir");
    let registry = registry();
    let input = read_input(&write_input(dir.path())).expect("read input");
    let mapping = ColumnMapping::new(&registry, &input.headers);
    let normalizer = Normalizer::new(registry.fields()).expect("validators");

    let outcomes = normalize_rows(
        &normalizer,
        &mapping,
        &input.rows,
        NonZeroUsize::MIN,
        None,
    )
    .expect("normalize");
    let mut out = Vec::new();
    write_csv(&mut out, &registry, &outcomes).expect("write csv");
    insta::assert_snapshot!(String::from_utf8(out).expect("utf-8 output"), @r"
    เพศ,อายุ(ปี),วันที่,note
    ชาย,120,,
    หญิง,,,
    ชาย,7,,
    ");

    let stats = field_stats(&registry, &outcomes);
    assert_eq!((stats[1].valid, stats[1].failed, stats[1].noted), (2, 1, 1));
    assert_eq!(stats[2].nulls, 3);
}

#[test]
fn threads_keep_row_order() {
    let registry = registry();
    let normalizer = Normalizer::new(registry.fields()).expect("validators");
    let headers = vec!["อายุ(ปี)".to_string()];
    let mapping = ColumnMapping::new(&registry, &headers);
    let rows: Vec<Vec<String>> = (0..50).map(|i| vec![i.to_string()]).collect();

    let serial = normalize_rows(&normalizer, &mapping, &rows, NonZeroUsize::MIN, None)
        .expect("serial");
    let jobs = NonZeroUsize::new(4).expect("non-zero");
    let parallel = normalize_rows(&normalizer, &mapping, &rows, jobs, None).expect("parallel");
    assert_eq!(serial, parallel);
    assert_eq!(parallel[49].values()[1], "49");
}

#[test]
fn report_lists_failures_notes_and_repairs() {
    let dir = tempdir().expect("create temp dir");
    let registry = registry();
    let input = read_input(&write_input(dir.path())).expect("read input");
    let mapping = ColumnMapping::new(&registry, &input.headers);
    let normalizer = Normalizer::new(registry.fields()).expect("validators");
    let outcomes = normalize_rows(&normalizer, &mapping, &input.rows, NonZeroUsize::MIN, None)
        .expect("normalize");

    let report = IssueReport::build(&registry, &mapping, &input, &outcomes);
    assert_eq!(report.rows, 3);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.missing_columns, ["วันที่", "note"]);

    let failure = report
        .issues
        .iter()
        .find(|issue| !issue.valid)
        .expect("one failure");
    assert_eq!((failure.row, failure.field.as_str()), (2, "อายุ(ปี)"));
    assert_eq!(failure.error_kind, Some(ErrorKind::Parse));
    assert_eq!(
        failure.error_message.as_deref(),
        Some("Cannot convert to integer: abc")
    );

    let repaired = report
        .issues
        .iter()
        .find(|issue| issue.row == 3 && issue.field == "เพศ")
        .expect("repaired cell reported");
    assert!(repaired.valid);
    assert_eq!(repaired.notes[0], INVALID_UTF8_NOTE);
    assert_eq!(repaired.notes[1], "Exact match found: ชาย");

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["schema"], "test");
    assert!(json.get("fingerprint").is_none());
}

#[test]
fn output_path_sits_next_to_input() {
    let path = default_output_path("data/heat.csv".as_ref());
    assert_eq!(path, std::path::Path::new("data/heat_normalized.csv"));
}
