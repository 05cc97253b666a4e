//! Ternary boolean mapping for clinical yes/no fields.
//!
//! Values map to true, false or null (unknown). Phrase sets cover Thai and
//! English affirmatives, negatives and "unknown" markers; field names for
//! common chronic conditions add condition-specific synonyms.

use std::sync::LazyLock;

use fieldnorm_model::{BooleanOutput, BooleanParams, ErrorKind, FieldSpec, LogicalType, Outcome};
use regex::Regex;

use crate::lexicon::fold_thai_digits;
use crate::validator::{FieldValidator, blank_outcome, is_blank, name_matches};

const TRUE_PHRASES: &[&str] = &[
    "มี", "ใช่", "จริง", "ได้", "เป็น", "ผิด", "มีอาการ", "มีประวัติ", "มีการสัมผัส",
    "มีอาการแสดง", "เป็นโรค", "ป่วย", "เป็นผู้ป่วย", "true", "yes", "positive", "present",
    "affected", "confirmed", "diagnosed", "existing", "found", "detected", "1", "1.0", "t",
    "y", "+", "✓", "v", "พบ", "ตรวจพบ", "ได้รับการวินิจฉัย", "มีการรักษา", "ระบุ",
    "มีโรคประจำตัว", "ป่วยเป็น", "เป็นโรคเรื้อรัง", "ความดันสูง", "เบาหวาน", "หัวใจ",
    "หอบหืด", "ตับ", "ไต", "ปอด", "เลือด", "ประสาท",
];

const FALSE_PHRASES: &[&str] = &[
    "ไม่มี", "ไม่ใช่", "ไม่จริง", "ไม่ได้", "ไม่เป็น", "ไม่", "ไม่พบ", "ไม่มีอาการ",
    "ไม่มีประวัติ", "ไม่มีการสัมผัส", "ไม่เป็นโรค", "ไม่ป่วย", "สุขภาพดี", "ปกติ",
    "ไม่ได้รับการวินิจฉัย", "false", "no", "negative", "absent", "normal", "none", "nil",
    "not found", "not present", "not affected", "not confirmed", "not diagnosed", "healthy",
    "clear", "0", "0.0", "f", "n", "-", "✗", "x", "ไม่ตรวจพบ", "ไม่มีโรคประจำตัว",
    "ไม่มีอาการแสดง", "ไม่มีความผิดปกติ",
];

const NULL_PHRASES: &[&str] = &[
    "ไม่ระบุ", "ไม่ทราบ", "ไม่แน่ใจ", "ไม่ชัดเจน", "ไม่มีข้อมูล", "ไม่ได้บันทึก", "ไม่ปรากฏ",
    "รอตรวจสอบ", "อยู่ระหว่างตรวจ", "unknown", "unclear", "unspecified", "pending",
    "not recorded", "not available", "not applicable", "na", "n/a", "null", "none", "empty",
    "missing", "tbd", "to be determined", "-", "_", "?", "??", "...", "xxx", "n.a.",
];

/// Phrases of this many characters or fewer only match exactly.
const MIN_PARTIAL_CHARS: usize = 2;

static POSITIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(ป่วย|เป็น|มี).*(?:โรค|อาการ|ความดัน|เบาหวาน|หัวใจ)",
        r"(?:ได้รับ|มี).*(?:การวินิจฉัย|การรักษา|การดูแล)",
        r"(?:ระดับ|ค่า).*(?:สูง|ต่ำ|ผิดปกติ)",
        r"(?:ประวัติ|ได้รับ).*(?:การรักษา|การผ่าตัด)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid positive clinical regex"))
    .collect()
});

static NEGATIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:ไม่|ไม่มี|ไม่เป็น|ไม่ป่วย).*(?:โรค|อาการ|ความดัน)",
        r"(?:สุขภาพ|ร่างกาย).*(?:ดี|ปกติ|แข็งแรง)",
        r"(?:ไม่ได้|ไม่มี).*(?:การรักษา|การดูแล|ประวัติ)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid negative clinical regex"))
    .collect()
});

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid numeral regex"));

/// Condition-specific synonyms keyed by field name.
struct ConditionSynonyms {
    thai: &'static [&'static str],
    english: &'static [&'static str],
    true_phrases: &'static [&'static str],
    false_phrases: &'static [&'static str],
}

const CONDITIONS: &[ConditionSynonyms] = &[
    ConditionSynonyms {
        thai: &["ความดันโลหิตสูง"],
        english: &["hypertension"],
        true_phrases: &["ความดันสูง", "bp สูง", "htn", "hypertensive"],
        false_phrases: &["ความดันปกติ", "bp ปกติ", "normotensive"],
    },
    ConditionSynonyms {
        thai: &["เบาหวาน"],
        english: &["diabetes"],
        true_phrases: &[
            "dm",
            "diabetic",
            "น้ำตาลในเลือดสูง",
            "เบาหวานชนิดที่ 1",
            "เบาหวานชนิดที่ 2",
        ],
        false_phrases: &["ไม่เป็นเบาหวาน", "น้ำตาลในเลือดปกติ", "non-diabetic"],
    },
    ConditionSynonyms {
        thai: &["หัวใจ"],
        english: &["cardiovascular", "cardiac"],
        true_phrases: &["โรคหัวใจ", "cardiac", "cvd", "หัวใจล้มเหลว", "heart failure"],
        false_phrases: &["หัวใจปกติ", "cardiac normal", "no cvd"],
    },
    ConditionSynonyms {
        thai: &["หอบหืด"],
        english: &["asthma"],
        true_phrases: &["asthmatic", "มีอาการหอบหืด", "ระบบทางเดินหายใจผิดปกติ"],
        false_phrases: &["ไม่หอบหืด", "ระบบทางเดินหายใจปกติ", "no asthma"],
    },
    ConditionSynonyms {
        thai: &["โรคตับ"],
        english: &["liver"],
        true_phrases: &["liver disease", "ตับแข็ง", "ตับอักเสบ", "hepatitis"],
        false_phrases: &["ตับปกติ", "liver normal", "no liver disease"],
    },
];

/// Classification of a boolean-ish value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct BooleanMapper {
    field: String,
    allows_null: bool,
    case_sensitive: bool,
    partial_matching: bool,
    output: BooleanOutput,
    null_phrases: Vec<String>,
    true_phrases: Vec<String>,
    false_phrases: Vec<String>,
}

impl BooleanMapper {
    pub fn new(spec: &FieldSpec, params: &BooleanParams) -> Self {
        let mut true_phrases: Vec<String> = TRUE_PHRASES.iter().map(ToString::to_string).collect();
        let mut false_phrases: Vec<String> = FALSE_PHRASES.iter().map(ToString::to_string).collect();
        let mut null_phrases: Vec<String> = NULL_PHRASES.iter().map(ToString::to_string).collect();

        if let Some(condition) = CONDITIONS
            .iter()
            .find(|c| name_matches(&spec.name, c.thai, c.english))
        {
            tracing::debug!(
                field = %spec.name,
                synonyms = condition.true_phrases.len() + condition.false_phrases.len(),
                "added condition synonyms"
            );
            true_phrases.extend(condition.true_phrases.iter().map(ToString::to_string));
            false_phrases.extend(condition.false_phrases.iter().map(ToString::to_string));
        }

        true_phrases.extend(params.true_values.iter().cloned());
        false_phrases.extend(params.false_values.iter().cloned());
        null_phrases.extend(params.null_values.iter().cloned());

        let fold = |phrases: Vec<String>| -> Vec<String> {
            let mut folded: Vec<String> = Vec::with_capacity(phrases.len());
            for phrase in phrases {
                let phrase = fold_case(phrase.trim(), params.case_sensitive);
                if !phrase.is_empty() && !folded.contains(&phrase) {
                    folded.push(phrase);
                }
            }
            folded
        };

        Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
            case_sensitive: params.case_sensitive,
            partial_matching: params.partial_matching,
            output: params.output,
            null_phrases: fold(null_phrases),
            true_phrases: fold(true_phrases),
            false_phrases: fold(false_phrases),
        }
    }

    /// Classify a non-blank value, with a note describing the rule that fired.
    pub fn classify(&self, raw: &str) -> Option<(Verdict, String)> {
        let trimmed = raw.trim();
        let folded = fold_case(trimmed, self.case_sensitive);

        if self.null_phrases.contains(&folded) {
            return Some((Verdict::Unknown, "Unknown/null value mapped to empty".into()));
        }
        if self.true_phrases.contains(&folded) {
            return Some((Verdict::True, format!("Mapped '{trimmed}' to True")));
        }
        if self.false_phrases.contains(&folded) {
            return Some((Verdict::False, format!("Mapped '{trimmed}' to False")));
        }

        if self.partial_matching {
            if longest_containment(&folded, &self.null_phrases).is_some() {
                return Some((Verdict::Unknown, "Unknown/null value mapped to empty".into()));
            }
            let best_true = longest_containment(&folded, &self.true_phrases);
            let best_false = longest_containment(&folded, &self.false_phrases);
            match (best_true, best_false) {
                (Some(t), Some(f)) if f > t => {
                    return Some((Verdict::False, format!("Mapped '{trimmed}' to False")));
                }
                (Some(_), _) => {
                    return Some((Verdict::True, format!("Mapped '{trimmed}' to True")));
                }
                (None, Some(_)) => {
                    return Some((Verdict::False, format!("Mapped '{trimmed}' to False")));
                }
                (None, None) => {}
            }
        }

        let lowered = trimmed.to_lowercase();
        if POSITIVE_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
            return Some((
                Verdict::True,
                "Medical pattern matched: positive condition detected".into(),
            ));
        }
        if NEGATIVE_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
            return Some((
                Verdict::False,
                "Medical pattern matched: negative condition detected".into(),
            ));
        }

        let digits = fold_thai_digits(trimmed);
        let value: f64 = NUMERAL.find(&digits)?.as_str().parse().ok()?;
        if value == 0.0 {
            Some((Verdict::False, format!("Numeric interpretation: {value} -> False")))
        } else if value == 1.0 {
            Some((Verdict::True, format!("Numeric interpretation: {value} -> True")))
        } else {
            None
        }
    }

    fn render(&self, value: bool) -> &'static str {
        match (self.output, value) {
            (BooleanOutput::Numeric, true) => "1",
            (BooleanOutput::Numeric, false) => "0",
            (BooleanOutput::Text, true) => "True",
            (BooleanOutput::Text, false) => "False",
        }
    }
}

impl FieldValidator for BooleanMapper {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Boolean
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        match self.classify(raw) {
            Some((Verdict::True, note)) => Outcome::success(self.render(true)).with_note(note),
            Some((Verdict::False, note)) => Outcome::success(self.render(false)).with_note(note),
            Some((Verdict::Unknown, note)) => {
                if self.allows_null {
                    Outcome::null().with_note(note)
                } else {
                    Outcome::failure(
                        ErrorKind::MissingValue,
                        format!("Unknown value not allowed for this column: {}", raw.trim()),
                    )
                }
            }
            None => Outcome::failure(
                ErrorKind::Parse,
                format!("Cannot determine boolean value for: {}", raw.trim()),
            ),
        }
    }
}

fn fold_case(value: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        value.to_string()
    } else {
        value.to_lowercase()
    }
}

/// Length in characters of the longest containment match, if any.
///
/// Either side may contain the other; short phrases and short inputs are
/// excluded so single-letter codes do not match inside words.
fn longest_containment(input: &str, phrases: &[String]) -> Option<usize> {
    let input_chars = input.chars().count();
    phrases
        .iter()
        .filter_map(|phrase| {
            let phrase_chars = phrase.chars().count();
            if phrase_chars > MIN_PARTIAL_CHARS && input.contains(phrase.as_str()) {
                Some(phrase_chars)
            } else if input_chars > MIN_PARTIAL_CHARS && phrase.contains(input) {
                Some(input_chars)
            } else {
                None
            }
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::FieldKind;

    fn mapper(name: &str, params: BooleanParams) -> BooleanMapper {
        let spec = FieldSpec::new(name, FieldKind::Boolean(params.clone()));
        BooleanMapper::new(&spec, &params)
    }

    fn value(name: &str, raw: &str) -> Option<String> {
        mapper(name, BooleanParams::default())
            .validate(raw)
            .processed_value()
            .map(str::to_string)
    }

    #[test]
    fn exact_phrases() {
        assert_eq!(value("x", "ไม่มี").as_deref(), Some("0"));
        assert_eq!(value("x", "มี").as_deref(), Some("1"));
        assert_eq!(value("x", "YES").as_deref(), Some("1"));
        assert_eq!(value("x", "ไม่").as_deref(), Some("0"));
    }

    #[test]
    fn null_phrases_win_over_false() {
        assert_eq!(value("x", "none").as_deref(), Some(""));
        assert_eq!(value("x", "-").as_deref(), Some(""));
        assert_eq!(value("x", "ไม่ทราบแน่ชัด").as_deref(), Some(""));
    }

    #[test]
    fn longest_containment_decides() {
        assert_eq!(value("x", "ไม่มีอาการป่วย").as_deref(), Some("0"));
        assert_eq!(value("x", "มีอาการเหนื่อย").as_deref(), Some("1"));
    }

    #[test]
    fn clinical_patterns() {
        let m = mapper("x", BooleanParams {
            partial_matching: false,
            ..BooleanParams::default()
        });
        let outcome = m.validate("ค่าน้ำตาลสูงมาก");
        assert_eq!(outcome.processed_value(), Some("1"));
        assert_eq!(
            outcome.notes(),
            ["Medical pattern matched: positive condition detected"]
        );
    }

    #[test]
    fn bare_numerals() {
        assert_eq!(value("x", "๑").as_deref(), Some("1"));
        assert_eq!(value("x", "0 ครั้ง").as_deref(), Some("0"));
        let outcome = mapper("x", BooleanParams::default()).validate("7");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Parse));
        assert_eq!(
            outcome.error_message(),
            Some("Cannot determine boolean value for: 7")
        );
    }

    #[test]
    fn condition_synonyms_follow_field_name() {
        assert_eq!(value("ความดันโลหิตสูง", "HTN").as_deref(), Some("1"));
        assert_eq!(value("เบาหวาน", "non-diabetic").as_deref(), Some("0"));
        assert!(
            mapper("อาชีพ", BooleanParams::default())
                .validate("htn")
                .error_kind()
                .is_some()
        );
    }

    #[test]
    fn text_output_and_custom_phrases() {
        let params = BooleanParams {
            true_values: vec!["ok".into()],
            output: BooleanOutput::Text,
            ..BooleanParams::default()
        };
        let m = mapper("x", params);
        assert_eq!(m.validate("ok").processed_value(), Some("True"));
        assert_eq!(m.validate("no").processed_value(), Some("False"));
    }

    #[test]
    fn unknown_on_required_field_fails() {
        let params = BooleanParams::default();
        let spec = FieldSpec::new("x", FieldKind::Boolean(params.clone())).with_required(true);
        let outcome = BooleanMapper::new(&spec, &params).validate("ไม่ทราบ");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::MissingValue));
    }
}
