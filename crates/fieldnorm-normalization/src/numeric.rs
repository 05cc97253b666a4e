//! Integer and float validators.
//!
//! Both share the range policy: optional bounds plus a clamp flag. With
//! clamping on, out-of-range values are pulled to the nearest bound and a
//! note records the change; with clamping off they fail with a range error.

use std::sync::LazyLock;

use fieldnorm_model::{ErrorKind, FieldSpec, LogicalType, NumericParams, Outcome};
use regex::Regex;

use crate::lexicon::{fold_thai_digits, number_word_value};
use crate::validator::{FieldValidator, blank_outcome, is_blank, name_matches};

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+").expect("Invalid digit run regex"));

/// Integer with comma thousands grouping, e.g. `-1,234,567`.
static GROUPED_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d{1,3}(?:,\d{3})+$").expect("Invalid grouped integer regex")
});

/// Unit markers stripped from float input before parsing.
const UNIT_MARKERS: &[&str] = &[
    "°C",
    "°F",
    "C°",
    "F°",
    "องศา",
    "เซลเซียส",
    "ฟาเรนไฮต์",
    "度",
];

const DEFAULT_DECIMAL_PLACES: u32 = 1;

/// Bounds and clamp flag for a numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangePolicy {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub clamp: bool,
}

impl RangePolicy {
    /// Message naming the violated bound, if any.
    pub fn violation(&self, value: f64) -> Option<String> {
        if let Some(min) = self.min
            && value < min
        {
            return Some(format!("Value {value} is below minimum {min}"));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Some(format!("Value {value} is above maximum {max}"));
        }
        None
    }

    pub fn clamp_value(&self, value: f64) -> f64 {
        let mut clamped = value;
        if let Some(min) = self.min {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max {
            clamped = clamped.min(max);
        }
        clamped
    }
}

// ============================================================================
// Integer
// ============================================================================

#[derive(Debug, Clone)]
pub struct IntegerValidator {
    field: String,
    allows_null: bool,
    range: RangePolicy,
}

impl IntegerValidator {
    pub fn new(spec: &FieldSpec, params: &NumericParams) -> Self {
        let mut range = RangePolicy {
            min: params.min,
            max: params.max,
            clamp: params.clamp.unwrap_or(false),
        };

        if name_matches(&spec.name, &["อายุ"], &["age"]) {
            range.min = range.min.or(Some(0.0));
            range.max = range.max.or(Some(120.0));
            range.clamp = params.clamp.unwrap_or(true);
            tracing::debug!(
                field = %spec.name,
                min = ?range.min,
                max = ?range.max,
                clamp = range.clamp,
                "applied age range defaults"
            );
        }

        Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
            range,
        }
    }

    pub fn range(&self) -> RangePolicy {
        self.range
    }

    /// Parse the integer carried by `text`, with a note when it had to be
    /// dug out of surrounding text.
    ///
    /// Extraction only runs when the text carries words or units; a bare
    /// malformed numeral such as `1.2.3` is rejected.
    fn parse(text: &str) -> Option<(i64, Option<String>)> {
        if let Ok(value) = text.parse::<i64>() {
            return Some((value, None));
        }
        if GROUPED_INTEGER.is_match(text) {
            return text.replace(',', "").parse::<i64>().ok().map(|value| (value, None));
        }
        if let Ok(value) = text.parse::<f64>()
            && value.is_finite()
            && value.abs() < i64::MAX as f64
        {
            let truncated = value.trunc();
            let note = (truncated != value)
                .then(|| format!("Fractional part dropped from {value}"));
            return Some((truncated as i64, note));
        }
        if !has_descriptive_text(text) {
            return None;
        }
        if let Some(value) = first_signed_run(text) {
            return Some((value, Some(format!("Extracted number {value} from text"))));
        }
        number_word_value(text)
            .map(|value| (value, Some(format!("Number word translated to {value}"))))
    }
}

impl FieldValidator for IntegerValidator {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Integer
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        let text = fold_thai_digits(raw.trim());

        let Some((mut value, parse_note)) = Self::parse(&text) else {
            return Outcome::failure(
                ErrorKind::Parse,
                format!("Cannot convert to integer: {text}"),
            );
        };

        let mut notes: Vec<String> = parse_note.into_iter().collect();
        if let Some(message) = self.range.violation(value as f64) {
            if !self.range.clamp {
                return Outcome::failure(ErrorKind::Range, message);
            }
            let clamped = clamp_integer(value, &self.range);
            notes.push(format!("Value clamped from {value} to {clamped}"));
            value = clamped;
        }

        Outcome::success(value.to_string()).with_notes(notes)
    }
}

fn has_descriptive_text(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// First digit run in `text`. A sign counts only when it opens a token.
fn first_signed_run(text: &str) -> Option<i64> {
    let run = DIGIT_RUN.find(text)?;
    let opens_token = text[..run.start()]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace);
    let digits = run.as_str();
    let digits = if opens_token {
        digits
    } else {
        digits.trim_start_matches(['-', '+'])
    };
    digits.parse().ok()
}

fn clamp_integer(value: i64, range: &RangePolicy) -> i64 {
    let as_float = value as f64;
    if let Some(min) = range.min
        && as_float < min
    {
        return min.ceil() as i64;
    }
    if let Some(max) = range.max
        && as_float > max
    {
        return max.floor() as i64;
    }
    value
}

// ============================================================================
// Float
// ============================================================================

/// Closed interval outside of which a reading is flagged as an outlier.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OutlierBand {
    low: f64,
    high: f64,
}

impl OutlierBand {
    fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measurement {
    Environmental,
    Body,
}

impl Measurement {
    fn detect(name: &str) -> Option<Self> {
        if !name_matches(name, &["อุณหภูมิ"], &["temperature", "temp"]) {
            return None;
        }
        if name_matches(name, &["สวล", "สิ่งแวดล้อม"], &["environment", "environmental", "ambient"]) {
            Some(Measurement::Environmental)
        } else if name_matches(name, &["ร่างกาย"], &["body"]) {
            Some(Measurement::Body)
        } else {
            None
        }
    }

    fn default_range(self) -> (f64, f64) {
        match self {
            Measurement::Environmental => (-10.0, 60.0),
            Measurement::Body => (30.0, 45.0),
        }
    }

    fn outlier_band(self) -> OutlierBand {
        match self {
            Measurement::Environmental => OutlierBand {
                low: -20.0,
                high: 70.0,
            },
            Measurement::Body => OutlierBand {
                low: 25.0,
                high: 50.0,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FloatValidator {
    field: String,
    allows_null: bool,
    range: RangePolicy,
    decimal_places: u32,
    outliers: Option<OutlierBand>,
}

impl FloatValidator {
    pub fn new(spec: &FieldSpec, params: &NumericParams) -> Self {
        let mut range = RangePolicy {
            min: params.min,
            max: params.max,
            clamp: params.clamp.unwrap_or(false),
        };

        let measurement = Measurement::detect(&spec.name);
        if let Some(measurement) = measurement {
            let (min, max) = measurement.default_range();
            range.min = range.min.or(Some(min));
            range.max = range.max.or(Some(max));
            tracing::debug!(
                field = %spec.name,
                ?measurement,
                min = ?range.min,
                max = ?range.max,
                "applied temperature range defaults"
            );
        }

        let outliers = if params.outlier_detection.unwrap_or(true) {
            measurement
                .map(Measurement::outlier_band)
                .or_else(|| match (range.min, range.max) {
                    (Some(min), Some(max)) => {
                        let margin = (max - min) * 0.1;
                        Some(OutlierBand {
                            low: min - margin,
                            high: max + margin,
                        })
                    }
                    _ => None,
                })
        } else {
            None
        };

        Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
            range,
            decimal_places: params.decimal_places.unwrap_or(DEFAULT_DECIMAL_PLACES),
            outliers,
        }
    }

    pub fn range(&self) -> RangePolicy {
        self.range
    }

    fn clean(raw: &str) -> String {
        let mut cleaned = fold_thai_digits(raw.trim()).into_owned();
        for unit in UNIT_MARKERS {
            cleaned = cleaned.replace(unit, "");
        }
        cleaned.trim().replace(',', ".")
    }

    /// Round to `decimal_places`, stepping back inside the range when
    /// rounding would cross a bound and the range holds a value at that
    /// precision.
    fn round_within_range(&self, value: f64) -> f64 {
        const EPSILON: f64 = 1e-9;
        let scale = 10f64.powi(self.decimal_places as i32);
        let rounded = (value * scale).round() / scale;
        if let Some(max) = self.range.max
            && rounded > max
        {
            let edge = (max * scale + EPSILON).floor() / scale;
            if self.range.min.is_none_or(|min| edge >= min) {
                return edge;
            }
        }
        if let Some(min) = self.range.min
            && rounded < min
        {
            let edge = (min * scale - EPSILON).ceil() / scale;
            if self.range.max.is_none_or(|max| edge <= max) {
                return edge;
            }
        }
        rounded
    }

    fn format(&self, value: f64) -> String {
        let formatted = if self.decimal_places == 0 {
            format!("{value:.0}")
        } else {
            format!("{value:.prec$}", prec = self.decimal_places as usize)
        };
        // "-0.0" and friends
        match formatted.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
            _ => formatted,
        }
    }
}

impl FieldValidator for FloatValidator {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Float
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        let cleaned = Self::clean(raw);

        let Ok(mut value) = cleaned.parse::<f64>() else {
            return Outcome::failure(
                ErrorKind::Parse,
                format!("Cannot convert to float: {cleaned}"),
            );
        };
        if !value.is_finite() {
            return Outcome::failure(ErrorKind::Parse, "Invalid float value (NaN or infinite)");
        }

        let original = value;
        let mut notes = Vec::new();
        if let Some(message) = self.range.violation(value) {
            if !self.range.clamp {
                return Outcome::failure(ErrorKind::Range, message);
            }
            value = self.range.clamp_value(value);
            notes.push(format!("Value clamped from {original} to {value}"));
        }

        if let Some(band) = self.outliers
            && !band.contains(original)
        {
            notes.push(format!("Potential outlier detected: {original}"));
        }

        Outcome::success(self.format(self.round_within_range(value))).with_notes(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::FieldKind;

    fn integer(name: &str, params: NumericParams) -> IntegerValidator {
        let spec = FieldSpec::new(name, FieldKind::Integer(params.clone()));
        IntegerValidator::new(&spec, &params)
    }

    fn float(name: &str, params: NumericParams) -> FloatValidator {
        let spec = FieldSpec::new(name, FieldKind::Float(params.clone()));
        FloatValidator::new(&spec, &params)
    }

    #[test]
    fn integer_accepts_decimal_text() {
        let v = integer("ปี", NumericParams::new());
        let outcome = v.validate("41.0");
        assert_eq!(outcome.processed_value(), Some("41"));
        assert!(outcome.notes().is_empty());
    }

    #[test]
    fn integer_extracts_digit_run() {
        let v = integer("ที่", NumericParams::new());
        let outcome = v.validate("ลำดับ 12 ครับ");
        assert_eq!(outcome.processed_value(), Some("12"));
    }

    #[test]
    fn integer_keeps_sign_before_unit() {
        let v = integer("ที่", NumericParams::new());
        let outcome = v.validate("-5 คน");
        assert_eq!(outcome.processed_value(), Some("-5"));
        assert_eq!(outcome.notes(), ["Extracted number -5 from text"]);
        assert_eq!(v.validate("อายุ 5-10 ปี").processed_value(), Some("5"));
    }

    #[test]
    fn integer_thousands_grouping() {
        let v = integer("ที่", NumericParams::new());
        let outcome = v.validate("1,500");
        assert_eq!(outcome.processed_value(), Some("1500"));
        assert!(outcome.notes().is_empty());
        assert_eq!(v.validate("-12,345,678").processed_value(), Some("-12345678"));

        let outcome = v.validate("1,50");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Parse));
        assert_eq!(outcome.error_message(), Some("Cannot convert to integer: 1,50"));
    }

    #[test]
    fn integer_bare_malformed_numeral_fails() {
        let v = integer("ที่", NumericParams::new());
        for raw in ["1.2.3", "12/3", "--5"] {
            assert_eq!(v.validate(raw).error_kind(), Some(ErrorKind::Parse), "{raw}");
        }
    }

    #[test]
    fn integer_reads_thai_digits_and_words() {
        let v = integer("ที่", NumericParams::new());
        assert_eq!(v.validate("๔๒").processed_value(), Some("42"));
        assert_eq!(v.validate("สาม").processed_value(), Some("3"));
        assert_eq!(v.validate("five").processed_value(), Some("5"));
    }

    #[test]
    fn integer_parse_failure_names_input() {
        let v = integer("ที่", NumericParams::new());
        let outcome = v.validate("ไม่ทราบ");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Parse));
        assert_eq!(
            outcome.error_message(),
            Some("Cannot convert to integer: ไม่ทราบ")
        );
    }

    #[test]
    fn age_heuristic_clamps() {
        let v = integer("อายุ(ปี)", NumericParams::new());
        let outcome = v.validate("-3");
        assert_eq!(outcome.processed_value(), Some("0"));
        assert_eq!(outcome.notes(), ["Value clamped from -3 to 0"]);
    }

    #[test]
    fn explicit_clamp_off_beats_age_heuristic() {
        let v = integer("age", NumericParams::new().with_clamp(false));
        let outcome = v.validate("150");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Range));
        assert_eq!(
            outcome.error_message(),
            Some("Value 150 is above maximum 120")
        );
    }

    #[test]
    fn float_strips_units_and_commas() {
        let v = float("value", NumericParams::new());
        assert_eq!(v.validate("37,5 °C").processed_value(), Some("37.5"));
        assert_eq!(v.validate("38 องศาเซลเซียส").processed_value(), Some("38.0"));
    }

    #[test]
    fn float_rejects_non_finite() {
        let v = float("value", NumericParams::new());
        let outcome = v.validate("NaN");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Parse));
    }

    #[test]
    fn body_temperature_defaults() {
        let v = float("อุณหภูมิร่างกาย(C°)", NumericParams::new());
        assert_eq!(v.range().min, Some(30.0));
        assert_eq!(v.range().max, Some(45.0));
        let outcome = v.validate("47");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Range));
    }

    #[test]
    fn outlier_uses_value_before_clamping() {
        let v = float(
            "อุณหภูมิ สวล.(C°)",
            NumericParams::new().with_clamp(true),
        );
        let outcome = v.validate("80");
        assert_eq!(outcome.processed_value(), Some("60.0"));
        assert_eq!(
            outcome.notes(),
            [
                "Value clamped from 80 to 60",
                "Potential outlier detected: 80"
            ]
        );
    }

    #[test]
    fn generic_outlier_margin() {
        let v = float(
            "reading",
            NumericParams::new().with_range(0.0, 100.0).with_clamp(true),
        );
        assert_eq!(v.validate("105").notes().len(), 1);
        assert_eq!(v.validate("115").notes().len(), 2);
    }

    #[test]
    fn rounding_stays_inside_range() {
        let v = float(
            "reading",
            NumericParams::new()
                .with_range(0.04, 12.36)
                .with_clamp(true)
                .with_outlier_detection(false),
        );
        assert_eq!(v.validate("13").processed_value(), Some("12.3"));
        assert_eq!(v.validate("12.36").processed_value(), Some("12.3"));
        assert_eq!(v.validate("-1").processed_value(), Some("0.1"));

        let narrow = float(
            "reading",
            NumericParams::new()
                .with_range(1.231, 1.239)
                .with_clamp(true)
                .with_outlier_detection(false),
        );
        assert_eq!(narrow.validate("5").processed_value(), Some("1.2"));
    }

    #[test]
    fn zero_decimal_places_rounds() {
        let v = float("ที่", NumericParams::new().with_decimal_places(0));
        assert_eq!(v.validate("12.7").processed_value(), Some("13"));
        assert_eq!(v.validate("-0.2").processed_value(), Some("0"));
    }
}
