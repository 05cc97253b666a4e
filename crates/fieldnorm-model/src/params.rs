//! Per-type validation parameters.
//!
//! Options left as `None` are filled in by the field-name heuristics of the
//! matching validator; explicit values always win.

use serde::{Deserialize, Serialize};

/// Bounds and formatting for integer and float fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Clamp out-of-range values to the nearest bound instead of failing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamp: Option<bool>,
    /// Digits after the decimal point for float output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
    /// Emit advisory notes for implausible float readings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_detection: Option<bool>,
}

impl NumericParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = Some(clamp);
        self
    }

    #[must_use]
    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }

    #[must_use]
    pub fn with_outlier_detection(mut self, enable: bool) -> Self {
        self.outlier_detection = Some(enable);
        self
    }
}

pub const DEFAULT_MIN_YEAR: i32 = 2020;
pub const DEFAULT_MAX_YEAR: i32 = 2030;
/// Years above this are read as Buddhist era.
pub const DEFAULT_BUDDHIST_ERA_CUTOFF: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParams {
    pub min_year: i32,
    pub max_year: i32,
    pub buddhist_era_cutoff: i32,
    pub allow_future_dates: bool,
}

impl Default for DateParams {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            buddhist_era_cutoff: DEFAULT_BUDDHIST_ERA_CUTOFF,
            allow_future_dates: false,
        }
    }
}

impl DateParams {
    #[must_use]
    pub fn with_year_range(mut self, min_year: i32, max_year: i32) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    #[must_use]
    pub fn with_future_dates(mut self, allow: bool) -> Self {
        self.allow_future_dates = allow;
        self
    }
}

/// Time fields carry no parameters beyond the field spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParams {}

/// Rendering of mapped booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOutput {
    /// `"1"` / `"0"`.
    #[default]
    Numeric,
    /// `"True"` / `"False"`.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanParams {
    /// Extra phrases read as true, added to the built-in set.
    pub true_values: Vec<String>,
    pub false_values: Vec<String>,
    pub null_values: Vec<String>,
    pub partial_matching: bool,
    pub case_sensitive: bool,
    pub output: BooleanOutput,
}

impl Default for BooleanParams {
    fn default() -> Self {
        Self {
            true_values: Vec::new(),
            false_values: Vec::new(),
            null_values: Vec::new(),
            partial_matching: true,
            case_sensitive: false,
            output: BooleanOutput::Numeric,
        }
    }
}

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MulticlassParams {
    /// Accepted canonical values, in declaration order.
    pub vocabulary: Vec<String>,
    /// Alias to canonical value, in declaration order.
    pub aliases: Vec<(String, String)>,
    pub fuzzy_threshold: f64,
    pub allow_fuzzy: bool,
    pub allow_partial: bool,
    pub case_sensitive: bool,
    /// Fail instead of falling back to the default value.
    pub strict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Default for MulticlassParams {
    fn default() -> Self {
        Self {
            vocabulary: Vec::new(),
            aliases: Vec::new(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            allow_fuzzy: true,
            allow_partial: true,
            case_sensitive: false,
            strict: false,
            default_value: None,
        }
    }
}

impl MulticlassParams {
    pub fn with_vocabulary<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), canonical.into()));
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Unicode normalization form applied to text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnicodeForm {
    #[default]
    Nfc,
    Nfkc,
}

/// Ordered regex substitution applied during text cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanPattern {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

pub const DEFAULT_TEXT_MAX_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParams {
    pub min_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub truncate: bool,
    /// WHATWG encoding label, e.g. `utf-8` or `windows-874`.
    pub encoding: String,
    pub unicode_form: UnicodeForm,
    pub remove_html: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_urls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_special_chars: Option<bool>,
    pub clean_patterns: Vec<CleanPattern>,
    /// Advisory pattern; a mismatch only adds a note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_length: None,
            truncate: true,
            encoding: "utf-8".to_string(),
            unicode_form: UnicodeForm::Nfc,
            remove_html: true,
            remove_urls: None,
            allow_special_chars: None,
            clean_patterns: Vec::new(),
            pattern: None,
        }
    }
}

impl TextParams {
    #[must_use]
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    #[must_use]
    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = min;
        self
    }

    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}
