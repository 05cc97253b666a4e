//! Free-text cleanup.
//!
//! Pipeline, in order: encoding recovery, Unicode normalization, markup and
//! URL stripping, configured substitutions, character allow-list, whitespace
//! collapse, length enforcement and a final encodability check. An optional
//! pattern is advisory and only adds a note.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use fieldnorm_model::{
    CleanPattern, DEFAULT_TEXT_MAX_LENGTH, ErrorKind, FieldSpec, LogicalType, Outcome, TextParams,
    UnicodeForm,
};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{NormalizationError, Result};
use crate::lexicon::collapse_whitespace;
use crate::validator::{FieldValidator, blank_outcome, is_blank, name_matches};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://|www\.)[A-Za-z0-9$\-_@.&+!*(),%/:;?=#~\[\]']+")
        .expect("Invalid URL regex")
});

const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

const SAFE_PUNCTUATION: &str = ".,;:!?()-[]{}\"'";

/// Text cut at a space only when that space is at least this far into the
/// limit.
const WORD_BOUNDARY_FRACTION: f64 = 0.8;

const LIST_MARKER_PATTERNS: &[(&str, &str)] = &[
    (r"(^|\s)\d{1,2}\.\s+", "$1"),
    (r"(^|\s)[-•]\s*", "$1"),
];

const HEALTH_REGION_PATTERN: (&str, &str) = (r"[^\d\sสคร\.]", "");

/// Which characters survive the allow-list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharPolicy {
    /// No filtering.
    Any,
    /// Thai, ASCII letters, digits, whitespace and common punctuation.
    Standard,
    /// ASCII letters, digits, `.` and `-`; result is upper-cased.
    Code,
}

impl CharPolicy {
    fn allows(self, c: char) -> bool {
        match self {
            CharPolicy::Any => true,
            CharPolicy::Standard => {
                c.is_whitespace()
                    || ('\u{0E00}'..='\u{0E7F}').contains(&c)
                    || c.is_ascii_alphanumeric()
                    || c.is_numeric()
                    || SAFE_PUNCTUATION.contains(c)
            }
            CharPolicy::Code => {
                c.is_whitespace() || c.is_ascii_alphanumeric() || c == '.' || c == '-'
            }
        }
    }
}

/// Defaults derived from the field name; explicit parameters win.
#[derive(Debug, Default)]
struct NameRules {
    max_length: Option<usize>,
    keep_urls: bool,
    char_policy: Option<CharPolicy>,
    patterns: Vec<(&'static str, &'static str)>,
}

impl NameRules {
    fn for_field(name: &str) -> (Self, &'static str) {
        if name_matches(name, &["ที่มาสื่อ"], &["source", "url", "link"]) {
            (
                Self {
                    max_length: Some(300),
                    keep_urls: true,
                    ..Self::default()
                },
                "source",
            )
        } else if name_matches(name, &["รหัส"], &["icd", "code"]) {
            (
                Self {
                    char_policy: Some(CharPolicy::Code),
                    ..Self::default()
                },
                "code",
            )
        } else if name_matches(name, &["โรค", "อาการ"], &["medical", "symptom", "symptoms"]) {
            (
                Self {
                    max_length: Some(500),
                    patterns: LIST_MARKER_PATTERNS.to_vec(),
                    ..Self::default()
                },
                "medical",
            )
        } else if name_matches(name, &["อำเภอ", "ตำบล"], &["district", "subdistrict"]) {
            (
                Self {
                    max_length: Some(100),
                    ..Self::default()
                },
                "location",
            )
        } else if name_matches(name, &["หมายเหตุ", "ข้อมูลอื่น"], &["remark", "remarks", "note", "notes"]) {
            (
                Self {
                    max_length: Some(1000),
                    ..Self::default()
                },
                "remarks",
            )
        } else if name.contains("สคร.") {
            (
                Self {
                    max_length: Some(50),
                    patterns: vec![HEALTH_REGION_PATTERN],
                    ..Self::default()
                },
                "health region",
            )
        } else {
            (Self::default(), "generic")
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextProcessor {
    field: String,
    allows_null: bool,
    min_length: usize,
    max_length: usize,
    truncate: bool,
    encoding: &'static Encoding,
    unicode_form: UnicodeForm,
    remove_html: bool,
    remove_urls: bool,
    char_policy: CharPolicy,
    substitutions: Vec<(Regex, String)>,
    pattern: Option<Regex>,
}

impl TextProcessor {
    pub fn new(spec: &FieldSpec, params: &TextParams) -> Result<Self> {
        let encoding = Encoding::for_label(params.encoding.trim().as_bytes()).ok_or_else(|| {
            NormalizationError::UnknownEncoding {
                field: spec.name.clone(),
                label: params.encoding.clone(),
            }
        })?;

        let (rules, family) = NameRules::for_field(&spec.name);
        tracing::debug!(field = %spec.name, family, "text rules selected");

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| NormalizationError::InvalidPattern {
                field: spec.name.clone(),
                pattern: pattern.to_string(),
                source,
            })
        };

        let mut substitutions = Vec::new();
        for CleanPattern {
            pattern,
            replacement,
        } in &params.clean_patterns
        {
            substitutions.push((compile(pattern.as_str())?, replacement.clone()));
        }
        for (pattern, replacement) in &rules.patterns {
            substitutions.push((compile(*pattern)?, (*replacement).to_string()));
        }

        let char_policy = match params.allow_special_chars {
            Some(true) => CharPolicy::Any,
            Some(false) => rules.char_policy.unwrap_or(CharPolicy::Standard),
            None => rules.char_policy.unwrap_or(CharPolicy::Any),
        };

        Ok(Self {
            field: spec.name.clone(),
            allows_null: spec.allows_null(),
            min_length: params.min_length,
            max_length: params
                .max_length
                .or(rules.max_length)
                .unwrap_or(DEFAULT_TEXT_MAX_LENGTH),
            truncate: params.truncate,
            encoding,
            unicode_form: params.unicode_form,
            remove_html: params.remove_html,
            remove_urls: params.remove_urls.unwrap_or(!rules.keep_urls),
            char_policy,
            substitutions,
            pattern: params.pattern.as_deref().map(compile).transpose()?,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validate raw bytes, discarding invalid UTF-8 sequences first.
    pub fn validate_bytes(&self, raw: &[u8]) -> Outcome {
        let mut text = String::with_capacity(raw.len());
        let mut invalid = false;
        for chunk in raw.utf8_chunks() {
            text.push_str(chunk.valid());
            invalid |= !chunk.invalid().is_empty();
        }
        let outcome = self.validate(&text);
        if invalid {
            let mut notes = vec!["Invalid UTF-8 characters removed".to_string()];
            notes.extend(outcome.notes().iter().cloned());
            rebuild_with_notes(&outcome, notes)
        } else {
            outcome
        }
    }

    /// Characters of `text` that the target encoding can represent, and how
    /// many were dropped.
    fn representable(&self, text: &str) -> (String, usize) {
        if self.encoding == UTF_8 {
            return (text.to_string(), 0);
        }
        let mut kept = String::with_capacity(text.len());
        let mut dropped = 0;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let (_, _, unmappable) = self.encoding.encode(c.encode_utf8(&mut buf));
            if unmappable {
                dropped += 1;
            } else {
                kept.push(c);
            }
        }
        (kept, dropped)
    }

    fn normalize_unicode(&self, text: &str) -> String {
        match self.unicode_form {
            UnicodeForm::Nfc => text.nfc().collect(),
            UnicodeForm::Nfkc => text.nfkc().collect(),
        }
    }

    fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        if self.remove_html {
            cleaned = HTML_TAG.replace_all(&cleaned, "").into_owned();
            for (entity, replacement) in HTML_ENTITIES {
                cleaned = cleaned.replace(entity, replacement);
            }
        }
        if self.remove_urls {
            cleaned = URL.replace_all(&cleaned, "").into_owned();
        }
        for (pattern, replacement) in &self.substitutions {
            cleaned = pattern
                .replace_all(&cleaned, replacement.as_str())
                .into_owned();
        }
        if self.char_policy != CharPolicy::Any {
            cleaned = cleaned
                .chars()
                .map(|c| if self.char_policy.allows(c) { c } else { ' ' })
                .collect();
        }
        let mut collapsed = collapse_whitespace(&cleaned);
        if self.char_policy == CharPolicy::Code {
            collapsed = collapsed.to_uppercase();
        }
        collapsed
    }

    /// Enforce the length bounds, returning the text and an optional note.
    fn enforce_length(&self, text: String) -> std::result::Result<(String, Option<String>), String> {
        let length = text.chars().count();
        if length < self.min_length {
            return Err(format!("Text too short: {length} < {}", self.min_length));
        }
        if length <= self.max_length {
            return Ok((text, None));
        }
        if !self.truncate {
            return Err(format!("Text too long: {length} > {}", self.max_length));
        }

        let mut head: Vec<char> = text.chars().take(self.max_length).collect();
        if let Some(space) = head.iter().rposition(|c| *c == ' ')
            && space as f64 >= self.max_length as f64 * WORD_BOUNDARY_FRACTION
        {
            head.truncate(space);
        }
        let truncated: String = head.into_iter().collect();
        let note = format!(
            "Text truncated from {length} to {} characters",
            truncated.chars().count()
        );
        Ok((truncated, Some(note)))
    }
}

impl FieldValidator for TextProcessor {
    fn field_name(&self) -> &str {
        &self.field
    }

    fn logical_type(&self) -> LogicalType {
        LogicalType::Text
    }

    fn validate(&self, raw: &str) -> Outcome {
        if is_blank(raw) {
            return blank_outcome(self.allows_null);
        }
        let mut notes = Vec::new();

        let (text, dropped) = self.representable(raw);
        if dropped > 0 {
            notes.push(format!(
                "Dropped {dropped} characters not representable in {}",
                self.encoding.name()
            ));
        }

        let normalized = self.normalize_unicode(&text);
        if normalized != text {
            notes.push("Unicode normalization applied".to_string());
        }

        let cleaned = self.clean(&normalized);
        if cleaned != normalized {
            notes.push("Text cleaning applied".to_string());
        }

        let (text, length_note) = match self.enforce_length(cleaned) {
            Ok(result) => result,
            Err(message) => return Outcome::failure(ErrorKind::Length, message).with_notes(notes),
        };
        notes.extend(length_note);

        let (_, unencodable) = self.representable(&text);
        if unencodable > 0 {
            return Outcome::failure(
                ErrorKind::Encoding,
                format!(
                    "{unencodable} characters cannot be encoded as {}",
                    self.encoding.name()
                ),
            )
            .with_notes(notes);
        }

        if let Some(pattern) = &self.pattern
            && !text.is_empty()
            && !pattern.is_match(&text)
        {
            notes.push(format!("Value does not match expected pattern {}", pattern.as_str()));
        }

        Outcome::success(text).with_notes(notes)
    }
}

fn rebuild_with_notes(outcome: &Outcome, notes: Vec<String>) -> Outcome {
    let base = match (outcome.processed_value(), outcome.error_kind()) {
        (Some(value), _) => Outcome::success(value),
        (None, Some(kind)) => Outcome::failure(kind, outcome.error_message().unwrap_or_default()),
        (None, None) => Outcome::failure(ErrorKind::Encoding, "Invalid UTF-8 input"),
    };
    base.with_notes(notes)
}
