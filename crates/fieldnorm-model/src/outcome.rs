//! Result record returned by every field validator.
//!
//! An [`Outcome`] is either a success carrying a canonical value, or a
//! failure carrying an [`ErrorKind`] and a human-readable message. Notes are
//! append-only diagnostics and may be attached to either.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical representation of a null value in normalized output.
pub const CANONICAL_NULL: &str = "";

/// Category of a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input could not be interpreted as the declared type.
    Parse,
    /// Parsed value lies outside the configured bounds.
    Range,
    /// No vocabulary entry matched in strict mode.
    Vocabulary,
    /// Input cannot be represented in the target encoding.
    Encoding,
    /// Text is shorter than the minimum, or longer with truncation disabled.
    Length,
    /// Empty input on a required field.
    MissingValue,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse_error",
            ErrorKind::Range => "range_error",
            ErrorKind::Vocabulary => "vocabulary_error",
            ErrorKind::Encoding => "encoding_error",
            ErrorKind::Length => "length_error",
            ErrorKind::MissingValue => "missing_value",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating one raw value.
///
/// Construct through [`Outcome::success`], [`Outcome::null`] or
/// [`Outcome::failure`]; the fields are private so that a valid outcome
/// always has a value and an invalid one always has a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    is_valid: bool,
    processed_value: Option<String>,
    error_message: Option<String>,
    error_kind: Option<ErrorKind>,
    confidence_score: Option<f64>,
    notes: Vec<String>,
}

impl Outcome {
    pub fn success(value: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            processed_value: Some(value.into()),
            error_message: None,
            error_kind: None,
            confidence_score: None,
            notes: Vec::new(),
        }
    }

    /// Successful outcome holding the canonical null.
    pub fn null() -> Self {
        Self::success(CANONICAL_NULL)
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = kind.as_str().to_string();
        }
        Self {
            is_valid: false,
            processed_value: None,
            error_message: Some(message),
            error_kind: Some(kind),
            confidence_score: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[must_use]
    pub fn with_notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes.extend(notes.into_iter().map(Into::into));
        self
    }

    /// Attach a match confidence, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_confidence(mut self, score: f64) -> Self {
        self.confidence_score = Some(score.clamp(0.0, 1.0));
        self
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn processed_value(&self) -> Option<&str> {
        self.processed_value.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn confidence_score(&self) -> Option<f64> {
        self.confidence_score
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// True when the outcome is a success holding the canonical null.
    pub fn is_null(&self) -> bool {
        self.is_valid && self.processed_value.as_deref() == Some(CANONICAL_NULL)
    }

    /// The processed value, or the canonical null for failures.
    pub fn value_or_null(&self) -> &str {
        self.processed_value.as_deref().unwrap_or(CANONICAL_NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_has_value_and_no_error() {
        let outcome = Outcome::success("42");
        assert!(outcome.is_valid());
        assert_eq!(outcome.processed_value(), Some("42"));
        assert!(outcome.error_message().is_none());
        assert!(outcome.error_kind().is_none());
    }

    #[test]
    fn failure_always_has_message() {
        let outcome = Outcome::failure(ErrorKind::Range, "");
        assert!(!outcome.is_valid());
        assert_eq!(outcome.error_message(), Some("range_error"));
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Range));
        assert_eq!(outcome.value_or_null(), CANONICAL_NULL);
    }

    #[test]
    fn notes_are_appended_in_order() {
        let mut outcome = Outcome::null().with_note("first");
        outcome.push_note("second");
        assert!(outcome.is_null());
        assert_eq!(outcome.notes(), ["first", "second"]);
    }

    #[test]
    fn confidence_is_clamped() {
        let outcome = Outcome::success("x").with_confidence(1.7);
        assert_eq!(outcome.confidence_score(), Some(1.0));
    }
}
