//! Validator trait and the per-type dispatch enum.
//!
//! Every logical type has one validator struct implementing
//! [`FieldValidator`]. [`Validator`] wraps them so a schema can hold one
//! validator per field without boxing, and is built from a [`FieldSpec`]
//! through [`Validator::from_spec`].
//!
//! # Thread Safety
//!
//! Validators hold only immutable configuration built at construction
//! time, so a single instance can be shared across threads.

use fieldnorm_model::{ErrorKind, FieldKind, FieldSpec, LogicalType, Outcome};

use crate::boolean::BooleanMapper;
use crate::date::DateProcessor;
use crate::error::Result;
use crate::multiclass::MulticlassValidator;
use crate::numeric::{FloatValidator, IntegerValidator};
use crate::text::TextProcessor;
use crate::time::TimeProcessor;

/// Validation logic for one field.
///
/// `validate` never panics and never returns an error: every failure is
/// reported through the returned [`Outcome`].
pub trait FieldValidator: Send + Sync {
    /// Name of the field this validator was built for.
    fn field_name(&self) -> &str;

    fn logical_type(&self) -> LogicalType;

    /// Normalize one raw value.
    fn validate(&self, raw: &str) -> Outcome;
}

/// True for empty or whitespace-only input.
pub(crate) fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Outcome for blank input under the field's null policy.
pub(crate) fn blank_outcome(allows_null: bool) -> Outcome {
    if allows_null {
        Outcome::null().with_note("Null value handled")
    } else {
        Outcome::failure(
            ErrorKind::MissingValue,
            "Null value not allowed for this column",
        )
    }
}

/// Lowercased field name split on anything that is not alphanumeric.
pub(crate) fn name_tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when the field name contains any of the Thai fragments or any of
/// the English words as a whole token.
pub(crate) fn name_matches(name: &str, thai: &[&str], english: &[&str]) -> bool {
    if thai.iter().any(|fragment| name.contains(fragment)) {
        return true;
    }
    let tokens = name_tokens(name);
    english
        .iter()
        .any(|word| tokens.iter().any(|token| token == word))
}

/// One validator for any logical type.
#[derive(Debug, Clone)]
pub enum Validator {
    Integer(IntegerValidator),
    Float(FloatValidator),
    Date(DateProcessor),
    Time(TimeProcessor),
    Boolean(BooleanMapper),
    Multiclass(MulticlassValidator),
    Text(TextProcessor),
}

impl Validator {
    /// Build the validator declared by `spec`.
    ///
    /// Field-name heuristics are applied here, once.
    pub fn from_spec(spec: &FieldSpec) -> Result<Self> {
        spec.validate()?;
        let validator = match &spec.kind {
            FieldKind::Integer(params) => Validator::Integer(IntegerValidator::new(spec, params)),
            FieldKind::Float(params) => Validator::Float(FloatValidator::new(spec, params)),
            FieldKind::Date(params) => Validator::Date(DateProcessor::new(spec, params)),
            FieldKind::Time(_) => Validator::Time(TimeProcessor::new(spec)),
            FieldKind::Boolean(params) => Validator::Boolean(BooleanMapper::new(spec, params)),
            FieldKind::Multiclass(params) => {
                Validator::Multiclass(MulticlassValidator::new(spec, params))
            }
            FieldKind::Text(params) => Validator::Text(TextProcessor::new(spec, params)?),
        };
        Ok(validator)
    }

    fn inner(&self) -> &dyn FieldValidator {
        match self {
            Validator::Integer(v) => v,
            Validator::Float(v) => v,
            Validator::Date(v) => v,
            Validator::Time(v) => v,
            Validator::Boolean(v) => v,
            Validator::Multiclass(v) => v,
            Validator::Text(v) => v,
        }
    }
}

impl FieldValidator for Validator {
    fn field_name(&self) -> &str {
        self.inner().field_name()
    }

    fn logical_type(&self) -> LogicalType {
        self.inner().logical_type()
    }

    fn validate(&self, raw: &str) -> Outcome {
        self.inner().validate(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn validators_are_send_and_sync() {
        assert_send_sync::<Validator>();
        assert_send_sync::<IntegerValidator>();
        assert_send_sync::<TextProcessor>();
        assert_send_sync::<MulticlassValidator>();
    }

    #[test]
    fn name_matching_uses_whole_english_tokens() {
        assert!(name_matches("patient_age", &[], &["age"]));
        assert!(!name_matches("percentage", &[], &["age"]));
        assert!(name_matches("อายุ(ปี)", &["อายุ"], &["age"]));
    }

    #[test]
    fn blank_outcome_respects_null_policy() {
        assert!(blank_outcome(true).is_null());
        let failure = blank_outcome(false);
        assert_eq!(failure.error_kind(), Some(ErrorKind::MissingValue));
    }

    #[test]
    fn from_spec_rejects_inconsistent_params() {
        use fieldnorm_model::NumericParams;
        let spec = FieldSpec::new(
            "x",
            FieldKind::Integer(NumericParams::new().with_range(5.0, 1.0)),
        );
        assert!(Validator::from_spec(&spec).is_err());
    }
}
