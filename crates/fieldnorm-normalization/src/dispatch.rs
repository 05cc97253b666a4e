//! Routing raw values to the validator declared for their field.
//!
//! [`normalize`] is the one-shot entry point: it builds the validator for a
//! single [`FieldSpec`] and runs it. [`Normalizer`] builds every validator of
//! a schema once and is what batch callers share across threads.

use std::borrow::Cow;
use std::collections::HashMap;

use fieldnorm_model::{CANONICAL_NULL, FieldSpec, Outcome};

use crate::error::{NormalizationError, Result};
use crate::validator::{FieldValidator, Validator};

/// Normalize one raw value against a field declaration.
///
/// `field_name` drives the name heuristics; when it differs from
/// `spec.name` the declaration is applied under the given name. A field
/// declaration that cannot be built becomes a failed outcome.
pub fn normalize(field_name: &str, raw: &str, spec: &FieldSpec) -> Outcome {
    let spec = if spec.name == field_name {
        Cow::Borrowed(spec)
    } else {
        Cow::Owned(FieldSpec {
            name: field_name.to_string(),
            ..spec.clone()
        })
    };
    match Validator::from_spec(&spec) {
        Ok(validator) => validator.validate(raw),
        Err(err) => Outcome::failure(err.kind(), err.to_string()),
    }
}

/// Validators for a whole schema, built once, in schema order.
#[derive(Debug, Clone)]
pub struct Normalizer {
    validators: Vec<Validator>,
    index: HashMap<String, usize>,
}

impl Normalizer {
    /// Build one validator per field. The first declaration of a name wins
    /// lookups by name.
    pub fn new<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a FieldSpec>,
    {
        let mut validators = Vec::new();
        let mut index = HashMap::new();
        for spec in fields {
            index.entry(spec.name.clone()).or_insert(validators.len());
            validators.push(Validator::from_spec(spec)?);
        }
        tracing::debug!(fields = validators.len(), "normalizer ready");
        Ok(Self { validators, index })
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(FieldValidator::field_name)
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn validator(&self, field_name: &str) -> Option<&Validator> {
        self.index.get(field_name).map(|&i| &self.validators[i])
    }

    /// Normalize one value of a named field.
    pub fn normalize(&self, field_name: &str, raw: &str) -> Result<Outcome> {
        let validator = self
            .validator(field_name)
            .ok_or_else(|| NormalizationError::UnknownField(field_name.to_string()))?;
        Ok(run(validator, raw))
    }

    /// Normalize a row given in schema order.
    ///
    /// Missing trailing values are treated as empty; extra values are
    /// ignored.
    pub fn normalize_row<S: AsRef<str>>(&self, values: &[S]) -> RowOutcome {
        let cells = self
            .validators
            .iter()
            .enumerate()
            .map(|(i, validator)| {
                let raw = values.get(i).map_or("", AsRef::as_ref);
                Cell {
                    outcome: run(validator, raw),
                    original: raw.to_string(),
                }
            })
            .collect();
        RowOutcome { cells }
    }
}

fn run(validator: &Validator, raw: &str) -> Outcome {
    let outcome = validator.validate(raw);
    tracing::trace!(
        field = validator.field_name(),
        valid = outcome.is_valid(),
        kind = outcome.error_kind().map(|k| k.as_str()),
        "value normalized"
    );
    outcome
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    outcome: Outcome,
    original: String,
}

/// Outcomes for one row, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    cells: Vec<Cell>,
}

impl RowOutcome {
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.cells.iter().map(|cell| &cell.outcome)
    }

    pub fn outcome(&self, position: usize) -> Option<&Outcome> {
        self.cells.get(position).map(|cell| &cell.outcome)
    }

    /// True when every field validated.
    pub fn is_valid(&self) -> bool {
        self.cells.iter().all(|cell| cell.outcome.is_valid())
    }

    /// Output values: the processed value, or [`CANONICAL_NULL`] when the
    /// field failed.
    pub fn values(&self) -> Vec<&str> {
        self.cells
            .iter()
            .map(|cell| cell.outcome.processed_value().unwrap_or(CANONICAL_NULL))
            .collect()
    }

    /// Raw input a field was normalized from.
    pub fn original(&self, position: usize) -> Option<&str> {
        self.cells.get(position).map(|cell| cell.original.as_str())
    }

    /// Positions and outcomes of the fields that failed.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Outcome)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.outcome.is_valid())
            .map(|(i, cell)| (i, &cell.outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::{ErrorKind, FieldKind, LogicalType, NumericParams, TextParams};

    #[test]
    fn heuristics_follow_the_given_name() {
        let spec = FieldSpec::new("x", FieldKind::default_for(LogicalType::Integer));
        assert_eq!(normalize("x", "150", &spec).processed_value(), Some("150"));
        assert_eq!(normalize("age", "150", &spec).processed_value(), Some("120"));
    }

    #[test]
    fn unusable_spec_becomes_failure() {
        let spec = FieldSpec::new("x", FieldKind::Text(TextParams::default().with_encoding("nope")));
        let outcome = normalize("x", "abc", &spec);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Encoding));

        let spec = FieldSpec::new("x", FieldKind::Integer(NumericParams::new().with_range(9.0, 1.0)));
        assert_eq!(normalize("x", "5", &spec).error_kind(), Some(ErrorKind::Parse));
    }

    #[test]
    fn row_writes_null_for_failures() {
        let fields = [
            FieldSpec::new("n", FieldKind::default_for(LogicalType::Integer)),
            FieldSpec::new("t", FieldKind::default_for(LogicalType::Time)),
        ];
        let normalizer = Normalizer::new(&fields).expect("valid fields");
        let row = normalizer.normalize_row(&["๔๒", " 25:00 "]);
        assert_eq!(row.values(), ["42", CANONICAL_NULL]);
        assert_eq!(row.original(1), Some(" 25:00 "));
        assert!(!row.is_valid());
        assert_eq!(row.failures().map(|(i, _)| i).collect::<Vec<_>>(), [1]);

        let row = normalizer.normalize_row(&["ไม่ทราบ", "25:00"]);
        assert_eq!(row.values(), [CANONICAL_NULL, CANONICAL_NULL]);
        assert_eq!(row.failures().count(), 2);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let normalizer = Normalizer::new(std::iter::empty()).expect("empty schema");
        assert!(normalizer.is_empty());
        assert!(matches!(
            normalizer.normalize("missing", "1"),
            Err(NormalizationError::UnknownField(_))
        ));
    }
}
