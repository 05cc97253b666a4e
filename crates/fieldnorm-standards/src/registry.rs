use std::collections::HashMap;
use std::fmt;

use fieldnorm_model::{FieldKind, FieldSpec, LogicalType};
use regex::Regex;
use serde::Serialize;

use crate::error::{Result, SchemaError};
use crate::schema_file::{SUPPORTED_SCHEMA_VERSION, SchemaFile, SchemaHeader};

/// Ordered, validated field declarations.
///
/// Built once and never mutated; field order is the output column order.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    name: String,
    version: u32,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    fingerprint: Option<String>,
}

impl SchemaRegistry {
    /// Validate `fields` and build the registry.
    ///
    /// Rejects duplicate names, inconsistent parameters and patterns that do
    /// not compile.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, spec) in fields.iter().enumerate() {
            spec.validate().map_err(|source| SchemaError::InvalidField {
                field: spec.name.clone(),
                source,
            })?;
            check_patterns(spec)?;
            if index.insert(spec.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateField {
                    name: spec.name.clone(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            version: SUPPORTED_SCHEMA_VERSION,
            description: None,
            fields,
            index,
            fingerprint: None,
        })
    }

    pub(crate) fn from_file(file: SchemaFile, fingerprint: String) -> Result<Self> {
        if file.schema.version != SUPPORTED_SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                version: file.schema.version,
            });
        }
        if file.fields.is_empty() {
            return Err(SchemaError::InvalidSchema {
                message: format!("schema {} declares no fields", file.schema.name),
            });
        }
        let mut registry = Self::new(file.schema.name, file.fields)?;
        registry.description = file.schema.description;
        registry.fingerprint = Some(fingerprint);
        Ok(registry)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// SHA-256 of the schema file this registry was loaded from.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field declarations in column order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column_order(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn fields_of_type(&self, logical_type: LogicalType) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.logical_type() == logical_type)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Column names paired with their logical types, in column order.
    pub fn column_types(&self) -> Vec<(&str, LogicalType)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.logical_type()))
            .collect()
    }

    /// Column names paired with their default values, in column order.
    pub fn empty_row(&self) -> Vec<(&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.default_value.as_deref()))
            .collect()
    }

    /// Unknown columns are not required.
    pub fn is_required(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.required)
    }

    /// Compare `columns` position by position against the schema order.
    pub fn check_column_order<S: AsRef<str>>(&self, columns: &[S]) -> ColumnOrderReport {
        let mut issues = Vec::new();
        if columns.len() != self.fields.len() {
            issues.push(ColumnIssue::CountMismatch {
                expected: self.fields.len(),
                actual: columns.len(),
            });
        }
        for (position, spec) in self.fields.iter().enumerate() {
            match columns.get(position).map(AsRef::as_ref) {
                Some(found) if found == spec.name => {}
                Some(found) => issues.push(ColumnIssue::Mismatch {
                    position,
                    expected: spec.name.clone(),
                    found: found.to_string(),
                }),
                None => issues.push(ColumnIssue::Missing {
                    position,
                    expected: spec.name.clone(),
                }),
            }
        }
        for (position, found) in columns.iter().enumerate().skip(self.fields.len()) {
            issues.push(ColumnIssue::Unexpected {
                position,
                found: found.as_ref().to_string(),
            });
        }
        ColumnOrderReport { issues }
    }

    /// Render the registry in the schema file format.
    pub fn to_toml(&self) -> Result<String> {
        let file = SchemaFile {
            schema: SchemaHeader {
                name: self.name.clone(),
                version: self.version,
                description: self.description.clone(),
            },
            fields: self.fields.clone(),
        };
        Ok(toml::to_string(&file)?)
    }
}

fn check_patterns(spec: &FieldSpec) -> Result<()> {
    let FieldKind::Text(params) = &spec.kind else {
        return Ok(());
    };
    let patterns = params
        .clean_patterns
        .iter()
        .map(|p| p.pattern.as_str())
        .chain(params.pattern.as_deref());
    for pattern in patterns {
        Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
            field: spec.name.clone(),
            pattern: pattern.to_string(),
            source,
        })?;
    }
    Ok(())
}

/// One discrepancy between a header and the schema column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ColumnIssue {
    CountMismatch { expected: usize, actual: usize },
    Mismatch { position: usize, expected: String, found: String },
    Missing { position: usize, expected: String },
    Unexpected { position: usize, found: String },
}

impl fmt::Display for ColumnIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnIssue::CountMismatch { expected, actual } => {
                write!(f, "Expected {expected} columns, got {actual}")
            }
            ColumnIssue::Mismatch {
                position,
                expected,
                found,
            } => write!(f, "Column {position}: expected '{expected}', got '{found}'"),
            ColumnIssue::Missing { position, expected } => {
                write!(f, "Missing column {position}: '{expected}'")
            }
            ColumnIssue::Unexpected { position, found } => {
                write!(f, "Unexpected column {position}: '{found}'")
            }
        }
    }
}

/// Result of [`SchemaRegistry::check_column_order`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnOrderReport {
    pub issues: Vec<ColumnIssue>,
}

impl ColumnOrderReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ColumnOrderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("Column order matches schema");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnorm_model::{NumericParams, TextParams};

    fn small() -> SchemaRegistry {
        SchemaRegistry::new(
            "small",
            vec![
                FieldSpec::new("a", FieldKind::default_for(LogicalType::Integer)).with_required(true),
                FieldSpec::new("b", FieldKind::default_for(LogicalType::Text)).with_default_value("x"),
                FieldSpec::new("c", FieldKind::default_for(LogicalType::Integer)),
            ],
        )
        .expect("valid schema")
    }

    #[test]
    fn lookups() {
        let registry = small();
        assert_eq!(registry.column_order(), ["a", "b", "c"]);
        assert_eq!(registry.fields_of_type(LogicalType::Integer), ["a", "c"]);
        assert!(registry.is_required("a"));
        assert!(!registry.is_required("b"));
        assert!(!registry.is_required("zzz"));
        assert_eq!(registry.position("c"), Some(2));
        assert_eq!(registry.column_types()[1], ("b", LogicalType::Text));
        assert_eq!(
            registry.empty_row(),
            [("a", None), ("b", Some("x")), ("c", None)]
        );
    }

    #[test]
    fn rejects_duplicates_and_bad_params() {
        let dup = SchemaRegistry::new(
            "dup",
            vec![
                FieldSpec::new("a", FieldKind::default_for(LogicalType::Text)),
                FieldSpec::new("a", FieldKind::default_for(LogicalType::Date)),
            ],
        );
        assert!(matches!(dup, Err(SchemaError::DuplicateField { .. })));

        let range = SchemaRegistry::new(
            "range",
            vec![FieldSpec::new(
                "n",
                FieldKind::Float(NumericParams::new().with_range(2.0, 1.0)),
            )],
        );
        assert!(matches!(range, Err(SchemaError::InvalidField { .. })));

        let pattern = SchemaRegistry::new(
            "pattern",
            vec![FieldSpec::new(
                "t",
                FieldKind::Text(TextParams::default().with_pattern("(unclosed")),
            )],
        );
        assert!(matches!(pattern, Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn column_order_lists_every_problem() {
        let report = small().check_column_order(&["a", "x", "c", "d"]);
        assert!(!report.is_ok());
        assert_eq!(
            report.to_string(),
            "Expected 3 columns, got 4\nColumn 1: expected 'b', got 'x'\nUnexpected column 3: 'd'"
        );

        let short = small().check_column_order(&["a"]);
        assert_eq!(short.issues.len(), 3);
        assert_eq!(short.issues[2].to_string(), "Missing column 2: 'c'");

        assert!(small().check_column_order(&["a", "b", "c"]).is_ok());
    }
}
