use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::params::{
    BooleanParams, DateParams, MulticlassParams, NumericParams, TextParams, TimeParams,
};

/// Logical type declared for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    Integer,
    Float,
    Date,
    Time,
    Boolean,
    Multiclass,
    Text,
}

impl LogicalType {
    pub const ALL: [LogicalType; 7] = [
        LogicalType::Integer,
        LogicalType::Float,
        LogicalType::Date,
        LogicalType::Time,
        LogicalType::Boolean,
        LogicalType::Multiclass,
        LogicalType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::Date => "date",
            LogicalType::Time => "time",
            LogicalType::Boolean => "boolean",
            LogicalType::Multiclass => "multiclass",
            LogicalType::Text => "text",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalType {
    type Err = ModelError;

    /// Accepts the canonical names plus a few common spellings.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integer" | "int" => Ok(LogicalType::Integer),
            "float" | "double" | "decimal" => Ok(LogicalType::Float),
            "date" => Ok(LogicalType::Date),
            "time" => Ok(LogicalType::Time),
            "boolean" | "bool" => Ok(LogicalType::Boolean),
            "multiclass" | "categorical" => Ok(LogicalType::Multiclass),
            "text" | "string" => Ok(LogicalType::Text),
            _ => Err(ModelError::UnknownType(s.to_string())),
        }
    }
}

/// Logical type together with its validation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Integer(NumericParams),
    Float(NumericParams),
    Date(DateParams),
    Time(TimeParams),
    Boolean(BooleanParams),
    Multiclass(MulticlassParams),
    Text(TextParams),
}

impl FieldKind {
    pub fn logical_type(&self) -> LogicalType {
        match self {
            FieldKind::Integer(_) => LogicalType::Integer,
            FieldKind::Float(_) => LogicalType::Float,
            FieldKind::Date(_) => LogicalType::Date,
            FieldKind::Time(_) => LogicalType::Time,
            FieldKind::Boolean(_) => LogicalType::Boolean,
            FieldKind::Multiclass(_) => LogicalType::Multiclass,
            FieldKind::Text(_) => LogicalType::Text,
        }
    }

    /// Parameters-at-default kind for a logical type.
    pub fn default_for(logical_type: LogicalType) -> Self {
        match logical_type {
            LogicalType::Integer => FieldKind::Integer(NumericParams::default()),
            LogicalType::Float => FieldKind::Float(NumericParams::default()),
            LogicalType::Date => FieldKind::Date(DateParams::default()),
            LogicalType::Time => FieldKind::Time(TimeParams::default()),
            LogicalType::Boolean => FieldKind::Boolean(BooleanParams::default()),
            LogicalType::Multiclass => FieldKind::Multiclass(MulticlassParams::default()),
            LogicalType::Text => FieldKind::Text(TextParams::default()),
        }
    }
}

/// Declaration of a single field: name, logical type, nullability and
/// validation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            required: false,
            default_value: None,
            description: String::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn logical_type(&self) -> LogicalType {
        self.kind.logical_type()
    }

    pub fn allows_null(&self) -> bool {
        !self.required
    }

    /// Display name, falling back to the field name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Check parameter consistency that does not need a regex engine.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        match &self.kind {
            FieldKind::Integer(params) | FieldKind::Float(params) => {
                if let (Some(min), Some(max)) = (params.min, params.max)
                    && min > max
                {
                    return Err(ModelError::InvalidRange {
                        field: self.name.clone(),
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                }
            }
            FieldKind::Date(params) => {
                if params.min_year > params.max_year {
                    return Err(ModelError::InvalidRange {
                        field: self.name.clone(),
                        min: params.min_year.to_string(),
                        max: params.max_year.to_string(),
                    });
                }
            }
            FieldKind::Multiclass(params) => {
                if !(0.0..=1.0).contains(&params.fuzzy_threshold) {
                    return Err(ModelError::InvalidThreshold {
                        field: self.name.clone(),
                        value: params.fuzzy_threshold,
                    });
                }
            }
            FieldKind::Text(params) => {
                if let Some(max) = params.max_length
                    && params.min_length > max
                {
                    return Err(ModelError::InvalidRange {
                        field: self.name.clone(),
                        min: params.min_length.to_string(),
                        max: max.to_string(),
                    });
                }
            }
            FieldKind::Time(_) | FieldKind::Boolean(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_type_from_str_accepts_aliases() {
        assert_eq!("INT".parse::<LogicalType>().unwrap(), LogicalType::Integer);
        assert_eq!(
            "categorical".parse::<LogicalType>().unwrap(),
            LogicalType::Multiclass
        );
        assert!("blob".parse::<LogicalType>().is_err());
    }

    #[test]
    fn validate_rejects_inverted_numeric_range() {
        let spec = FieldSpec::new(
            "age",
            FieldKind::Integer(NumericParams::new().with_range(10.0, 1.0)),
        );
        assert!(matches!(
            spec.validate(),
            Err(ModelError::InvalidRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_threshold_above_one() {
        let params = MulticlassParams {
            fuzzy_threshold: 1.5,
            ..MulticlassParams::default()
        };
        let spec = FieldSpec::new("gender", FieldKind::Multiclass(params));
        assert!(matches!(
            spec.validate(),
            Err(ModelError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn label_falls_back_to_name() {
        let spec = FieldSpec::new("ปี", FieldKind::default_for(LogicalType::Integer));
        assert_eq!(spec.label(), "ปี");
        assert_eq!(spec.clone().with_display_name("Year").label(), "Year");
        assert!(spec.allows_null());
    }
}
