//! Core types for schema-driven field normalization.
//!
//! - [`FieldSpec`] declares a field: name, [`LogicalType`], nullability,
//!   default and the per-type parameters carried by [`FieldKind`].
//! - [`Outcome`] is what every validator returns for one raw value.

pub mod error;
pub mod field;
pub mod outcome;
pub mod params;

pub use error::{ModelError, Result};
pub use field::{FieldKind, FieldSpec, LogicalType};
pub use outcome::{CANONICAL_NULL, ErrorKind, Outcome};
pub use params::{
    BooleanOutput, BooleanParams, CleanPattern, DEFAULT_TEXT_MAX_LENGTH, DateParams,
    MulticlassParams, NumericParams, TextParams, TimeParams, UnicodeForm,
};
