//! Field normalization crate.
//!
//! Turns raw, loosely typed text into canonical values for a declared
//! logical type, or into a structured failure. Every validator returns an
//! [`Outcome`](fieldnorm_model::Outcome); nothing in the per-value path
//! returns an error or panics.
//!
//! # Overview
//!
//! - **Scalars**: integers and floats with range, clamp and outlier policies
//! - **Temporal**: dates (Thai month names, Buddhist era, ambiguous orders)
//!   and clock times
//! - **Boolean**: ternary mapping of affirmative, negative and unknown phrases
//! - **Multiclass**: controlled vocabularies with alias, fuzzy and partial
//!   matching
//! - **Text**: encoding recovery, Unicode normalization, cleanup and length
//!
//! # Example
//!
//! ```
//! use fieldnorm_model::{FieldKind, FieldSpec, NumericParams};
//! use fieldnorm_normalization::normalize;
//!
//! let age = FieldSpec::new(
//!     "อายุ(ปี)",
//!     FieldKind::Integer(NumericParams::new().with_range(0.0, 120.0).with_clamp(true)),
//! );
//! let outcome = normalize("อายุ(ปี)", "150", &age);
//! assert_eq!(outcome.processed_value(), Some("120"));
//! ```
//!
//! # Design Principles
//!
//! - **Schema-driven**: the logical type always comes from the field spec
//! - **Built once**: field-name heuristics run at construction, never per value
//! - **Failures are data**: a bad value never aborts a batch
//! - **Deterministic**: ties resolve by declaration order

mod error;
mod lexicon;
mod vocabulary;

pub mod boolean;
pub mod date;
pub mod dispatch;
pub mod multiclass;
pub mod numeric;
pub mod text;
pub mod time;
pub mod validator;

pub use error::{NormalizationError, Result};

pub use boolean::{BooleanMapper, Verdict};
pub use date::{DateProcessor, ParsedDate};
pub use dispatch::{Normalizer, RowOutcome, normalize};
pub use multiclass::{MatchKind, MulticlassValidator, VocabularyMatch};
pub use numeric::{FloatValidator, IntegerValidator, RangePolicy};
pub use text::TextProcessor;
pub use time::TimeProcessor;
pub use validator::{FieldValidator, Validator};
pub use vocabulary::{BuiltinVocabulary, builtin_for};
