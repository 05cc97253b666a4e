//! Schema registry for field normalization.
//!
//! A schema is an ordered list of [`FieldSpec`](fieldnorm_model::FieldSpec)s.
//! It comes either from the built-in heat surveillance definition or from a
//! TOML file:
//!
//! ```toml
//! [schema]
//! name = "heat-data"
//! version = 1
//!
//! [[fields]]
//! name = "อายุ(ปี)"
//! type = "integer"
//! min = 0
//! max = 120
//! clamp = true
//! ```
//!
//! Loaded registries are validated up front and carry the SHA-256 of the
//! file they came from.

pub mod error;
pub mod hash;
pub mod heat;
pub mod loader;
pub mod registry;
pub mod schema_file;

pub use crate::error::{Result, SchemaError};
pub use crate::heat::{HEAT_SCHEMA_NAME, heat_data_fields, heat_data_schema};
pub use crate::loader::{SCHEMA_ENV_VAR, load_schema, parse_schema, resolve_schema};
pub use crate::registry::{ColumnIssue, ColumnOrderReport, SchemaRegistry};
pub use crate::schema_file::{SUPPORTED_SCHEMA_VERSION, SchemaFile, SchemaHeader};
