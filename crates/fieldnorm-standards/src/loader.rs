use std::path::{Path, PathBuf};

use crate::error::{Result, SchemaError};
use crate::hash::sha256_hex;
use crate::heat::heat_data_schema;
use crate::registry::SchemaRegistry;
use crate::schema_file::SchemaFile;

/// Environment variable naming a schema file to use instead of the
/// built-in schema.
pub const SCHEMA_ENV_VAR: &str = "FIELDNORM_SCHEMA";

/// Load and validate a TOML schema file.
pub fn load_schema(path: &Path) -> Result<SchemaRegistry> {
    let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let registry = parse_schema(&contents, path)?;
    tracing::debug!(
        path = %path.display(),
        schema = registry.name(),
        fields = registry.len(),
        fingerprint = registry.fingerprint(),
        "loaded schema"
    );
    Ok(registry)
}

/// Parse schema text; `origin` only labels errors.
pub fn parse_schema(contents: &str, origin: &Path) -> Result<SchemaRegistry> {
    let file: SchemaFile = toml::from_str(contents).map_err(|e| SchemaError::Toml {
        path: origin.to_path_buf(),
        source: e,
    })?;
    SchemaRegistry::from_file(file, sha256_hex(contents.as_bytes()))
}

/// Schema file named by [`SCHEMA_ENV_VAR`], if set and non-empty.
pub fn default_schema_path() -> Option<PathBuf> {
    std::env::var_os(SCHEMA_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Resolve the schema to use: an explicit path, then [`SCHEMA_ENV_VAR`], then
/// the built-in heat surveillance schema.
pub fn resolve_schema(explicit: Option<&Path>) -> Result<SchemaRegistry> {
    match explicit.map(Path::to_path_buf).or_else(default_schema_path) {
        Some(path) => load_schema(&path),
        None => heat_data_schema(),
    }
}
