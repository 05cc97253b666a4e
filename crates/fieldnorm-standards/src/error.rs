use std::path::PathBuf;

use fieldnorm_model::ModelError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML schema {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render schema as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("unsupported schema version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("duplicate field in schema: {name}")]
    DuplicateField { name: String },

    #[error("invalid field {field}: {source}")]
    InvalidField {
        field: String,
        #[source]
        source: ModelError,
    },

    #[error("invalid pattern {pattern:?} for field {field}: {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
