use fieldnorm_model::{ErrorKind, ModelError};
use thiserror::Error;

/// Configuration errors raised while building a validator.
///
/// These never come out of `validate`; they mean the field spec itself is
/// unusable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NormalizationError {
    #[error("invalid field specification: {0}")]
    InvalidField(#[from] ModelError),

    #[error("field {field}: invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("field {field}: unknown encoding label {label:?}")]
    UnknownEncoding { field: String, label: String },

    #[error("unknown field: {0}")]
    UnknownField(String),
}

impl NormalizationError {
    /// Outcome error kind used when this error surfaces for a single value.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NormalizationError::UnknownEncoding { .. } => ErrorKind::Encoding,
            NormalizationError::InvalidField(_)
            | NormalizationError::InvalidPattern { .. }
            | NormalizationError::UnknownField(_) => ErrorKind::Parse,
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizationError>;
