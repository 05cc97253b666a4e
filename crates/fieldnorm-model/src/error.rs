use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("field name must not be empty")]
    EmptyName,
    #[error("unknown logical type: {0}")]
    UnknownType(String),
    #[error("field {field}: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        field: String,
        min: String,
        max: String,
    },
    #[error("field {field}: fuzzy threshold {value} is outside [0, 1]")]
    InvalidThreshold { field: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, ModelError>;
