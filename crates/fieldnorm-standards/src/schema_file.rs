use fieldnorm_model::FieldSpec;
use serde::{Deserialize, Serialize};

/// Schema file versions this crate reads.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of a TOML schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    pub schema: SchemaHeader,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaHeader {
    pub name: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
