//! Document error types

/// Errors raised while decoding or reshaping a document
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("document is neither valid JSON nor YAML (JSON error: {json}; YAML error: {yaml})")]
    Parse { json: String, yaml: String },

    #[error("expected a mapping at {pointer}, found {found}")]
    NotAMapping { pointer: String, found: &'static str },

    #[error("unsupported YAML mapping key at {pointer}: {key}")]
    UnsupportedKey { pointer: String, key: String },

    #[error("document structure is invalid: {0}")]
    Structure(String),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Short name of a value's variant, used in error messages
pub fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "sequence",
        serde_json::Value::Object(_) => "mapping",
    }
}
