use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

/// Structural defects in a block tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Block '{key}' has a non-sequence child list (found {found})")]
    MalformedChildren { key: String, found: &'static str },

    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Duplicate block type id: {0}")]
    DuplicateBlockType(String),
}

impl TreeError {
    pub fn malformed_children(key: impl Into<String>, found: &serde_json::Value) -> Self {
        Self::MalformedChildren {
            key: key.into(),
            found: value_kind(found),
        }
    }
}

/// Failures writing into a value bag.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Empty value path")]
    EmptyPath,

    #[error("Cannot descend into '{segment}': value is a {found}")]
    NotAContainer { segment: String, found: &'static str },

    #[error("Invalid array index '{segment}'")]
    InvalidIndex { segment: String },
}

pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
