//! Specification errors

use thiserror::Error;

/// Error raised while building a [`crate::FormatSpec`] from its JSON text.
///
/// Raised before any entry is processed; a broken specification aborts the
/// whole conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("format specification is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("entry type '{0}' is declared more than once (type names are case-insensitive)")]
    DuplicateType(String),

    // Note: thiserror reserves the name `source` for the error cause, so
    // these variants call the offending source field `field`.
    #[error("unknown transform kind '{kind}' on field '{field}' of type '{entry_type}'")]
    UnknownTransform {
        entry_type: String,
        field: String,
        kind: String,
    },

    #[error("transform '{kind}' on field '{field}' of type '{entry_type}' is missing its '{parameter}' parameter")]
    MissingParameter {
        entry_type: String,
        field: String,
        kind: String,
        parameter: &'static str,
    },

    #[error("required field rule for '{field}' of type '{entry_type}' must name a target field")]
    MissingTarget { entry_type: String, field: String },

    #[error("source field '{field}' is declared twice in type '{entry_type}'")]
    DuplicateSource { entry_type: String, field: String },

    #[error("invalid template pattern '{pattern}': {message}")]
    BadPattern { pattern: String, message: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidJson(err.to_string())
    }
}
