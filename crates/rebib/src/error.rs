//! Conversion error types

use std::path::PathBuf;

use thiserror::Error;

/// A per-entry transcoding failure. Non-fatal by default: the batch driver
/// collects these and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    #[error("entry '{key}': required field '{field}' is missing and has no default")]
    MissingRequired { key: String, field: String },

    #[error("entry '{key}': field '{field}' has no mapping for type '{entry_type}'")]
    UnmappedField {
        key: String,
        entry_type: String,
        field: String,
    },

    #[error("entry '{key}': no rule for entry type '{entry_type}'")]
    UnknownEntryType { key: String, entry_type: String },

    #[error("entry '{key}': field '{field}' appears more than once")]
    AmbiguousField { key: String, field: String },

    #[error("entry '{key}': cannot parse contributor name '{name}': {message}")]
    BadName {
        key: String,
        name: String,
        message: String,
    },
}

/// Umbrella error for the conversion entry points and the CLI.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] rebib_syntax::ParseError),

    #[error(transparent)]
    Config(#[from] rebib_format::ConfigError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error("input contains no entries")]
    EmptyInput,

    #[error("unknown format '{name}': no file at '{}'", path.display())]
    UnknownFormat { name: String, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
