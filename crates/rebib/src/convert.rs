//! Batch conversion driver
//!
//! Tokenize and parse the input once, build the specification once, then
//! transcode every entry against the single shared specification. Parse
//! and configuration problems abort the whole call; transcoding problems
//! are per-entry and collected by default.

use serde::{Serialize, Serializer};

use rebib_format::{FailedEntrySlot, FailurePolicy, FormatSpec};
use rebib_syntax::parse_entries;

use crate::emit;
use crate::error::{ConvertError, TranscodeError};
use crate::transcode::transcode_entry;

/// One collected per-entry failure.
#[derive(Debug, Clone, Serialize)]
pub struct EntryFailure {
    /// Position of the entry in source order, zero-based.
    pub index: usize,
    pub citation_key: String,
    #[serde(serialize_with = "error_as_string")]
    pub error: TranscodeError,
}

fn error_as_string<S: Serializer>(error: &TranscodeError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// The result of one batch conversion: output blocks in source order plus
/// whatever failures were collected along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertOutcome {
    pub outputs: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

/// Convert a whole BibTeX text under a JSON format specification.
pub fn convert(text: &str, spec_text: &str) -> Result<ConvertOutcome, ConvertError> {
    // The specification is validated before any entry is touched.
    let spec = FormatSpec::from_str(spec_text)?;
    let parsed = parse_entries(text)?;

    let mut outcome = ConvertOutcome::default();
    for (index, entry) in parsed.entries.iter().enumerate() {
        match transcode_entry(entry, &spec) {
            Ok(block) => outcome.outputs.push(block),
            Err(error) => {
                if spec.options.on_error == FailurePolicy::Abort {
                    return Err(error.into());
                }
                if spec.options.failed_entry == FailedEntrySlot::Placeholder {
                    outcome.outputs.push(emit::failure_placeholder(
                        &entry.citation_key,
                        &error.to_string(),
                    ));
                }
                outcome.failures.push(EntryFailure {
                    index,
                    citation_key: entry.citation_key.clone(),
                    error,
                });
            }
        }
    }
    Ok(outcome)
}

/// Convert a text expected to hold a single entry, returning its block.
pub fn convert_entry(text: &str, spec_text: &str) -> Result<String, ConvertError> {
    let spec = FormatSpec::from_str(spec_text)?;
    let parsed = parse_entries(text)?;
    let entry = parsed.entries.first().ok_or(ConvertError::EmptyInput)?;
    Ok(transcode_entry(entry, &spec)?)
}
