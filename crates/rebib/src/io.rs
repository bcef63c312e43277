//! Format-file resolution and file conversion
//!
//! Glue around the engine: a format *name* maps to `<dir>/<name>.json`.
//! The engine itself never touches the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{convert, ConvertOutcome};
use crate::error::ConvertError;

/// The file a format name resolves to.
pub fn resolve_format(formats_dir: &Path, name: &str) -> PathBuf {
    formats_dir.join(format!("{}.json", name))
}

/// Read a named format specification's text.
pub fn load_format(formats_dir: &Path, name: &str) -> Result<String, ConvertError> {
    let path = resolve_format(formats_dir, name);
    if !path.is_file() {
        return Err(ConvertError::UnknownFormat {
            name: name.to_string(),
            path,
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Convert a BibTeX file with a named format.
pub fn convert_file(
    input: &Path,
    formats_dir: &Path,
    format_name: &str,
) -> Result<ConvertOutcome, ConvertError> {
    let spec_text = load_format(formats_dir, format_name)?;
    let text = fs::read_to_string(input)?;
    convert(&text, &spec_text)
}
