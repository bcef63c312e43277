//! Parse error type with source locations

use thiserror::Error;

/// Error raised while tokenizing or parsing BibTeX text.
///
/// Every variant carries the byte offset into the input and the 1-based
/// line it occurred on. A parse error is fatal to the whole input: once
/// lexical structure is broken, downstream offsets cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("'@' is not followed by a valid entry type at byte {offset} (line {line})")]
    InvalidEntryType { offset: usize, line: u32 },

    #[error("unmatched closing delimiter '{found}' at byte {offset} (line {line})")]
    UnmatchedCloser { found: char, offset: usize, line: u32 },

    #[error("unterminated value starting at byte {offset} (line {line})")]
    UnterminatedValue { offset: usize, line: u32 },

    #[error("entry is missing its closing delimiter at end of input (opened near byte {offset}, line {line})")]
    UnterminatedEntry { offset: usize, line: u32 },

    #[error("expected '=' after field name at byte {offset} (line {line})")]
    ExpectedEquals { offset: usize, line: u32 },

    #[error("expected a field value at byte {offset} (line {line})")]
    ExpectedValue { offset: usize, line: u32 },

    #[error("malformed entry at byte {offset} (line {line}): {message}")]
    Malformed {
        message: String,
        offset: usize,
        line: u32,
    },
}

impl ParseError {
    /// Byte offset into the source text.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::InvalidEntryType { offset, .. }
            | ParseError::UnmatchedCloser { offset, .. }
            | ParseError::UnterminatedValue { offset, .. }
            | ParseError::UnterminatedEntry { offset, .. }
            | ParseError::ExpectedEquals { offset, .. }
            | ParseError::ExpectedValue { offset, .. }
            | ParseError::Malformed { offset, .. } => *offset,
        }
    }

    /// 1-based line number in the source text.
    pub fn line(&self) -> u32 {
        match self {
            ParseError::InvalidEntryType { line, .. }
            | ParseError::UnmatchedCloser { line, .. }
            | ParseError::UnterminatedValue { line, .. }
            | ParseError::UnterminatedEntry { line, .. }
            | ParseError::ExpectedEquals { line, .. }
            | ParseError::ExpectedValue { line, .. }
            | ParseError::Malformed { line, .. } => *line,
        }
    }
}

/// Compute the 1-based line number for a byte offset.
pub(crate) fn line_of(input: &str, offset: usize) -> u32 {
    let end = offset.min(input.len());
    input[..end].bytes().filter(|&b| b == b'\n').count() as u32 + 1
}
