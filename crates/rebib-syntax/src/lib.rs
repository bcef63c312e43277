//! BibTeX tokenizing and parsing
//!
//! This crate turns raw BibTeX source text into structured entries in two
//! stages:
//! - a tokenizer that scans the irregular BibTeX surface syntax (brace- and
//!   paren-delimited entries, nested braces, quoted values, `%` comments,
//!   `@comment`/`@string`/`@preamble` pseudo-entries) into spanned tokens;
//! - an entry parser that assembles tokens into ordered entries, expanding
//!   `@string` macros and `#` concatenation along the way.
//!
//! Field order and duplicate field names are preserved exactly as written;
//! policy decisions about duplicates belong to downstream consumers.

mod entry;
mod error;
mod parser;
mod token;

pub use entry::{Entry, Field};
pub use error::ParseError;
pub use parser::{parse_entries, ParseOutput};
pub use token::{Delimiter, Span, Token, TokenKind, Tokenizer};
