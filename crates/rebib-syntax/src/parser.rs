//! BibTeX entry parser
//!
//! Drives the tokenizer and assembles [`Entry`] values. `@string`
//! definitions are collected in a single forward pass: a macro reference
//! resolves against everything defined above it, then the builtin month
//! abbreviations, and finally falls back to the bare name itself.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::entry::Entry;
use crate::error::{line_of, ParseError};
use crate::token::{Token, TokenKind, Tokenizer};

lazy_static! {
    /// Month abbreviations every BibTeX style file predefines.
    static ref MONTH_MACROS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("jan", "January");
        m.insert("feb", "February");
        m.insert("mar", "March");
        m.insert("apr", "April");
        m.insert("may", "May");
        m.insert("jun", "June");
        m.insert("jul", "July");
        m.insert("aug", "August");
        m.insert("sep", "September");
        m.insert("oct", "October");
        m.insert("nov", "November");
        m.insert("dec", "December");
        m
    };
}

/// Everything a parse produces: entries in source order, the accumulated
/// `@string` table, and `@preamble` contents.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub entries: Vec<Entry>,
    pub macros: HashMap<String, String>,
    pub preambles: Vec<String>,
}

struct Cursor<'a> {
    input: &'a str,
    tokens: Tokenizer<'a>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor {
            input,
            tokens: Tokenizer::new(input),
        }
    }

    fn next(&mut self) -> Result<Option<Token>, ParseError> {
        self.tokens.next().transpose()
    }

    /// Next token, where end-of-input is itself an error.
    fn expect_next(&mut self) -> Result<Token, ParseError> {
        self.next()?.ok_or(ParseError::UnterminatedEntry {
            offset: self.input.len(),
            line: line_of(self.input, self.input.len()),
        })
    }

    fn unexpected(&self, token: &Token, wanted: &str) -> ParseError {
        ParseError::Malformed {
            message: format!("expected {}, found {:?}", wanted, token.kind),
            offset: token.span.start,
            line: line_of(self.input, token.span.start),
        }
    }
}

/// Parse a complete BibTeX text.
///
/// Entries come back in source order. Parse errors are fatal: broken
/// lexical structure poisons everything after it, so there is no partial
/// output.
pub fn parse_entries(input: &str) -> Result<ParseOutput, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut output = ParseOutput::default();

    while let Some(token) = cursor.next()? {
        match token.kind {
            TokenKind::Comment | TokenKind::CommentEntry => {}
            TokenKind::StringMacro { .. } => {
                parse_macro_defs(&mut cursor, &mut output.macros)?;
            }
            TokenKind::PreambleEntry { .. } => {
                let (value, after) = parse_value_seq(&mut cursor, &output.macros)?;
                if after.kind != TokenKind::EntryEnd {
                    return Err(cursor.unexpected(&after, "end of preamble"));
                }
                output.preambles.push(value);
            }
            TokenKind::EntryStart { entry_type, .. } => {
                let entry = parse_entry_body(&mut cursor, entry_type, &output.macros)?;
                output.entries.push(entry);
            }
            _ => return Err(cursor.unexpected(&token, "an entry")),
        }
    }

    Ok(output)
}

/// `@string{name = value, ...}` bodies. Later definitions shadow earlier
/// ones, matching BibTeX's own behavior.
fn parse_macro_defs(
    cursor: &mut Cursor,
    macros: &mut HashMap<String, String>,
) -> Result<(), ParseError> {
    loop {
        let token = cursor.expect_next()?;
        let name = match token.kind {
            TokenKind::EntryEnd => return Ok(()),
            TokenKind::FieldName(name) => name,
            _ => return Err(cursor.unexpected(&token, "a macro name")),
        };
        let eq = cursor.expect_next()?;
        if eq.kind != TokenKind::Equals {
            return Err(cursor.unexpected(&eq, "'='"));
        }
        let (value, after) = parse_value_seq(cursor, macros)?;
        macros.insert(name.to_lowercase(), value);
        match after.kind {
            TokenKind::Comma => {}
            TokenKind::EntryEnd => return Ok(()),
            _ => return Err(cursor.unexpected(&after, "',' or end of definition")),
        }
    }
}

fn parse_entry_body(
    cursor: &mut Cursor,
    entry_type: String,
    macros: &HashMap<String, String>,
) -> Result<Entry, ParseError> {
    let key_token = cursor.expect_next()?;
    let citation_key = match key_token.kind {
        TokenKind::Key(key) => key,
        _ => return Err(cursor.unexpected(&key_token, "a citation key")),
    };
    let mut entry = Entry::new(entry_type, citation_key);

    // After the key: a comma before each field, or the closing delimiter.
    let mut token = cursor.expect_next()?;
    loop {
        match token.kind {
            TokenKind::EntryEnd => return Ok(entry),
            TokenKind::Comma => {}
            _ => return Err(cursor.unexpected(&token, "',' or end of entry")),
        }
        let name_token = cursor.expect_next()?;
        let name = match name_token.kind {
            // Trailing comma before the closing delimiter.
            TokenKind::EntryEnd => return Ok(entry),
            TokenKind::FieldName(name) => name,
            _ => return Err(cursor.unexpected(&name_token, "a field name")),
        };
        let eq = cursor.expect_next()?;
        if eq.kind != TokenKind::Equals {
            return Err(cursor.unexpected(&eq, "'='"));
        }
        let (value, after) = parse_value_seq(cursor, macros)?;
        entry.add_field(name, value);
        token = after;
    }
}

/// One value, possibly a `#`-joined sequence of parts. Returns the
/// resolved text together with the token that followed it.
fn parse_value_seq(
    cursor: &mut Cursor,
    macros: &HashMap<String, String>,
) -> Result<(String, Token), ParseError> {
    let mut value = String::new();
    loop {
        let token = cursor.expect_next()?;
        match token.kind {
            TokenKind::BraceValue(part)
            | TokenKind::QuotedValue(part)
            | TokenKind::NumberValue(part) => value.push_str(&part),
            TokenKind::MacroName(name) => {
                let lowered = name.to_lowercase();
                if let Some(expansion) = macros.get(&lowered) {
                    value.push_str(expansion);
                } else if let Some(month) = MONTH_MACROS.get(lowered.as_str()) {
                    value.push_str(month);
                } else {
                    // Undefined macro: keep the bare name as a literal.
                    value.push_str(&name);
                }
            }
            _ => return Err(cursor.unexpected(&token, "a value")),
        }
        let after = cursor.expect_next()?;
        if after.kind != TokenKind::Concat {
            return Ok((value, after));
        }
    }
}
