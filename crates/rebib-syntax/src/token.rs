//! BibTeX tokenizer
//!
//! Scans raw text into a lazy sequence of spanned tokens. BibTeX has no
//! single formal grammar, so this is a small tagged state machine: the
//! tokenizer tracks whether it is between entries or inside one, which
//! delimiter opened the current entry (`{` or `(`), and what kind of token
//! is expected next. Brace depth and quote state are tracked by hand;
//! nom combinators cover the character-class pieces.

use nom::bytes::complete::take_while1;
use nom::character::complete::multispace0;
use nom::IResult;

use crate::error::{line_of, ParseError};

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Which delimiter opened an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Brace,
    Paren,
}

impl Delimiter {
    fn closer(self) -> char {
        match self {
            Delimiter::Brace => '}',
            Delimiter::Paren => ')',
        }
    }
}

/// One lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token variants produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `@type{` or `@type(` for a regular entry; the type is lowercased.
    EntryStart {
        entry_type: String,
        delimiter: Delimiter,
    },
    /// The citation key following an entry start. Original casing kept.
    Key(String),
    /// A field name (or `@string` macro name). Original casing kept.
    FieldName(String),
    /// A `{...}` value with the outer braces stripped; inner braces kept.
    BraceValue(String),
    /// A `"..."` value with the quotes stripped; inner braces kept.
    QuotedValue(String),
    /// A bare numeric value.
    NumberValue(String),
    /// A bare identifier in value position, referencing a string macro.
    MacroName(String),
    Comma,
    Equals,
    /// `#` between value parts.
    Concat,
    /// The closing delimiter of the current entry.
    EntryEnd,
    /// A `%` line comment.
    Comment,
    /// An entire `@comment{...}` (or to-end-of-line) region.
    CommentEntry,
    /// `@string{` opening a macro definition.
    StringMacro { delimiter: Delimiter },
    /// `@preamble{` opening a preamble.
    PreambleEntry { delimiter: Delimiter },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    /// After the citation key: only a comma or the closer.
    KeySeparator,
    FieldName,
    Equals,
    Value,
    /// After a value: comma, `#` continuation, or the closer.
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Top,
    Entry { delimiter: Delimiter, expect: Expect },
}

fn entry_type(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

fn citation_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(input)
}

fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "_-.".contains(c))(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// Scan `{...}` content with nested braces, returning the inner text.
/// `\X` escapes are kept verbatim but never counted as delimiters.
fn braced(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    let mut depth = 0usize;
    let mut pos = 0usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[1..pos]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Eof,
    )))
}

/// Scan `"..."` content, returning the inner text. The terminating quote
/// must sit at brace depth zero, so `"A {Quoted "} Title"` style values
/// keep their inner braces intact. A `}` at depth zero fails with
/// `ErrorKind::Verify`: the value would re-emit as a malformed block.
fn quoted(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'"') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    let mut depth = 0usize;
    let mut pos = 1usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' if depth == 0 => return Ok((&input[pos + 1..], &input[1..pos])),
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        &input[pos..],
                        nom::error::ErrorKind::Verify,
                    )));
                }
                depth -= 1;
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Eof,
    )))
}

/// Lazy tokenizer over one input text.
///
/// Yields `Result<Token, ParseError>`; after the first error the iterator
/// is fused and returns `None`.
pub struct Tokenizer<'a> {
    input: &'a str,
    rest: &'a str,
    mode: Mode,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            rest: input,
            mode: Mode::Top,
            failed: false,
        }
    }

    fn pos(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    fn line(&self, offset: usize) -> u32 {
        line_of(self.input, offset)
    }

    fn skip_whitespace(&mut self) {
        if let Ok((rest, _)) = whitespace(self.rest) {
            self.rest = rest;
        }
    }

    fn fail(&mut self, err: ParseError) -> Option<Result<Token, ParseError>> {
        self.failed = true;
        Some(Err(err))
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Option<Result<Token, ParseError>> {
        Some(Ok(Token {
            kind,
            span: Span {
                start,
                end: self.pos(),
            },
        }))
    }

    fn next_top(&mut self) -> Option<Result<Token, ParseError>> {
        loop {
            self.skip_whitespace();
            let start = self.pos();
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            match c {
                '%' => {
                    let eol = self.rest.find('\n').unwrap_or(self.rest.len());
                    self.rest = &self.rest[eol..];
                    return self.token(TokenKind::Comment, start);
                }
                '@' => return self.next_at(start),
                '}' | ')' => {
                    return self.fail(ParseError::UnmatchedCloser {
                        found: c,
                        offset: start,
                        line: self.line(start),
                    });
                }
                // Inter-entry prose is ignored, as BibTeX itself does.
                _ => {
                    self.rest = chars.as_str();
                }
            }
        }
    }

    fn next_at(&mut self, start: usize) -> Option<Result<Token, ParseError>> {
        // Consume '@', allow whitespace, then require a type identifier.
        self.rest = &self.rest[1..];
        self.skip_whitespace();
        let (rest, name) = match entry_type(self.rest) {
            Ok(v) => v,
            Err(_) => {
                return self.fail(ParseError::InvalidEntryType {
                    offset: start,
                    line: self.line(start),
                });
            }
        };
        self.rest = rest;
        let lowered = name.to_lowercase();

        if lowered == "comment" {
            return self.comment_entry(start);
        }

        self.skip_whitespace();
        let delimiter = match self.rest.chars().next() {
            Some('{') => Delimiter::Brace,
            Some('(') => Delimiter::Paren,
            _ => {
                let offset = self.pos();
                return self.fail(ParseError::Malformed {
                    message: format!("expected '{{' or '(' after '@{}'", lowered),
                    offset,
                    line: self.line(offset),
                });
            }
        };
        self.rest = &self.rest[1..];

        match lowered.as_str() {
            "string" => {
                self.mode = Mode::Entry {
                    delimiter,
                    expect: Expect::FieldName,
                };
                self.token(TokenKind::StringMacro { delimiter }, start)
            }
            "preamble" => {
                self.mode = Mode::Entry {
                    delimiter,
                    expect: Expect::Value,
                };
                self.token(TokenKind::PreambleEntry { delimiter }, start)
            }
            _ => {
                self.mode = Mode::Entry {
                    delimiter,
                    expect: Expect::Key,
                };
                self.token(
                    TokenKind::EntryStart {
                        entry_type: lowered,
                        delimiter,
                    },
                    start,
                )
            }
        }
    }

    /// `@comment{...}` with balanced delimiters, or to end of line when no
    /// delimiter follows.
    fn comment_entry(&mut self, start: usize) -> Option<Result<Token, ParseError>> {
        self.skip_whitespace();
        match self.rest.chars().next() {
            Some('{') => match braced(self.rest) {
                Ok((rest, _)) => {
                    self.rest = rest;
                    self.token(TokenKind::CommentEntry, start)
                }
                Err(_) => self.fail(ParseError::UnterminatedValue {
                    offset: self.pos(),
                    line: self.line(self.pos()),
                }),
            },
            Some('(') => {
                let bytes = self.rest.as_bytes();
                let mut depth = 0usize;
                let mut pos = 0usize;
                while pos < bytes.len() {
                    match bytes[pos] {
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                self.rest = &self.rest[pos + 1..];
                                return self.token(TokenKind::CommentEntry, start);
                            }
                        }
                        _ => {}
                    }
                    pos += 1;
                }
                let offset = self.pos();
                self.fail(ParseError::UnterminatedValue {
                    offset,
                    line: self.line(offset),
                })
            }
            _ => {
                let eol = self.rest.find('\n').unwrap_or(self.rest.len());
                self.rest = &self.rest[eol..];
                self.token(TokenKind::CommentEntry, start)
            }
        }
    }

    fn next_in_entry(
        &mut self,
        delimiter: Delimiter,
        expect: Expect,
    ) -> Option<Result<Token, ParseError>> {
        self.skip_whitespace();
        let start = self.pos();
        let Some(c) = self.rest.chars().next() else {
            return self.fail(ParseError::UnterminatedEntry {
                offset: start,
                line: self.line(start),
            });
        };

        if c == delimiter.closer() && expect != Expect::Value && expect != Expect::Equals {
            self.rest = &self.rest[1..];
            self.mode = Mode::Top;
            return self.token(TokenKind::EntryEnd, start);
        }

        match expect {
            Expect::Key => match citation_key(self.rest) {
                Ok((rest, key)) => {
                    self.rest = rest;
                    self.set_expect(delimiter, Expect::KeySeparator);
                    self.token(TokenKind::Key(key.to_string()), start)
                }
                Err(_) => self.fail(ParseError::Malformed {
                    message: "expected a citation key".to_string(),
                    offset: start,
                    line: self.line(start),
                }),
            },
            Expect::FieldName => match field_name(self.rest) {
                Ok((rest, name)) => {
                    self.rest = rest;
                    self.set_expect(delimiter, Expect::Equals);
                    self.token(TokenKind::FieldName(name.to_string()), start)
                }
                Err(_) => self.fail(ParseError::Malformed {
                    message: format!("expected a field name, found '{}'", c),
                    offset: start,
                    line: self.line(start),
                }),
            },
            Expect::Equals => {
                if c == '=' {
                    self.rest = &self.rest[1..];
                    self.set_expect(delimiter, Expect::Value);
                    self.token(TokenKind::Equals, start)
                } else {
                    self.fail(ParseError::ExpectedEquals {
                        offset: start,
                        line: self.line(start),
                    })
                }
            }
            Expect::Value => self.next_value(delimiter, start),
            Expect::KeySeparator => match c {
                ',' => {
                    self.rest = &self.rest[1..];
                    self.set_expect(delimiter, Expect::FieldName);
                    self.token(TokenKind::Comma, start)
                }
                _ => self.fail(ParseError::Malformed {
                    message: format!(
                        "expected ',' or closing delimiter after citation key, found '{}'",
                        c
                    ),
                    offset: start,
                    line: self.line(start),
                }),
            },
            Expect::Separator => match c {
                ',' => {
                    self.rest = &self.rest[1..];
                    self.set_expect(delimiter, Expect::FieldName);
                    self.token(TokenKind::Comma, start)
                }
                '#' => {
                    self.rest = &self.rest[1..];
                    self.set_expect(delimiter, Expect::Value);
                    self.token(TokenKind::Concat, start)
                }
                _ => self.fail(ParseError::Malformed {
                    message: format!("expected ',', '#' or closing delimiter, found '{}'", c),
                    offset: start,
                    line: self.line(start),
                }),
            },
        }
    }

    fn next_value(&mut self, delimiter: Delimiter, start: usize) -> Option<Result<Token, ParseError>> {
        match self.rest.chars().next() {
            Some('{') => match braced(self.rest) {
                Ok((rest, inner)) => {
                    self.rest = rest;
                    self.set_expect(delimiter, Expect::Separator);
                    self.token(TokenKind::BraceValue(inner.to_string()), start)
                }
                Err(_) => self.fail(ParseError::UnterminatedValue {
                    offset: start,
                    line: self.line(start),
                }),
            },
            Some('"') => match quoted(self.rest) {
                Ok((rest, inner)) => {
                    self.rest = rest;
                    self.set_expect(delimiter, Expect::Separator);
                    self.token(TokenKind::QuotedValue(inner.to_string()), start)
                }
                Err(nom::Err::Error(err)) if err.code == nom::error::ErrorKind::Verify => {
                    self.fail(ParseError::Malformed {
                        message: "unbalanced '}' inside quoted value".to_string(),
                        offset: start,
                        line: self.line(start),
                    })
                }
                Err(_) => self.fail(ParseError::UnterminatedValue {
                    offset: start,
                    line: self.line(start),
                }),
            },
            _ => match field_name(self.rest) {
                Ok((rest, word)) => {
                    self.rest = rest;
                    self.set_expect(delimiter, Expect::Separator);
                    if word.bytes().all(|b| b.is_ascii_digit()) {
                        self.token(TokenKind::NumberValue(word.to_string()), start)
                    } else {
                        self.token(TokenKind::MacroName(word.to_string()), start)
                    }
                }
                Err(_) => self.fail(ParseError::ExpectedValue {
                    offset: start,
                    line: self.line(start),
                }),
            },
        }
    }

    fn set_expect(&mut self, delimiter: Delimiter, expect: Expect) {
        self.mode = Mode::Entry { delimiter, expect };
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.mode {
            Mode::Top => self.next_top(),
            Mode::Entry { delimiter, expect } => self.next_in_entry(delimiter, expect),
        }
    }
}
