//! Tokenizer for canonical text.
//!
//! Produces one token of lookahead at a time: call [`Lexer::next`] to
//! advance and inspect the current token through [`Lexer::token`].

use crate::error::DecodeError;

/// Token classes of the canonical text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Optional `-` followed by a maximal run of ASCII digits.
    Int,
    /// Double-quoted, backslash-escaped literal (still quoted in `text`).
    String,
    /// Bare word: field names and the literal `nil`.
    Ident,
    LParen,
    RParen,
    Eof,
}

impl TokenKind {
    fn describe(self) -> &'static str {
        match self {
            TokenKind::Int => "an integer",
            TokenKind::String => "a string",
            TokenKind::Ident => "an identifier",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token with its raw text and byte offset in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    /// Returns true for the `nil` literal.
    pub fn is_nil(&self) -> bool {
        self.kind == TokenKind::Ident && self.text == "nil"
    }

    /// Returns a human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => TokenKind::Eof.describe().to_string(),
            _ => format!("{:?}", self.text),
        }
    }
}

/// Cursor over canonical text.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    token: Token<'a>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned before the first token.
    ///
    /// The current token reads as end-of-input until [`Lexer::next`] is called.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            token: Token {
                kind: TokenKind::Eof,
                text: "",
                offset: 0,
            },
        }
    }

    /// Returns the current token.
    pub fn token(&self) -> Token<'a> {
        self.token
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// Returns the raw text of the current token.
    pub fn text(&self) -> &'a str {
        self.token.text
    }

    /// Returns the byte offset of the current token.
    pub fn offset(&self) -> usize {
        self.token.offset
    }

    /// Advances to the next token.
    pub fn next(&mut self) -> Result<(), DecodeError> {
        self.token = self.scan()?;
        Ok(())
    }

    /// Requires the current token to be `want` and advances past it.
    pub fn consume(&mut self, want: TokenKind) -> Result<(), DecodeError> {
        if self.token.kind == want {
            return self.next();
        }
        if self.token.kind == TokenKind::Eof && want == TokenKind::RParen {
            return Err(DecodeError::UnterminatedList {
                offset: self.token.offset,
            });
        }
        Err(self.unexpected(want.describe()))
    }

    /// Builds an error for the current token.
    pub fn unexpected(&self, expected: &'static str) -> DecodeError {
        DecodeError::UnexpectedToken {
            offset: self.token.offset,
            found: self.token.describe(),
            expected,
        }
    }

    fn scan(&mut self) -> Result<Token<'a>, DecodeError> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        let start = self.pos;
        let Some(ch) = self.input[start..].chars().next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                offset: start,
            });
        };

        let kind = match ch {
            '(' => {
                self.pos += 1;
                TokenKind::LParen
            }
            ')' => {
                self.pos += 1;
                TokenKind::RParen
            }
            '"' => {
                self.scan_string(start)?;
                TokenKind::String
            }
            '-' | '0'..='9' => {
                self.scan_int(start)?;
                TokenKind::Int
            }
            c if is_ident_start(c) => {
                self.scan_ident();
                TokenKind::Ident
            }
            other => {
                return Err(DecodeError::InvalidCharacter {
                    offset: start,
                    found: other,
                });
            }
        };

        Ok(Token {
            kind,
            text: &self.input[start..self.pos],
            offset: start,
        })
    }

    fn scan_string(&mut self, start: usize) -> Result<(), DecodeError> {
        let bytes = self.input.as_bytes();
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    self.pos = i + 1;
                    return Ok(());
                }
                b'\\' => i += 2,
                b'\n' => break,
                _ => i += 1,
            }
        }
        Err(DecodeError::UnterminatedString { offset: start })
    }

    fn scan_int(&mut self, start: usize) -> Result<(), DecodeError> {
        let bytes = self.input.as_bytes();
        let mut i = start;
        if bytes[i] == b'-' {
            i += 1;
        }
        let digits = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits {
            return Err(DecodeError::InvalidCharacter {
                offset: start,
                found: '-',
            });
        }
        self.pos = i;
        Ok(())
    }

    fn scan_ident(&mut self) {
        let rest = &self.input[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Returns true if `s` lexes as a single identifier token.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => is_ident_start(first) && chars.all(is_ident_continue),
        None => false,
    }
}
