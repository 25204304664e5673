//! Primitive text encoding/decoding for the canonical format.
//!
//! Implements the output buffer and the string quoting rules shared by the
//! encoder, the decoder and the atom formatter.

use std::str::CharIndices;

use crate::error::DecodeError;

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for canonical text.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: String,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Returns the written text.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Returns a reference to the written text.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn write_char(&mut self, c: char) {
        self.buf.push(c);
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Writes a signed decimal integer.
    pub fn write_int(&mut self, value: i64) {
        self.buf.push_str(&value.to_string());
    }

    /// Writes an unsigned decimal integer.
    pub fn write_uint(&mut self, value: u64) {
        self.buf.push_str(&value.to_string());
    }

    /// Writes `s` as a double-quoted, escaped string literal.
    pub fn write_quoted(&mut self, s: &str) {
        push_quoted(&mut self.buf, s);
    }
}

/// Returns `s` as a double-quoted string literal.
///
/// Quotes, backslashes and control characters are escaped; every other
/// character, including non-ASCII, is written as is.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    push_quoted(&mut out, s);
    out
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let code = c as u32;
                if code < 0x80 {
                    out.push_str(&format!("\\x{code:02x}"));
                } else {
                    out.push_str(&format!("\\u{code:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a string literal token (including its quotes).
///
/// `offset` is the token's position in the input and is used for error
/// reporting only.
pub fn unquote(token: &str, offset: usize) -> Result<String, DecodeError> {
    let inner = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or(DecodeError::UnterminatedString { offset })?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        // +1 for the opening quote
        let at = offset + 1 + i;
        let Some((_, esc)) = chars.next() else {
            return Err(DecodeError::InvalidEscape { offset: at });
        };
        let decoded = match esc {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'v' => '\u{b}',
            'f' => '\u{c}',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'x' => read_hex_escape(&mut chars, 2, at)?,
            'u' => read_hex_escape(&mut chars, 4, at)?,
            'U' => read_hex_escape(&mut chars, 8, at)?,
            _ => return Err(DecodeError::InvalidEscape { offset: at }),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn read_hex_escape(chars: &mut CharIndices<'_>, digits: usize, at: usize) -> Result<char, DecodeError> {
    let mut code = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|(_, c)| c.to_digit(16))
            .ok_or(DecodeError::InvalidEscape { offset: at })?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or(DecodeError::InvalidEscape { offset: at })
}
