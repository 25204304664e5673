//! Canonical text encoding/decoding.
//!
//! The canonical form is a fully parenthesized S-expression: integers as
//! decimal digits, strings quoted, compound values as `( ... )` lists and
//! `nil` for absent values.

pub mod decode;
pub mod encode;
pub mod lexer;
pub mod primitives;

pub use decode::{decode_pointee, decode_value, decode_value_with_options, DecodeOptions};
pub use encode::{encode, encode_value, encode_value_with_options, EncodeOptions};
pub use lexer::{is_identifier, Lexer, Token, TokenKind};
pub use primitives::{quote, unquote, Writer};
