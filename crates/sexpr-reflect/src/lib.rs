//! Runtime value introspection with a path dump and a canonical S-expression codec.
//!
//! This crate models values whose shape is only known at runtime and
//! provides three traversals over them: a human-readable path/value dump,
//! a canonical parenthesized encoding, and a decoder that reads that
//! encoding back into a destination of matching shape.
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sexpr_reflect::{display, marshal, unmarshal, Reflect};
//!
//! let mut scores = BTreeMap::new();
//! scores.insert("alice".to_string(), vec![3i64, 5]);
//! scores.insert("bob".to_string(), Vec::new());
//!
//! let text = marshal(&scores).unwrap();
//! assert_eq!(text, r#"(("alice" (3 5)) ("bob" ()))"#);
//!
//! let back: BTreeMap<String, Vec<i64>> = unmarshal(&text).unwrap();
//! assert_eq!(back, scores);
//!
//! let dump = display("scores", &scores.to_value());
//! assert_eq!(dump, "scores[\"alice\"][0] = 3\nscores[\"alice\"][1] = 5\n");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Kinds, type descriptors, dynamic values and the [`Reflect`] bridge
//! - [`format`]: Atom formatting and the path/value dump
//! - [`codec`]: Canonical text encoder, lexer and decoder
//! - [`error`]: Error types
//! - [`limits`]: Limits applied while decoding
//!
//! # Wire Format
//!
//! - Integers are decimal digits with an optional leading `-`
//! - Strings are double-quoted with backslash escapes
//! - Arrays and slices are `(a b c)`, maps `((k v) ...)`, records `((name v) ...)`
//! - Pointers are transparent; nil pointers, slices and maps are `nil`
//!
//! Booleans, floats, complex numbers, interfaces, channels and functions
//! have no wire form and fail to encode.
//!
//! # Security
//!
//! The decoder is designed to handle untrusted input without panicking:
//! input length and nesting depth are bounded by [`DecodeOptions`], and
//! every failure is reported as a [`DecodeError`] carrying a byte offset.

pub mod codec;
pub mod error;
pub mod format;
pub mod limits;
pub mod model;

pub use codec::{
    decode_pointee, decode_value, decode_value_with_options, encode_value, encode_value_with_options,
    DecodeOptions, EncodeOptions,
};
pub use error::{DecodeError, EncodeError, ErrorCode, ModelError};
pub use format::{display, format_atom, write_display};
pub use model::{Field, FloatWidth, IntWidth, Kind, RecordType, Reflect, Type, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encodes a native value to canonical text.
pub fn marshal<T: Reflect>(value: &T) -> Result<String, EncodeError> {
    encode_value(&value.to_value())
}

/// Decodes canonical text into a fresh native value.
///
/// Decoding starts from the zero value of `T`, so record fields absent
/// from the input keep their zero values.
pub fn unmarshal<T: Reflect>(input: &str) -> Result<T, DecodeError> {
    let mut value = Value::zero(&T::reflect_type());
    decode_value(input, &mut value)?;
    Ok(T::from_value(&value)?)
}

/// Decodes canonical text over an existing native value.
///
/// Fields absent from the input keep their current values. On error `out`
/// is left unchanged.
pub fn unmarshal_into<T: Reflect>(input: &str, out: &mut T) -> Result<(), DecodeError> {
    let mut value = out.to_value();
    decode_value(input, &mut value)?;
    *out = T::from_value(&value)?;
    Ok(())
}
