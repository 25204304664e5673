//! Error types for the value model, the canonical encoder and the decoder.

use thiserror::Error;

use crate::model::Kind;

/// Broad error classes for decoding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Malformed canonical text (tokens, delimiters, escapes)
    Syntax,
    /// E002: Well-formed text that does not fit the destination's shape
    Shape,
    /// E003: Input exceeding a configured limit
    Limit,
    /// E004: Caller contract violation (destination not settable)
    Contract,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Syntax => "E001",
            ErrorCode::Shape => "E002",
            ErrorCode::Limit => "E003",
            ErrorCode::Contract => "E004",
        }
    }
}

/// Error raised by a value-model operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("{op} is not defined on {kind} values")]
    KindMismatch { op: &'static str, kind: Kind },

    #[error("nil dereference of {ty}")]
    NilDereference { ty: String },

    #[error("index {index} out of range (length: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("record {record} has no field {field:?}")]
    FieldNotFound { record: String, field: String },

    #[error("record {record} has {expected} fields, got {found}")]
    FieldCount {
        record: String,
        expected: usize,
        found: usize,
    },

    #[error("type mismatch: cannot use {found} as {expected}")]
    TypeMismatch { expected: String, found: String },

    #[error("value {value} overflows {ty}")]
    Overflow { ty: String, value: String },

    #[error("assignment to entry in nil {ty}")]
    NilMapInsert { ty: String },

    #[error("{op} called on an invalid value")]
    InvalidValue { op: &'static str },
}

/// Error during canonical encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("unsupported type: {ty}")]
    UnsupportedType { ty: String },

    #[error("field {field:?} of {record} is not an identifier")]
    InvalidFieldName { record: String, field: String },

    #[error("field {field:?} appears more than once in {record}")]
    DuplicateFieldName { record: String, field: String },
}

/// Error during canonical decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Syntax ===
    #[error("[E001] invalid character {found:?} at offset {offset}")]
    InvalidCharacter { offset: usize, found: char },

    #[error("[E001] unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("[E001] invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("[E001] unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        offset: usize,
        found: String,
        expected: &'static str,
    },

    #[error("[E001] unterminated list: end of input at offset {offset}")]
    UnterminatedList { offset: usize },

    #[error("[E001] trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    // === E002: Shape ===
    #[error("[E002] invalid integer {text:?} for {ty} at offset {offset}")]
    InvalidInteger {
        offset: usize,
        text: String,
        ty: String,
    },

    #[error("[E002] record {record} has no field {field:?} (offset {offset})")]
    FieldNotFound {
        offset: usize,
        record: String,
        field: String,
    },

    #[error("[E002] cannot decode {found} into {ty} at offset {offset}")]
    ShapeMismatch {
        offset: usize,
        found: &'static str,
        ty: String,
    },

    #[error("[E002] too many elements for array of length {len} at offset {offset}")]
    ArrayOverflow { offset: usize, len: usize },

    #[error("[E002] {0}")]
    Model(#[from] ModelError),

    // === E003: Limits ===
    #[error("[E003] input length {len} exceeds maximum {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("[E003] nesting depth exceeds maximum {max} at offset {offset}")]
    DepthExceeded { offset: usize, max: usize },

    // === E004: Contract ===
    #[error("[E004] destination {ty} is not settable (expected a non-nil pointer)")]
    NotSettable { ty: String },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::InvalidCharacter { .. }
            | DecodeError::UnterminatedString { .. }
            | DecodeError::InvalidEscape { .. }
            | DecodeError::UnexpectedToken { .. }
            | DecodeError::UnterminatedList { .. }
            | DecodeError::TrailingInput { .. } => ErrorCode::Syntax,
            DecodeError::InvalidInteger { .. }
            | DecodeError::FieldNotFound { .. }
            | DecodeError::ShapeMismatch { .. }
            | DecodeError::ArrayOverflow { .. }
            | DecodeError::Model(_) => ErrorCode::Shape,
            DecodeError::InputTooLarge { .. } | DecodeError::DepthExceeded { .. } => ErrorCode::Limit,
            DecodeError::NotSettable { .. } => ErrorCode::Contract,
        }
    }

    /// Returns true if the caller, not the input text, is at fault.
    pub fn is_contract_violation(&self) -> bool {
        self.code() == ErrorCode::Contract
    }
}
