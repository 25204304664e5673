//! Limits applied when decoding untrusted canonical text.

/// Maximum list nesting depth accepted by the decoder.
pub const MAX_DEPTH: usize = 128;

/// Maximum canonical text length accepted by the decoder (16 MiB).
pub const MAX_INPUT_LEN: usize = 16 * 1024 * 1024;
