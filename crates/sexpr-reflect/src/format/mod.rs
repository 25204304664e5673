//! Human-readable rendering: single atoms and path/value dumps.

pub mod atom;
pub mod display;

pub use atom::format_atom;
pub use display::{display, write_display};
