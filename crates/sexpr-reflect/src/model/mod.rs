//! Value model for runtime introspection.
//!
//! This module contains the types every traversal is built on:
//! - Kinds and structural type descriptors
//! - Dynamic values with inspection and mutation operations
//! - The [`Reflect`] bridge from native Rust types

pub mod reflect;
pub mod types;
pub mod value;

pub use reflect::Reflect;
pub use types::{Field, FloatWidth, IntWidth, Kind, RecordType, Type};
pub use value::Value;
