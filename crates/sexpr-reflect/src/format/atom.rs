//! Single-token rendering of leaf values.

use crate::codec::primitives::quote;
use crate::model::Value;

/// Renders `value` as one textual token. Never fails.
///
/// Reference kinds (pointers, slices, maps, channels, functions) render as
/// their type followed by an opaque hex identity, which is only meaningful
/// within one process run. Arrays, records and interfaces render as
/// `"<type> value"`.
pub fn format_atom(value: &Value) -> String {
    match value {
        Value::Invalid => "<invalid>".to_string(),
        Value::Int { value, .. } => value.to_string(),
        Value::Uint { value, .. } => value.to_string(),
        Value::Float { value, .. } => format!("{value:.6}"),
        Value::Complex { .. } => format!("<unsupported {}>", value.type_name()),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => quote(s),
        Value::Pointer { .. }
        | Value::Slice { .. }
        | Value::Map { .. }
        | Value::Chan { .. }
        | Value::Func { .. } => format!("{} 0x{:x}", value.type_name(), identity(value)),
        Value::Array { .. } | Value::Record { .. } | Value::Interface { .. } => {
            format!("{} value", value.type_name())
        }
    }
}

/// Address or handle identifying the storage behind a reference value; 0 when nil.
fn identity(value: &Value) -> usize {
    match value {
        Value::Pointer { target, .. } => target
            .as_deref()
            .map_or(0, |t| t as *const Value as usize),
        Value::Slice { items, .. } => items.as_ref().map_or(0, |v| v.as_ptr() as usize),
        Value::Map { entries, .. } => entries.as_ref().map_or(0, |e| e.as_ptr() as usize),
        Value::Chan { handle, .. } | Value::Func { handle, .. } => *handle,
        _ => 0,
    }
}
