//! Path/value dump of a value tree.
//!
//! Emits one `path = atom` line per leaf, depth first. Sequence elements
//! extend the path with `[i]`, map entries with `[key]`, record fields with
//! `.name`, and pointers wrap it as `(*path)`. A non-nil interface emits a
//! `path.type = T` line before its held value at `path.value`.

use std::fmt::{self, Write};

use crate::format::atom::format_atom;
use crate::model::Value;

/// Returns the dump of `value` rooted at `path`, one line per leaf.
pub fn display(path: &str, value: &Value) -> String {
    let mut out = String::new();
    let _ = write_display(&mut out, path, value);
    out
}

/// Writes the dump of `value` rooted at `path` into `out`.
pub fn write_display<W: Write + ?Sized>(out: &mut W, path: &str, value: &Value) -> fmt::Result {
    match value {
        Value::Array { items, .. } | Value::Slice { items: Some(items), .. } => {
            for (i, item) in items.iter().enumerate() {
                write_display(out, &format!("{path}[{i}]"), item)?;
            }
        }
        Value::Slice { items: None, .. } => {}
        Value::Map { entries, .. } => {
            for (key, item) in entries.iter().flatten() {
                write_display(out, &format!("{path}[{}]", format_atom(key)), item)?;
            }
        }
        Value::Record { ty, fields } => {
            for (field, item) in ty.fields().iter().zip(fields) {
                write_display(out, &format!("{path}.{}", field.name), item)?;
            }
        }
        Value::Pointer { target, .. } => match target {
            Some(target) => write_display(out, &format!("(*{path})"), target)?,
            None => writeln!(out, "{path} = nil")?,
        },
        Value::Interface { held, .. } => match held {
            Some(held) => {
                writeln!(out, "{path}.type = {}", held.type_name())?;
                write_display(out, &format!("{path}.value"), held)?;
            }
            None => writeln!(out, "{path} = nil")?,
        },
        Value::Invalid
        | Value::Bool(_)
        | Value::Int { .. }
        | Value::Uint { .. }
        | Value::Float { .. }
        | Value::Complex { .. }
        | Value::String(_)
        | Value::Chan { .. }
        | Value::Func { .. } => writeln!(out, "{path} = {}", format_atom(value))?,
    }
    Ok(())
}
