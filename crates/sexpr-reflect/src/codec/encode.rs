//! Canonical encoder.
//!
//! Values are written as fully parenthesized text: integers as decimal
//! digits, strings quoted, sequences as `(a b c)`, maps as `((k v) ...)` and
//! records as `((name v) ...)`. Pointers are transparent and nil pointers,
//! slices and maps are written as `nil`.

use log::{debug, trace};

use crate::codec::lexer::is_identifier;
use crate::codec::primitives::Writer;
use crate::error::EncodeError;
use crate::model::Value;

/// Options for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Enable canonical encoding mode.
    ///
    /// When enabled, map entries are written sorted by the encoded text of
    /// their keys, so equal maps always encode to the same bytes.
    pub canonical: bool,
}

impl EncodeOptions {
    /// Creates default (non-canonical) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates canonical encoding options.
    pub fn canonical() -> Self {
        Self { canonical: true }
    }
}

/// Encodes a value to canonical text.
pub fn encode_value(value: &Value) -> Result<String, EncodeError> {
    encode_value_with_options(value, EncodeOptions::default())
}

/// Encodes a value to canonical text with the given options.
///
/// On error nothing is returned; partial output is discarded.
pub fn encode_value_with_options(value: &Value, options: EncodeOptions) -> Result<String, EncodeError> {
    let mut writer = Writer::with_capacity(64);
    match encode(&mut writer, value, options) {
        Ok(()) => {
            debug!("encoded {} into {} bytes", value.type_name(), writer.len());
            Ok(writer.into_string())
        }
        Err(e) => {
            debug!("encoding {} failed: {e}", value.type_name());
            Err(e)
        }
    }
}

/// Appends the canonical text of `value` to `writer`.
pub fn encode(writer: &mut Writer, value: &Value, options: EncodeOptions) -> Result<(), EncodeError> {
    match value {
        Value::Invalid => writer.write_str("nil"),
        Value::Int { value, .. } => writer.write_int(*value),
        Value::Uint { value, .. } => writer.write_uint(*value),
        Value::String(s) => writer.write_quoted(s),
        Value::Pointer { target, .. } => match target {
            Some(target) => encode(writer, target, options)?,
            None => writer.write_str("nil"),
        },
        Value::Array { items, .. } => encode_list(writer, items, options)?,
        Value::Slice { items, .. } => match items {
            Some(items) => encode_list(writer, items, options)?,
            None => writer.write_str("nil"),
        },
        Value::Map { entries, .. } => match entries {
            Some(entries) => {
                trace!("encode map: {} entries", entries.len());
                encode_map(writer, entries, options)?
            }
            None => writer.write_str("nil"),
        },
        Value::Record { ty, fields } => {
            trace!("encode record {}", ty.name());
            writer.write_char('(');
            for (i, (field, value)) in ty.fields().iter().zip(fields).enumerate() {
                if !is_identifier(&field.name) {
                    return Err(EncodeError::InvalidFieldName {
                        record: ty.name().to_string(),
                        field: field.name.clone(),
                    });
                }
                if ty.field_index(&field.name) != Some(i) {
                    return Err(EncodeError::DuplicateFieldName {
                        record: ty.name().to_string(),
                        field: field.name.clone(),
                    });
                }
                if i > 0 {
                    writer.write_char(' ');
                }
                writer.write_char('(');
                writer.write_str(&field.name);
                writer.write_char(' ');
                encode(writer, value, options)?;
                writer.write_char(')');
            }
            writer.write_char(')');
        }
        Value::Bool(_)
        | Value::Float { .. }
        | Value::Complex { .. }
        | Value::Interface { .. }
        | Value::Chan { .. }
        | Value::Func { .. } => {
            return Err(EncodeError::UnsupportedType {
                ty: value.type_name(),
            });
        }
    }
    Ok(())
}

fn encode_list(writer: &mut Writer, items: &[Value], options: EncodeOptions) -> Result<(), EncodeError> {
    trace!("encode list: {} items", items.len());
    writer.write_char('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            writer.write_char(' ');
        }
        encode(writer, item, options)?;
    }
    writer.write_char(')');
    Ok(())
}

fn encode_map(
    writer: &mut Writer,
    entries: &[(Value, Value)],
    options: EncodeOptions,
) -> Result<(), EncodeError> {
    writer.write_char('(');
    if options.canonical {
        let mut keyed = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            let mut key = Writer::new();
            encode(&mut key, k, options)?;
            keyed.push((key.into_string(), v));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        for (i, (key, value)) in keyed.iter().enumerate() {
            if i > 0 {
                writer.write_char(' ');
            }
            writer.write_char('(');
            writer.write_str(key);
            writer.write_char(' ');
            encode(writer, value, options)?;
            writer.write_char(')');
        }
    } else {
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                writer.write_char(' ');
            }
            writer.write_char('(');
            encode(writer, key, options)?;
            writer.write_char(' ');
            encode(writer, value, options)?;
            writer.write_char(')');
        }
    }
    writer.write_char(')');
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{FloatWidth, IntWidth, RecordType, Type};

    fn int() -> Type {
        Type::Int(IntWidth::Size)
    }

    #[test]
    fn test_encode_record() {
        let ty = Arc::new(RecordType::new("Person", [("name", Type::String), ("age", int())]));
        let person = Value::record(ty, vec![Value::from("a"), Value::from(3isize)]).unwrap();
        assert_eq!(encode_value(&person).unwrap(), r#"((name "a") (age 3))"#);
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_value(&Value::from(-7i32)).unwrap(), "-7");
        assert_eq!(encode_value(&Value::from(u64::MAX)).unwrap(), "18446744073709551615");
        assert_eq!(encode_value(&Value::from("say \"hi\"")).unwrap(), r#""say \"hi\"""#);
        assert_eq!(encode_value(&Value::Invalid).unwrap(), "nil");
    }

    #[test]
    fn test_encode_sequences() {
        let empty = Value::slice(int(), Vec::new()).unwrap();
        assert_eq!(encode_value(&empty).unwrap(), "()");
        assert_eq!(encode_value(&Value::zero(&Type::slice(int()))).unwrap(), "nil");

        let array = Value::array(Type::String, vec![Value::from("x"), Value::from("y")]).unwrap();
        assert_eq!(encode_value(&array).unwrap(), r#"("x" "y")"#);

        let nested = Value::slice(
            Type::slice(int()),
            vec![
                Value::slice(int(), vec![Value::from(1isize)]).unwrap(),
                Value::zero(&Type::slice(int())),
            ],
        )
        .unwrap();
        assert_eq!(encode_value(&nested).unwrap(), "((1) nil)");
    }

    #[test]
    fn test_encode_pointers_are_transparent() {
        let ptr = Value::pointer_to(Value::from(5i64)).unwrap();
        assert_eq!(encode_value(&ptr).unwrap(), "5");
        let ptr_ptr = Value::pointer_to(ptr).unwrap();
        assert_eq!(encode_value(&ptr_ptr).unwrap(), "5");
        assert_eq!(encode_value(&Value::nil_pointer(int())).unwrap(), "nil");
    }

    #[test]
    fn test_encode_map_canonical_order() {
        let a = Value::map(
            Type::String,
            int(),
            vec![(Value::from("b"), Value::from(2isize)), (Value::from("a"), Value::from(1isize))],
        )
        .unwrap();
        assert_eq!(encode_value(&a).unwrap(), r#"(("b" 2) ("a" 1))"#);
        assert_eq!(
            encode_value_with_options(&a, EncodeOptions::canonical()).unwrap(),
            r#"(("a" 1) ("b" 2))"#
        );
        assert_eq!(encode_value(&Value::zero(&Type::map(Type::String, int()))).unwrap(), "nil");
        assert_eq!(encode_value(&Value::make_map(&Type::map(Type::String, int())).unwrap()).unwrap(), "()");
    }

    #[test]
    fn test_encode_unsupported() {
        let cases = [
            (Value::from(true), "bool"),
            (Value::from(1.5f64), "float64"),
            (Value::complex(FloatWidth::F64, 1.0, 2.0), "complex128"),
            (Value::interface("interface {}", Value::from(1i64)), "interface {}"),
            (Value::chan(int(), 1), "chan int"),
            (Value::func("func()", 1), "func()"),
        ];
        for (value, ty) in cases {
            assert_eq!(
                encode_value(&value),
                Err(EncodeError::UnsupportedType { ty: ty.to_string() })
            );
        }

        // Nested failures surface from deep inside.
        let nested = Value::slice(Type::Bool, vec![Value::from(false)]).unwrap();
        assert!(matches!(encode_value(&nested), Err(EncodeError::UnsupportedType { .. })));
    }

    #[test]
    fn test_encode_rejects_bad_field_name() {
        let ty = Arc::new(RecordType::new("Odd", [("has space", int())]));
        let odd = Value::zero(&Type::Record(ty));
        assert_eq!(
            encode_value(&odd),
            Err(EncodeError::InvalidFieldName {
                record: "Odd".to_string(),
                field: "has space".to_string()
            })
        );
    }

    #[test]
    fn test_encode_rejects_duplicate_field_name() {
        let ty = Arc::new(RecordType::new("D", [("a", int()), ("a", int())]));
        let d = Value::record(ty, vec![Value::from(1isize), Value::from(2isize)]).unwrap();
        assert_eq!(
            encode_value(&d),
            Err(EncodeError::DuplicateFieldName {
                record: "D".to_string(),
                field: "a".to_string()
            })
        );
    }
}
