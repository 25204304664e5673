//! Structural decoder.
//!
//! Reads canonical text into a pre-shaped destination value. Atoms are
//! dispatched on the token kind; lists are dispatched on the destination's
//! kind. Decoding is not transactional: on error the destination keeps
//! whatever was written before the failure.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::codec::encode::{encode, EncodeOptions};
use crate::codec::lexer::{Lexer, TokenKind};
use crate::codec::primitives::{unquote, Writer};
use crate::error::{DecodeError, ModelError};
use crate::limits::{MAX_DEPTH, MAX_INPUT_LEN};
use crate::model::{Kind, Type, Value};

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Maximum list nesting depth.
    pub max_depth: usize,
    /// Maximum input length in bytes.
    pub max_input_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_input_len: MAX_INPUT_LEN,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decodes `input` into `dest`, which must already have the target shape.
pub fn decode_value(input: &str, dest: &mut Value) -> Result<(), DecodeError> {
    decode_value_with_options(input, dest, DecodeOptions::default())
}

/// Decodes `input` into `dest` with the given limits.
pub fn decode_value_with_options(
    input: &str,
    dest: &mut Value,
    options: DecodeOptions,
) -> Result<(), DecodeError> {
    if input.len() > options.max_input_len {
        return Err(DecodeError::InputTooLarge {
            len: input.len(),
            max: options.max_input_len,
        });
    }

    let mut decoder = Decoder::new(input, options)?;
    let result = decoder.read(dest).and_then(|()| decoder.finish());
    match &result {
        Ok(()) => debug!("decoded {} bytes into {}", input.len(), dest.type_name()),
        Err(e) => debug!("decoding into {} failed: {e}", dest.type_name()),
    }
    result
}

/// Decodes `input` into the value a pointer refers to.
///
/// The pointer must be non-nil; anything else is a contract violation
/// reported as [`DecodeError::NotSettable`].
pub fn decode_pointee(input: &str, ptr: &mut Value) -> Result<(), DecodeError> {
    match ptr {
        Value::Pointer {
            target: Some(target), ..
        } => decode_value(input, &mut **target),
        other => Err(DecodeError::NotSettable {
            ty: other.type_name(),
        }),
    }
}

struct Decoder<'a> {
    lexer: Lexer<'a>,
    options: DecodeOptions,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a str, options: DecodeOptions) -> Result<Self, DecodeError> {
        let mut lexer = Lexer::new(input);
        lexer.next()?;
        Ok(Self {
            lexer,
            options,
            depth: 0,
        })
    }

    fn read(&mut self, dest: &mut Value) -> Result<(), DecodeError> {
        let token = self.lexer.token();
        if token.is_nil() {
            *dest = dest.type_of().map_or(Value::Invalid, |ty| Value::zero(&ty));
            return self.lexer.next();
        }

        // Pointers are transparent: read through, allocating a nil pointee.
        if let Value::Pointer { elem, target } = dest {
            if matches!(token.kind, TokenKind::Int | TokenKind::String | TokenKind::LParen) {
                let target = target.get_or_insert_with(|| Box::new(Value::zero(elem)));
                return self.read(target);
            }
        }

        match token.kind {
            TokenKind::Int => {
                self.read_int(dest)?;
                self.lexer.next()
            }
            TokenKind::String => {
                if dest.kind() != Kind::String {
                    return Err(shape_mismatch(token.offset, "string", dest));
                }
                dest.set_string(unquote(token.text, token.offset)?)?;
                self.lexer.next()
            }
            TokenKind::LParen => {
                self.enter(token.offset)?;
                self.lexer.next()?;
                self.read_list(dest, token.offset)?;
                self.lexer.consume(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(())
            }
            TokenKind::Ident | TokenKind::RParen | TokenKind::Eof => Err(self.lexer.unexpected("a value")),
        }
    }

    fn read_int(&self, dest: &mut Value) -> Result<(), DecodeError> {
        let token = self.lexer.token();
        let invalid = |dest: &Value| DecodeError::InvalidInteger {
            offset: token.offset,
            text: token.text.to_string(),
            ty: dest.type_name(),
        };
        match dest.kind() {
            Kind::Int => {
                let v: i64 = token.text.parse().map_err(|_| invalid(dest))?;
                dest.set_int(v).map_err(|_| invalid(dest))
            }
            Kind::Uint => {
                let v: u64 = token.text.parse().map_err(|_| invalid(dest))?;
                dest.set_uint(v).map_err(|_| invalid(dest))
            }
            _ => Err(shape_mismatch(token.offset, "integer", dest)),
        }
    }

    fn read_list(&mut self, dest: &mut Value, offset: usize) -> Result<(), DecodeError> {
        trace!("read list into {} at offset {offset}", dest.type_name());
        match dest.kind() {
            Kind::Array => self.read_array(dest),
            Kind::Slice => self.read_slice(dest),
            Kind::Record => self.read_record(dest),
            Kind::Map => self.read_map(dest),
            Kind::Invalid
            | Kind::Bool
            | Kind::Int
            | Kind::Uint
            | Kind::Float
            | Kind::Complex
            | Kind::String
            | Kind::Pointer
            | Kind::Interface
            | Kind::Chan
            | Kind::Func => Err(shape_mismatch(offset, "list", dest)),
        }
    }

    fn read_array(&mut self, dest: &mut Value) -> Result<(), DecodeError> {
        let len = dest.len()?;
        let mut i = 0;
        while !self.end_of_list()? {
            if i >= len {
                return Err(DecodeError::ArrayOverflow {
                    offset: self.lexer.offset(),
                    len,
                });
            }
            self.read(dest.index_mut(i)?)?;
            i += 1;
        }
        Ok(())
    }

    fn read_slice(&mut self, dest: &mut Value) -> Result<(), DecodeError> {
        let elem = match dest.type_of() {
            Some(Type::Slice(elem)) => *elem,
            _ => return Err(ModelError::KindMismatch { op: "append", kind: dest.kind() }.into()),
        };
        *dest = Value::slice(elem.clone(), Vec::new())?;
        while !self.end_of_list()? {
            let mut item = Value::zero(&elem);
            self.read(&mut item)?;
            *dest = std::mem::take(dest).append(item)?;
        }
        Ok(())
    }

    fn read_record(&mut self, dest: &mut Value) -> Result<(), DecodeError> {
        while !self.end_of_list()? {
            self.lexer.consume(TokenKind::LParen)?;
            let token = self.lexer.token();
            if token.kind != TokenKind::Ident {
                return Err(self.lexer.unexpected("a field name"));
            }
            let field = match dest.field_by_name_mut(token.text) {
                Ok(field) => field,
                Err(ModelError::FieldNotFound { record, field }) => {
                    return Err(DecodeError::FieldNotFound {
                        offset: token.offset,
                        record,
                        field,
                    });
                }
                Err(e) => return Err(e.into()),
            };
            self.lexer.next()?;
            self.read(field)?;
            self.lexer.consume(TokenKind::RParen)?;
        }
        Ok(())
    }

    fn read_map(&mut self, dest: &mut Value) -> Result<(), DecodeError> {
        let ty = dest
            .type_of()
            .ok_or(ModelError::InvalidValue { op: "read_map" })?;
        let Type::Map(key_ty, elem_ty) = &ty else {
            return Err(ModelError::KindMismatch {
                op: "make_map",
                kind: ty.kind(),
            }
            .into());
        };
        dest.set_value(Value::make_map(&ty)?)?;
        // Keys are indexed by their canonical text, which equal keys share.
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        while !self.end_of_list()? {
            self.lexer.consume(TokenKind::LParen)?;
            let mut key = Value::zero(key_ty);
            self.read(&mut key)?;
            let mut value = Value::zero(elem_ty);
            self.read(&mut value)?;
            let mut text = Writer::new();
            match encode(&mut text, &key, EncodeOptions::canonical()) {
                Ok(()) => {
                    let text = text.into_string();
                    let entries = dest.map_entries_mut()?;
                    match index.get(&text) {
                        Some(&i) => entries[i].1 = value,
                        None => {
                            index.insert(text, entries.len());
                            entries.push((key, value));
                        }
                    }
                }
                Err(_) => dest.map_insert(key, value)?,
            }
            self.lexer.consume(TokenKind::RParen)?;
        }
        Ok(())
    }

    /// Reports whether the current token closes a list.
    fn end_of_list(&self) -> Result<bool, DecodeError> {
        match self.lexer.kind() {
            TokenKind::RParen => Ok(true),
            TokenKind::Eof => Err(DecodeError::UnterminatedList {
                offset: self.lexer.offset(),
            }),
            _ => Ok(false),
        }
    }

    fn enter(&mut self, offset: usize) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                offset,
                max: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), DecodeError> {
        match self.lexer.kind() {
            TokenKind::Eof => Ok(()),
            _ => Err(DecodeError::TrailingInput {
                offset: self.lexer.offset(),
            }),
        }
    }
}

fn shape_mismatch(offset: usize, found: &'static str, dest: &Value) -> DecodeError {
    DecodeError::ShapeMismatch {
        offset,
        found,
        ty: dest.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{IntWidth, RecordType};

    fn int() -> Type {
        Type::Int(IntWidth::Size)
    }

    fn person_type() -> Arc<RecordType> {
        Arc::new(RecordType::new("Person", [("name", Type::String), ("age", int())]))
    }

    #[test]
    fn test_decode_record() {
        let mut person = Value::zero(&Type::Record(person_type()));
        decode_value(r#"((name "a") (age 3))"#, &mut person).unwrap();
        assert_eq!(person.field_by_name("name").unwrap(), &Value::from("a"));
        assert_eq!(person.field_by_name("age").unwrap(), &Value::from(3isize));

        // Fields may come in any order and may be omitted.
        decode_value("((age 4))", &mut person).unwrap();
        assert_eq!(person.field(1).unwrap(), &Value::from(4isize));
        assert_eq!(person.field(0).unwrap(), &Value::from("a"));
    }

    #[test]
    fn test_decode_empty_list_into_slice() {
        let mut seq = Value::zero(&Type::slice(int()));
        decode_value("()", &mut seq).unwrap();
        assert!(!seq.is_nil().unwrap());
        assert_eq!(seq.len().unwrap(), 0);
    }

    #[test]
    fn test_decode_slice_replaces_contents() {
        let mut seq = Value::slice(int(), vec![Value::from(9isize)]).unwrap();
        decode_value("(1 -2 3)", &mut seq).unwrap();
        let expected = Value::slice(
            int(),
            vec![Value::from(1isize), Value::from(-2isize), Value::from(3isize)],
        )
        .unwrap();
        assert_eq!(seq, expected);
    }

    #[test]
    fn test_decode_nil_into_pointer() {
        let mut ptr = Value::pointer_to(Value::from(1isize)).unwrap();
        decode_value("nil", &mut ptr).unwrap();
        assert!(ptr.is_nil().unwrap());

        // Reading a value through a nil pointer allocates the pointee.
        decode_value("42", &mut ptr).unwrap();
        assert_eq!(ptr.elem().unwrap(), &Value::from(42isize));
    }

    #[test]
    fn test_decode_nil_gives_zero() {
        let mut v = Value::from(7u8);
        decode_value("nil", &mut v).unwrap();
        assert_eq!(v, Value::from(0u8));

        let mut person = Value::record(person_type(), vec![Value::from("x"), Value::from(1isize)]).unwrap();
        decode_value(" nil ", &mut person).unwrap();
        assert_eq!(person, Value::zero(&Type::Record(person_type())));
    }

    #[test]
    fn test_decode_map() {
        let ty = Type::map(Type::String, int());
        let mut map = Value::map(Type::String, int(), vec![(Value::from("old"), Value::from(0isize))]).unwrap();
        decode_value(r#"(("a" 1) ("b" 2))"#, &mut map).unwrap();
        let expected = Value::map(
            Type::String,
            int(),
            vec![(Value::from("b"), Value::from(2isize)), (Value::from("a"), Value::from(1isize))],
        )
        .unwrap();
        assert_eq!(map, expected);

        let mut nil = Value::zero(&ty);
        decode_value("()", &mut nil).unwrap();
        assert!(!nil.is_nil().unwrap());
    }

    #[test]
    fn test_decode_map_duplicate_keys_keep_last() {
        let mut map = Value::zero(&Type::map(Type::String, int()));
        decode_value(r#"(("a" 1) ("b" 2) ("a" 3))"#, &mut map).unwrap();
        assert_eq!(map.len().unwrap(), 2);
        assert_eq!(map.map_lookup(&Value::from("a")).unwrap(), Some(&Value::from(3isize)));

        // Record keys that differ only in field order are the same key.
        let key_ty = Type::Record(person_type());
        let mut map = Value::zero(&Type::map(key_ty, int()));
        decode_value(
            r#"((((name "x") (age 1)) 1) (((age 1) (name "x")) 2))"#,
            &mut map,
        )
        .unwrap();
        assert_eq!(map.len().unwrap(), 1);
        assert_eq!(map.map_entries().unwrap()[0].1, Value::from(2isize));
    }

    #[test]
    fn test_decode_large_map_is_linear() {
        let n = 100_000;
        let mut input = String::from("(");
        for i in 0..n {
            input.push_str(&format!("({i} {i}) "));
        }
        input.push(')');

        let ty = Type::map(Type::Int(IntWidth::W64), Type::Int(IntWidth::W64));
        let mut map = Value::zero(&ty);
        let start = std::time::Instant::now();
        decode_value(&input, &mut map).unwrap();
        let elapsed = start.elapsed();
        assert_eq!(map.len().unwrap(), n);
        assert_eq!(
            map.map_lookup(&Value::from(77_777i64)).unwrap(),
            Some(&Value::from(77_777i64))
        );
        assert!(elapsed.as_secs() < 10, "decoding {n} entries took {elapsed:?}");
    }

    #[test]
    fn test_decode_array_bounds() {
        let mut array = Value::zero(&Type::array(int(), 2));
        decode_value("(3 4)", &mut array).unwrap();
        assert_eq!(array.index(1).unwrap(), &Value::from(4isize));

        assert_eq!(
            decode_value("(3 4 5)", &mut array),
            Err(DecodeError::ArrayOverflow { offset: 5, len: 2 })
        );
        assert_eq!(array.len().unwrap(), 2);
    }

    #[test]
    fn test_decode_unterminated() {
        let mut seq = Value::zero(&Type::slice(int()));
        assert_eq!(
            decode_value("(1 2", &mut seq),
            Err(DecodeError::UnterminatedList { offset: 4 })
        );
        assert_eq!(
            decode_value("(", &mut seq),
            Err(DecodeError::UnterminatedList { offset: 1 })
        );
    }

    #[test]
    fn test_decode_syntax_errors() {
        let mut v = Value::from(0i64);
        assert!(matches!(
            decode_value("", &mut v),
            Err(DecodeError::UnexpectedToken { offset: 0, .. })
        ));
        assert!(matches!(
            decode_value(")", &mut v),
            Err(DecodeError::UnexpectedToken { expected: "a value", .. })
        ));
        assert!(matches!(
            decode_value("foo", &mut v),
            Err(DecodeError::UnexpectedToken { .. })
        ));
        assert_eq!(decode_value("1 2", &mut v), Err(DecodeError::TrailingInput { offset: 2 }));
    }

    #[test]
    fn test_decode_shape_errors() {
        let mut s = Value::from("x");
        assert_eq!(
            decode_value("(1)", &mut s),
            Err(DecodeError::ShapeMismatch {
                offset: 0,
                found: "list",
                ty: "string".to_string()
            })
        );
        assert!(matches!(
            decode_value("12", &mut s),
            Err(DecodeError::ShapeMismatch { found: "integer", .. })
        ));

        let mut n = Value::from(0i64);
        assert!(matches!(
            decode_value("\"12\"", &mut n),
            Err(DecodeError::ShapeMismatch { found: "string", .. })
        ));

        let mut person = Value::zero(&Type::Record(person_type()));
        assert_eq!(
            decode_value("((email \"x\"))", &mut person),
            Err(DecodeError::FieldNotFound {
                offset: 2,
                record: "Person".to_string(),
                field: "email".to_string()
            })
        );
        assert!(matches!(
            decode_value("((1 2))", &mut person),
            Err(DecodeError::UnexpectedToken { expected: "a field name", .. })
        ));
    }

    #[test]
    fn test_decode_integer_range() {
        let mut u = Value::from(0u8);
        decode_value("255", &mut u).unwrap();
        assert!(matches!(
            decode_value("256", &mut u),
            Err(DecodeError::InvalidInteger { .. })
        ));
        assert!(matches!(
            decode_value("-1", &mut u),
            Err(DecodeError::InvalidInteger { .. })
        ));
        let mut i = Value::from(0i64);
        assert!(matches!(
            decode_value("99999999999999999999", &mut i),
            Err(DecodeError::InvalidInteger { .. })
        ));
        decode_value("-9223372036854775808", &mut i).unwrap();
        assert_eq!(i, Value::from(i64::MIN));
    }

    #[test]
    fn test_decode_limits() {
        let mut nested = Value::zero(&Type::slice(Type::slice(Type::slice(int()))));
        let options = DecodeOptions {
            max_depth: 2,
            ..DecodeOptions::default()
        };
        assert_eq!(
            decode_value_with_options("(((1)))", &mut nested, options),
            Err(DecodeError::DepthExceeded { offset: 2, max: 2 })
        );
        decode_value("(((1)))", &mut nested).unwrap();

        let options = DecodeOptions {
            max_input_len: 3,
            ..DecodeOptions::default()
        };
        assert_eq!(
            decode_value_with_options("(1 2)", &mut nested, options),
            Err(DecodeError::InputTooLarge { len: 5, max: 3 })
        );
    }

    #[test]
    fn test_decode_pointee_requires_non_nil_pointer() {
        let mut ptr = Value::pointer_to(Value::from(0i64)).unwrap();
        decode_pointee("17", &mut ptr).unwrap();
        assert_eq!(ptr.elem().unwrap(), &Value::from(17i64));

        let mut nil = Value::nil_pointer(int());
        let err = decode_pointee("17", &mut nil).unwrap_err();
        assert!(err.is_contract_violation());

        let mut plain = Value::from(0i64);
        assert_eq!(
            decode_pointee("17", &mut plain),
            Err(DecodeError::NotSettable { ty: "int64".to_string() })
        );
    }
}
