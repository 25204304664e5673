//! Dynamic values and the introspection operations over them.
//!
//! A [`Value`] is an owned, tree-shaped, self-describing value. Read-only
//! inspection goes through `&Value`; a `&mut Value` is a settable handle.

use std::sync::Arc;

use crate::error::ModelError;
use crate::model::types::{FloatWidth, IntWidth, Kind, RecordType, Type};

/// A runtime value of statically unknown shape.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absence of any value.
    #[default]
    Invalid,

    Bool(bool),

    Int { width: IntWidth, value: i64 },

    Uint { width: IntWidth, value: u64 },

    /// Stored as f64; `F32` values are rounded on assignment.
    Float { width: FloatWidth, value: f64 },

    Complex { width: FloatWidth, re: f64, im: f64 },

    String(String),

    /// `target` is `None` for a nil pointer.
    Pointer {
        elem: Type,
        target: Option<Box<Value>>,
    },

    /// Fixed-length sequence; `items.len()` is the array length.
    Array { elem: Type, items: Vec<Value> },

    /// `items` is `None` for a nil slice.
    Slice {
        elem: Type,
        items: Option<Vec<Value>>,
    },

    /// `entries` is `None` for a nil map. Keys are unique.
    Map {
        key: Type,
        elem: Type,
        entries: Option<Vec<(Value, Value)>>,
    },

    /// Field values in declaration order.
    Record {
        ty: Arc<RecordType>,
        fields: Vec<Value>,
    },

    /// Interface value; `held` is never itself an interface.
    Interface {
        name: String,
        held: Option<Box<Value>>,
    },

    /// Channel endpoint identified by an opaque handle (0 is nil).
    Chan { elem: Type, handle: usize },

    /// Function identified by an opaque handle (0 is nil).
    Func { signature: String, handle: usize },
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

impl Value {
    /// Returns the zero value of `ty`.
    ///
    /// Numbers are zero, strings empty, pointers/slices/maps/interfaces nil,
    /// arrays and records hold zero values for every element or field.
    pub fn zero(ty: &Type) -> Value {
        match ty {
            Type::Bool => Value::Bool(false),
            Type::Int(width) => Value::Int { width: *width, value: 0 },
            Type::Uint(width) => Value::Uint { width: *width, value: 0 },
            Type::Float(width) => Value::Float { width: *width, value: 0.0 },
            Type::Complex(width) => Value::Complex { width: *width, re: 0.0, im: 0.0 },
            Type::String => Value::String(String::new()),
            Type::Pointer(elem) => Value::Pointer {
                elem: (**elem).clone(),
                target: None,
            },
            Type::Array(elem, len) => Value::Array {
                elem: (**elem).clone(),
                items: (0..*len).map(|_| Value::zero(elem)).collect(),
            },
            Type::Slice(elem) => Value::Slice {
                elem: (**elem).clone(),
                items: None,
            },
            Type::Map(key, elem) => Value::Map {
                key: (**key).clone(),
                elem: (**elem).clone(),
                entries: None,
            },
            Type::Record(record) => Value::Record {
                ty: Arc::clone(record),
                fields: record.fields().iter().map(|f| Value::zero(&f.ty)).collect(),
            },
            Type::Interface(name) => Value::Interface {
                name: name.clone(),
                held: None,
            },
            Type::Chan(elem) => Value::Chan {
                elem: (**elem).clone(),
                handle: 0,
            },
            Type::Func(signature) => Value::Func {
                signature: signature.clone(),
                handle: 0,
            },
        }
    }

    /// Returns an empty, non-nil map of type `ty`.
    pub fn make_map(ty: &Type) -> Result<Value, ModelError> {
        match ty {
            Type::Map(key, elem) => Ok(Value::Map {
                key: (**key).clone(),
                elem: (**elem).clone(),
                entries: Some(Vec::new()),
            }),
            other => Err(ModelError::KindMismatch {
                op: "make_map",
                kind: other.kind(),
            }),
        }
    }

    /// Returns a non-nil pointer owning `target`.
    pub fn pointer_to(target: Value) -> Result<Value, ModelError> {
        let elem = target
            .type_of()
            .ok_or(ModelError::InvalidValue { op: "pointer_to" })?;
        Ok(Value::Pointer {
            elem,
            target: Some(Box::new(target)),
        })
    }

    /// Returns a nil pointer to `elem`.
    pub fn nil_pointer(elem: Type) -> Value {
        Value::Pointer { elem, target: None }
    }

    /// Returns an array holding `items`, each of which must be assignable to `elem`.
    pub fn array(elem: Type, items: Vec<Value>) -> Result<Value, ModelError> {
        let items = coerce_all(items, &elem)?;
        Ok(Value::Array { elem, items })
    }

    /// Returns a non-nil slice holding `items`, each of which must be assignable to `elem`.
    pub fn slice(elem: Type, items: Vec<Value>) -> Result<Value, ModelError> {
        let items = coerce_all(items, &elem)?;
        Ok(Value::Slice {
            elem,
            items: Some(items),
        })
    }

    /// Returns a non-nil map holding `entries`. Later duplicates replace earlier ones.
    pub fn map(key: Type, elem: Type, entries: Vec<(Value, Value)>) -> Result<Value, ModelError> {
        let mut map = Value::Map {
            key,
            elem,
            entries: Some(Vec::with_capacity(entries.len())),
        };
        for (k, v) in entries {
            map.map_insert(k, v)?;
        }
        Ok(map)
    }

    /// Returns a record holding `fields` in declaration order.
    pub fn record(ty: Arc<RecordType>, fields: Vec<Value>) -> Result<Value, ModelError> {
        if fields.len() != ty.field_count() {
            return Err(ModelError::FieldCount {
                record: ty.name().to_string(),
                expected: ty.field_count(),
                found: fields.len(),
            });
        }
        let fields = ty
            .fields()
            .iter()
            .zip(fields)
            .map(|(field, value)| coerce(value, &field.ty))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Record { ty, fields })
    }

    /// Boxes `held` into an interface named `name`. `Value::Invalid` gives a nil interface.
    pub fn interface(name: impl Into<String>, held: Value) -> Value {
        let held = match held {
            Value::Invalid => None,
            Value::Interface { held, .. } => held,
            other => Some(Box::new(other)),
        };
        Value::Interface {
            name: name.into(),
            held,
        }
    }

    pub fn complex(width: FloatWidth, re: f64, im: f64) -> Value {
        Value::Complex { width, re, im }
    }

    pub fn chan(elem: Type, handle: usize) -> Value {
        Value::Chan { elem, handle }
    }

    pub fn func(signature: impl Into<String>, handle: usize) -> Value {
        Value::Func {
            signature: signature.into(),
            handle,
        }
    }

    /// Returns a new slice with `item` appended.
    ///
    /// The receiver is consumed: growth may relocate storage, so callers must
    /// store the returned value back wherever the slice lives.
    pub fn append(self, item: Value) -> Result<Value, ModelError> {
        match self {
            Value::Slice { elem, items } => {
                let item = coerce(item, &elem)?;
                let mut items = items.unwrap_or_default();
                items.push(item);
                Ok(Value::Slice {
                    elem,
                    items: Some(items),
                })
            }
            other => Err(ModelError::KindMismatch {
                op: "append",
                kind: other.kind(),
            }),
        }
    }
}

// =============================================================================
// INSPECTION
// =============================================================================

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Invalid => Kind::Invalid,
            Value::Bool(_) => Kind::Bool,
            Value::Int { .. } => Kind::Int,
            Value::Uint { .. } => Kind::Uint,
            Value::Float { .. } => Kind::Float,
            Value::Complex { .. } => Kind::Complex,
            Value::String(_) => Kind::String,
            Value::Pointer { .. } => Kind::Pointer,
            Value::Array { .. } => Kind::Array,
            Value::Slice { .. } => Kind::Slice,
            Value::Map { .. } => Kind::Map,
            Value::Record { .. } => Kind::Record,
            Value::Interface { .. } => Kind::Interface,
            Value::Chan { .. } => Kind::Chan,
            Value::Func { .. } => Kind::Func,
        }
    }

    /// Returns the type of this value, or `None` for `Value::Invalid`.
    pub fn type_of(&self) -> Option<Type> {
        let ty = match self {
            Value::Invalid => return None,
            Value::Bool(_) => Type::Bool,
            Value::Int { width, .. } => Type::Int(*width),
            Value::Uint { width, .. } => Type::Uint(*width),
            Value::Float { width, .. } => Type::Float(*width),
            Value::Complex { width, .. } => Type::Complex(*width),
            Value::String(_) => Type::String,
            Value::Pointer { elem, .. } => Type::pointer(elem.clone()),
            Value::Array { elem, items } => Type::array(elem.clone(), items.len()),
            Value::Slice { elem, .. } => Type::slice(elem.clone()),
            Value::Map { key, elem, .. } => Type::map(key.clone(), elem.clone()),
            Value::Record { ty, .. } => Type::Record(Arc::clone(ty)),
            Value::Interface { name, .. } => Type::Interface(name.clone()),
            Value::Chan { elem, .. } => Type::chan(elem.clone()),
            Value::Func { signature, .. } => Type::Func(signature.clone()),
        };
        Some(ty)
    }

    /// Returns the display name of this value's type.
    pub fn type_name(&self) -> String {
        match self.type_of() {
            Some(ty) => ty.to_string(),
            None => "<invalid>".to_string(),
        }
    }

    /// Returns true if this value's type is exactly `ty`.
    pub fn has_type(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Value::Bool(_), Type::Bool) | (Value::String(_), Type::String) => true,
            (Value::Int { width, .. }, Type::Int(w)) | (Value::Uint { width, .. }, Type::Uint(w)) => {
                width == w
            }
            (Value::Float { width, .. }, Type::Float(w))
            | (Value::Complex { width, .. }, Type::Complex(w)) => width == w,
            (Value::Pointer { elem, .. }, Type::Pointer(t))
            | (Value::Slice { elem, .. }, Type::Slice(t))
            | (Value::Chan { elem, .. }, Type::Chan(t)) => elem == &**t,
            (Value::Array { elem, items }, Type::Array(t, len)) => elem == &**t && items.len() == *len,
            (Value::Map { key, elem, .. }, Type::Map(k, v)) => key == &**k && elem == &**v,
            (Value::Record { ty: record, .. }, Type::Record(t)) => record == t,
            (Value::Interface { name, .. }, Type::Interface(n))
            | (Value::Func { signature: name, .. }, Type::Func(n)) => name == n,
            _ => false,
        }
    }

    /// Reports whether a nilable value is nil.
    pub fn is_nil(&self) -> Result<bool, ModelError> {
        match self {
            Value::Pointer { target, .. } => Ok(target.is_none()),
            Value::Interface { held, .. } => Ok(held.is_none()),
            Value::Slice { items, .. } => Ok(items.is_none()),
            Value::Map { entries, .. } => Ok(entries.is_none()),
            Value::Chan { handle, .. } | Value::Func { handle, .. } => Ok(*handle == 0),
            other => Err(ModelError::KindMismatch {
                op: "is_nil",
                kind: other.kind(),
            }),
        }
    }

    /// Dereferences a pointer or unwraps an interface.
    pub fn elem(&self) -> Result<&Value, ModelError> {
        match self {
            Value::Pointer { target: Some(t), .. } | Value::Interface { held: Some(t), .. } => Ok(&**t),
            Value::Pointer { .. } | Value::Interface { .. } => Err(ModelError::NilDereference {
                ty: self.type_name(),
            }),
            other => Err(ModelError::KindMismatch {
                op: "elem",
                kind: other.kind(),
            }),
        }
    }

    /// Settable counterpart of [`Value::elem`].
    pub fn elem_mut(&mut self) -> Result<&mut Value, ModelError> {
        match self {
            Value::Pointer { target: Some(t), .. } | Value::Interface { held: Some(t), .. } => {
                Ok(&mut **t)
            }
            other => match other.kind() {
                Kind::Pointer | Kind::Interface => Err(ModelError::NilDereference {
                    ty: other.type_name(),
                }),
                kind => Err(ModelError::KindMismatch { op: "elem_mut", kind }),
            },
        }
    }

    /// Returns the element type of pointers, arrays, slices and channels,
    /// or the value type of maps.
    pub fn elem_type(&self) -> Option<&Type> {
        match self {
            Value::Pointer { elem, .. }
            | Value::Array { elem, .. }
            | Value::Slice { elem, .. }
            | Value::Map { elem, .. }
            | Value::Chan { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Returns the key type of maps.
    pub fn key_type(&self) -> Option<&Type> {
        match self {
            Value::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Returns the length of an array, slice, map or string (bytes).
    pub fn len(&self) -> Result<usize, ModelError> {
        match self {
            Value::Array { items, .. } => Ok(items.len()),
            Value::Slice { items, .. } => Ok(items.as_ref().map_or(0, Vec::len)),
            Value::Map { entries, .. } => Ok(entries.as_ref().map_or(0, Vec::len)),
            Value::String(s) => Ok(s.len()),
            other => Err(ModelError::KindMismatch {
                op: "len",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the `i`th element of an array or slice.
    pub fn index(&self, i: usize) -> Result<&Value, ModelError> {
        let items: &[Value] = match self {
            Value::Array { items, .. } | Value::Slice { items: Some(items), .. } => items.as_slice(),
            Value::Slice { items: None, .. } => &[],
            other => {
                return Err(ModelError::KindMismatch {
                    op: "index",
                    kind: other.kind(),
                });
            }
        };
        items.get(i).ok_or(ModelError::IndexOutOfRange {
            index: i,
            len: items.len(),
        })
    }

    /// Settable counterpart of [`Value::index`].
    pub fn index_mut(&mut self, i: usize) -> Result<&mut Value, ModelError> {
        match self {
            Value::Array { items, .. } | Value::Slice { items: Some(items), .. } => {
                let len = items.len();
                items
                    .get_mut(i)
                    .ok_or(ModelError::IndexOutOfRange { index: i, len })
            }
            Value::Slice { items: None, .. } => Err(ModelError::IndexOutOfRange { index: i, len: 0 }),
            other => Err(ModelError::KindMismatch {
                op: "index_mut",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the record type of a record value.
    pub fn record_type(&self) -> Option<&Arc<RecordType>> {
        match self {
            Value::Record { ty, .. } => Some(ty),
            _ => None,
        }
    }

    pub fn field_count(&self) -> Result<usize, ModelError> {
        match self {
            Value::Record { fields, .. } => Ok(fields.len()),
            other => Err(ModelError::KindMismatch {
                op: "field_count",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the name of the `i`th field of a record.
    pub fn field_name(&self, i: usize) -> Result<&str, ModelError> {
        match self {
            Value::Record { ty, .. } => ty.field_name(i).ok_or(ModelError::IndexOutOfRange {
                index: i,
                len: ty.field_count(),
            }),
            other => Err(ModelError::KindMismatch {
                op: "field_name",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the `i`th field of a record.
    pub fn field(&self, i: usize) -> Result<&Value, ModelError> {
        match self {
            Value::Record { fields, .. } => fields.get(i).ok_or(ModelError::IndexOutOfRange {
                index: i,
                len: fields.len(),
            }),
            other => Err(ModelError::KindMismatch {
                op: "field",
                kind: other.kind(),
            }),
        }
    }

    /// Settable counterpart of [`Value::field`].
    pub fn field_mut(&mut self, i: usize) -> Result<&mut Value, ModelError> {
        match self {
            Value::Record { fields, .. } => {
                let len = fields.len();
                fields
                    .get_mut(i)
                    .ok_or(ModelError::IndexOutOfRange { index: i, len })
            }
            other => Err(ModelError::KindMismatch {
                op: "field_mut",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the named field of a record.
    pub fn field_by_name(&self, name: &str) -> Result<&Value, ModelError> {
        match self {
            Value::Record { ty, .. } => match ty.field_index(name) {
                Some(i) => self.field(i),
                None => Err(field_not_found(ty, name)),
            },
            other => Err(ModelError::KindMismatch {
                op: "field_by_name",
                kind: other.kind(),
            }),
        }
    }

    /// Settable counterpart of [`Value::field_by_name`].
    pub fn field_by_name_mut(&mut self, name: &str) -> Result<&mut Value, ModelError> {
        match self {
            Value::Record { ty, fields } => match ty.field_index(name) {
                Some(i) => {
                    let len = fields.len();
                    fields
                        .get_mut(i)
                        .ok_or(ModelError::IndexOutOfRange { index: i, len })
                }
                None => Err(field_not_found(ty, name)),
            },
            other => Err(ModelError::KindMismatch {
                op: "field_by_name_mut",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the entries of a map in storage order (empty for a nil map).
    pub fn map_entries(&self) -> Result<&[(Value, Value)], ModelError> {
        match self {
            Value::Map { entries, .. } => Ok(entries.as_deref().unwrap_or(&[])),
            other => Err(ModelError::KindMismatch {
                op: "map_entries",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the keys of a map. The order carries no meaning.
    pub fn map_keys(&self) -> Result<Vec<&Value>, ModelError> {
        Ok(self.map_entries()?.iter().map(|(k, _)| k).collect())
    }

    /// Returns the value stored under `key`, if any.
    pub fn map_lookup(&self, key: &Value) -> Result<Option<&Value>, ModelError> {
        Ok(self
            .map_entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v))
    }
}

// =============================================================================
// MUTATION
// =============================================================================

impl Value {
    /// Stores `value` under `key`, replacing any previous value for that key.
    pub fn map_insert(&mut self, key: Value, value: Value) -> Result<(), ModelError> {
        match self {
            Value::Map {
                key: key_ty,
                elem: elem_ty,
                entries,
            } => {
                let key = coerce(key, key_ty)?;
                let value = coerce(value, elem_ty)?;
                let Some(entries) = entries.as_mut() else {
                    return Err(ModelError::NilMapInsert {
                        ty: Type::map(key_ty.clone(), elem_ty.clone()).to_string(),
                    });
                };
                match entries.iter().position(|(k, _)| *k == key) {
                    Some(i) => entries[i].1 = value,
                    None => entries.push((key, value)),
                }
                Ok(())
            }
            other => Err(ModelError::KindMismatch {
                op: "map_insert",
                kind: other.kind(),
            }),
        }
    }

    /// Returns the entry vector of a non-nil map. Callers must keep keys
    /// unique and entries of the map's key and element types.
    pub(crate) fn map_entries_mut(&mut self) -> Result<&mut Vec<(Value, Value)>, ModelError> {
        match self {
            Value::Map {
                key,
                elem,
                entries: None,
            } => Err(ModelError::NilMapInsert {
                ty: Type::map(key.clone(), elem.clone()).to_string(),
            }),
            Value::Map {
                entries: Some(entries),
                ..
            } => Ok(entries),
            other => Err(ModelError::KindMismatch {
                op: "map_entries_mut",
                kind: other.kind(),
            }),
        }
    }

    /// Sets a signed integer, failing if `v` does not fit the declared width.
    pub fn set_int(&mut self, v: i64) -> Result<(), ModelError> {
        match self {
            Value::Int { width, value } => {
                let (min, max) = width.signed_range();
                if v < min || v > max {
                    return Err(ModelError::Overflow {
                        ty: Type::Int(*width).to_string(),
                        value: v.to_string(),
                    });
                }
                *value = v;
                Ok(())
            }
            other => Err(ModelError::KindMismatch {
                op: "set_int",
                kind: other.kind(),
            }),
        }
    }

    /// Sets an unsigned integer, failing if `v` does not fit the declared width.
    pub fn set_uint(&mut self, v: u64) -> Result<(), ModelError> {
        match self {
            Value::Uint { width, value } => {
                if v > width.unsigned_max() {
                    return Err(ModelError::Overflow {
                        ty: Type::Uint(*width).to_string(),
                        value: v.to_string(),
                    });
                }
                *value = v;
                Ok(())
            }
            other => Err(ModelError::KindMismatch {
                op: "set_uint",
                kind: other.kind(),
            }),
        }
    }

    pub fn set_float(&mut self, v: f64) -> Result<(), ModelError> {
        match self {
            Value::Float { width, value } => {
                *value = match width {
                    FloatWidth::F32 => v as f32 as f64,
                    FloatWidth::F64 => v,
                };
                Ok(())
            }
            other => Err(ModelError::KindMismatch {
                op: "set_float",
                kind: other.kind(),
            }),
        }
    }

    pub fn set_bool(&mut self, v: bool) -> Result<(), ModelError> {
        match self {
            Value::Bool(b) => {
                *b = v;
                Ok(())
            }
            other => Err(ModelError::KindMismatch {
                op: "set_bool",
                kind: other.kind(),
            }),
        }
    }

    pub fn set_string(&mut self, v: impl Into<String>) -> Result<(), ModelError> {
        match self {
            Value::String(s) => {
                *s = v.into();
                Ok(())
            }
            other => Err(ModelError::KindMismatch {
                op: "set_string",
                kind: other.kind(),
            }),
        }
    }

    /// Replaces this value with `other`, which must be assignable to this value's type.
    pub fn set_value(&mut self, other: Value) -> Result<(), ModelError> {
        let ty = self
            .type_of()
            .ok_or(ModelError::InvalidValue { op: "set_value" })?;
        *self = coerce(other, &ty)?;
        Ok(())
    }
}

/// Converts `value` for storage in a slot of type `ty`.
///
/// Values of exactly `ty` pass through; anything is boxed into an interface.
fn coerce(value: Value, ty: &Type) -> Result<Value, ModelError> {
    if let Type::Interface(name) = ty {
        return Ok(Value::interface(name.clone(), value));
    }
    if value.has_type(ty) {
        Ok(value)
    } else {
        Err(ModelError::TypeMismatch {
            expected: ty.to_string(),
            found: value.type_name(),
        })
    }
}

fn coerce_all(items: Vec<Value>, ty: &Type) -> Result<Vec<Value>, ModelError> {
    items.into_iter().map(|item| coerce(item, ty)).collect()
}

fn field_not_found(ty: &RecordType, name: &str) -> ModelError {
    ModelError::FieldNotFound {
        record: ty.name().to_string(),
        field: name.to_string(),
    }
}

// =============================================================================
// EQUALITY & CONVERSIONS
// =============================================================================

/// Structural equality. Maps compare as unordered key/value sets.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Invalid, Value::Invalid) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int { width: wa, value: a }, Value::Int { width: wb, value: b }) => {
                wa == wb && a == b
            }
            (Value::Uint { width: wa, value: a }, Value::Uint { width: wb, value: b }) => {
                wa == wb && a == b
            }
            (Value::Float { width: wa, value: a }, Value::Float { width: wb, value: b }) => {
                wa == wb && a == b
            }
            (
                Value::Complex { width: wa, re: ra, im: ia },
                Value::Complex { width: wb, re: rb, im: ib },
            ) => wa == wb && ra == rb && ia == ib,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::Pointer { elem: ea, target: a },
                Value::Pointer { elem: eb, target: b },
            ) => ea == eb && a == b,
            (Value::Array { elem: ea, items: a }, Value::Array { elem: eb, items: b }) => {
                ea == eb && a == b
            }
            (Value::Slice { elem: ea, items: a }, Value::Slice { elem: eb, items: b }) => {
                ea == eb && a == b
            }
            (
                Value::Map { key: ka, elem: ea, entries: a },
                Value::Map { key: kb, elem: eb, entries: b },
            ) => {
                ka == kb
                    && ea == eb
                    && match (a, b) {
                        (None, None) => true,
                        (Some(a), Some(b)) => {
                            a.len() == b.len()
                                && a.iter().all(|(k, v)| b.iter().any(|(k2, v2)| k == k2 && v == v2))
                        }
                        _ => false,
                    }
            }
            (Value::Record { ty: ta, fields: a }, Value::Record { ty: tb, fields: b }) => {
                ta == tb && a == b
            }
            (
                Value::Interface { name: na, held: a },
                Value::Interface { name: nb, held: b },
            ) => na == nb && a == b,
            (Value::Chan { elem: ea, handle: a }, Value::Chan { elem: eb, handle: b }) => {
                ea == eb && a == b
            }
            (
                Value::Func { signature: sa, handle: a },
                Value::Func { signature: sb, handle: b },
            ) => sa == sb && a == b,
            _ => false,
        }
    }
}

macro_rules! from_signed {
    ($($t:ty => $width:ident),* $(,)?) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int { width: IntWidth::$width, value: v as i64 }
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty => $width:ident),* $(,)?) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint { width: IntWidth::$width, value: v as u64 }
            }
        })*
    };
}

from_signed!(i8 => W8, i16 => W16, i32 => W32, i64 => W64, isize => Size);
from_unsigned!(u8 => W8, u16 => W16, u32 => W32, u64 => W64, usize => Size);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float {
            width: FloatWidth::F32,
            value: v as f64,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float {
            width: FloatWidth::F64,
            value: v,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
