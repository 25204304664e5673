//! Bridge between native Rust types and [`Value`].
//!
//! Integers, floats, `bool` and `String` map to scalars, `Vec<T>` to slices,
//! `[T; N]` to arrays, `Option<T>` to pointers (`None` is nil) and
//! `BTreeMap`/`HashMap` to maps. Records implement [`Reflect`] by hand
//! against a [`RecordType`](crate::model::RecordType).

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::error::ModelError;
use crate::model::types::{FloatWidth, IntWidth, Type};
use crate::model::value::Value;

/// A native type that can be viewed as, and rebuilt from, a [`Value`].
pub trait Reflect: Sized {
    /// Returns the structural type of `Self`.
    fn reflect_type() -> Type;

    /// Converts `self` into a dynamic value of type [`Reflect::reflect_type`].
    fn to_value(&self) -> Value;

    /// Rebuilds `Self` from a dynamic value.
    fn from_value(value: &Value) -> Result<Self, ModelError>;
}

fn mismatch<T: Reflect>(found: &Value) -> ModelError {
    ModelError::TypeMismatch {
        expected: T::reflect_type().to_string(),
        found: found.type_name(),
    }
}

macro_rules! reflect_signed {
    ($($t:ty => $width:ident),* $(,)?) => {
        $(impl Reflect for $t {
            fn reflect_type() -> Type {
                Type::Int(IntWidth::$width)
            }

            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn from_value(value: &Value) -> Result<Self, ModelError> {
                match value {
                    Value::Int { value: v, .. } => <$t>::try_from(*v).map_err(|_| ModelError::Overflow {
                        ty: Self::reflect_type().to_string(),
                        value: v.to_string(),
                    }),
                    other => Err(mismatch::<Self>(other)),
                }
            }
        })*
    };
}

macro_rules! reflect_unsigned {
    ($($t:ty => $width:ident),* $(,)?) => {
        $(impl Reflect for $t {
            fn reflect_type() -> Type {
                Type::Uint(IntWidth::$width)
            }

            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn from_value(value: &Value) -> Result<Self, ModelError> {
                match value {
                    Value::Uint { value: v, .. } => <$t>::try_from(*v).map_err(|_| ModelError::Overflow {
                        ty: Self::reflect_type().to_string(),
                        value: v.to_string(),
                    }),
                    other => Err(mismatch::<Self>(other)),
                }
            }
        })*
    };
}

reflect_signed!(i8 => W8, i16 => W16, i32 => W32, i64 => W64, isize => Size);
reflect_unsigned!(u8 => W8, u16 => W16, u32 => W32, u64 => W64, usize => Size);

impl Reflect for f32 {
    fn reflect_type() -> Type {
        Type::Float(FloatWidth::F32)
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Float { value, .. } => Ok(*value as f32),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Reflect for f64 {
    fn reflect_type() -> Type {
        Type::Float(FloatWidth::F64)
    }

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Float { value, .. } => Ok(*value),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Reflect for bool {
    fn reflect_type() -> Type {
        Type::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Reflect for String {
    fn reflect_type() -> Type {
        Type::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_type() -> Type {
        Type::slice(T::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::Slice {
            elem: T::reflect_type(),
            items: Some(self.iter().map(T::to_value).collect()),
        }
    }

    /// A nil slice becomes an empty `Vec`.
    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Slice { items, .. } => items.iter().flatten().map(T::from_value).collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_type() -> Type {
        Type::array(T::reflect_type(), N)
    }

    fn to_value(&self) -> Value {
        Value::Array {
            elem: T::reflect_type(),
            items: self.iter().map(T::to_value).collect(),
        }
    }

    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Array { items, .. } if items.len() == N => {
                let items = items.iter().map(T::from_value).collect::<Result<Vec<_>, _>>()?;
                items.try_into().map_err(|_| mismatch::<Self>(value))
            }
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect_type() -> Type {
        Type::pointer(T::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::Pointer {
            elem: T::reflect_type(),
            target: self.as_ref().map(|v| Box::new(v.to_value())),
        }
    }

    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Pointer { target, .. } => target.as_deref().map(T::from_value).transpose(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<K: Reflect + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect_type() -> Type {
        Type::map(K::reflect_type(), V::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::Map {
            key: K::reflect_type(),
            elem: V::reflect_type(),
            entries: Some(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect()),
        }
    }

    /// A nil map becomes an empty map.
    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Map { entries, .. } => entries
                .iter()
                .flatten()
                .map(|(k, v)| -> Result<(K, V), ModelError> { Ok((K::from_value(k)?, V::from_value(v)?)) })
                .collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
    S: BuildHasher + Default,
{
    fn reflect_type() -> Type {
        Type::map(K::reflect_type(), V::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::Map {
            key: K::reflect_type(),
            elem: V::reflect_type(),
            entries: Some(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect()),
        }
    }

    /// A nil map becomes an empty map.
    fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::Map { entries, .. } => entries
                .iter()
                .flatten()
                .map(|(k, v)| -> Result<(K, V), ModelError> { Ok((K::from_value(k)?, V::from_value(v)?)) })
                .collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_types() {
        assert_eq!(i8::reflect_type(), Type::Int(IntWidth::W8));
        assert_eq!(usize::reflect_type(), Type::Uint(IntWidth::Size));
        assert_eq!(<Vec<Option<String>>>::reflect_type().to_string(), "[]*string");
        assert_eq!(<[u16; 4]>::reflect_type().to_string(), "[4]uint16");
        assert_eq!(<BTreeMap<String, i64>>::reflect_type().to_string(), "map[string]int64");
    }

    #[test]
    fn test_to_value_matches_reflect_type() {
        let v = vec![Some(3i32), None];
        assert!(v.to_value().has_type(&<Vec<Option<i32>>>::reflect_type()));

        let mut m = HashMap::new();
        m.insert(1u8, [true, false]);
        assert!(m.to_value().has_type(&<HashMap<u8, [bool; 2]>>::reflect_type()));
    }

    #[test]
    fn test_from_value_round_trip() {
        let mut m = BTreeMap::new();
        m.insert("a".to_string(), vec![1i64, -2]);
        m.insert("b".to_string(), Vec::new());
        assert_eq!(BTreeMap::<String, Vec<i64>>::from_value(&m.to_value()).unwrap(), m);

        let arr = [Some(1u32), None, Some(3)];
        assert_eq!(<[Option<u32>; 3]>::from_value(&arr.to_value()).unwrap(), arr);
    }

    #[test]
    fn test_from_value_rejects_mismatch() {
        assert!(matches!(
            i32::from_value(&Value::from("x")),
            Err(ModelError::TypeMismatch { .. })
        ));
        assert!(matches!(
            i8::from_value(&Value::from(300i64)),
            Err(ModelError::Overflow { .. })
        ));
        assert!(<[i64; 2]>::from_value(&[1i64, 2, 3].to_value()).is_err());
    }

    #[test]
    fn test_nil_collections_become_empty() {
        let nil_slice = Value::zero(&<Vec<i64>>::reflect_type());
        assert_eq!(<Vec<i64>>::from_value(&nil_slice).unwrap(), Vec::<i64>::new());
        let nil_map = Value::zero(&<BTreeMap<i64, i64>>::reflect_type());
        assert!(<BTreeMap<i64, i64>>::from_value(&nil_map).unwrap().is_empty());
        let nil_ptr = Value::zero(&<Option<String>>::reflect_type());
        assert_eq!(<Option<String>>::from_value(&nil_ptr).unwrap(), None);
    }
}
