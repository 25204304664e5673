//! Kinds and structural type descriptors.
//!
//! A [`Type`] describes the shape of a value independently of its contents:
//! element types for sequences and pointers, key/value types for maps, and
//! an ordered field list for records.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Runtime shape tag of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    Bool,
    Int,
    Uint,
    Float,
    Complex,
    String,
    Pointer,
    Array,
    Slice,
    Map,
    Record,
    /// Dynamic value carrying its own type tag (may be nil).
    Interface,
    Chan,
    Func,
}

impl Kind {
    /// Returns the lowercase name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Complex => "complex",
            Kind::String => "string",
            Kind::Pointer => "pointer",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Record => "record",
            Kind::Interface => "interface",
            Kind::Chan => "chan",
            Kind::Func => "func",
        }
    }

    /// Returns true for kinds that have a nil state.
    pub fn is_nilable(self) -> bool {
        matches!(
            self,
            Kind::Pointer | Kind::Interface | Kind::Slice | Kind::Map | Kind::Chan | Kind::Func
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage width of an integer type. `Size` is the platform word (64 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    Size,
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Returns the number of bits.
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::Size | IntWidth::W64 => 64,
        }
    }

    /// Returns the inclusive range representable by a signed integer of this width.
    pub fn signed_range(self) -> (i64, i64) {
        match self.bits() {
            64 => (i64::MIN, i64::MAX),
            bits => (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1),
        }
    }

    /// Returns the largest value representable by an unsigned integer of this width.
    pub fn unsigned_max(self) -> u64 {
        match self.bits() {
            64 => u64::MAX,
            bits => (1u64 << bits) - 1,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            IntWidth::Size => "",
            IntWidth::W8 => "8",
            IntWidth::W16 => "16",
            IntWidth::W32 => "32",
            IntWidth::W64 => "64",
        }
    }
}

/// Storage width of a floating-point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Structural type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    /// Complex number whose parts have the given width.
    Complex(FloatWidth),
    String,
    Pointer(Box<Type>),
    /// Fixed-length sequence.
    Array(Box<Type>, usize),
    /// Growable sequence.
    Slice(Box<Type>),
    /// Key type, value type.
    Map(Box<Type>, Box<Type>),
    Record(Arc<RecordType>),
    /// Named dynamic type; any value is assignable to it.
    Interface(String),
    Chan(Box<Type>),
    /// Function with the given signature text.
    Func(String),
}

impl Type {
    /// Returns the kind of values of this type.
    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Int(_) => Kind::Int,
            Type::Uint(_) => Kind::Uint,
            Type::Float(_) => Kind::Float,
            Type::Complex(_) => Kind::Complex,
            Type::String => Kind::String,
            Type::Pointer(_) => Kind::Pointer,
            Type::Array(..) => Kind::Array,
            Type::Slice(_) => Kind::Slice,
            Type::Map(..) => Kind::Map,
            Type::Record(_) => Kind::Record,
            Type::Interface(_) => Kind::Interface,
            Type::Chan(_) => Kind::Chan,
            Type::Func(_) => Kind::Func,
        }
    }

    pub fn pointer(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    pub fn array(elem: Type, len: usize) -> Type {
        Type::Array(Box::new(elem), len)
    }

    pub fn slice(elem: Type) -> Type {
        Type::Slice(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn chan(elem: Type) -> Type {
        Type::Chan(Box::new(elem))
    }

    /// The empty interface, to which every value is assignable.
    pub fn any() -> Type {
        Type::Interface("interface {}".to_string())
    }

    /// Returns the element type of pointers, arrays, slices and channels,
    /// or the value type of maps.
    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Pointer(elem)
            | Type::Array(elem, _)
            | Type::Slice(elem)
            | Type::Chan(elem)
            | Type::Map(_, elem) => Some(&**elem),
            _ => None,
        }
    }

    /// Returns the key type of maps.
    pub fn key(&self) -> Option<&Type> {
        match self {
            Type::Map(key, _) => Some(&**key),
            _ => None,
        }
    }

    /// Returns true if a value of type `other` may be stored in a slot of this type.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        matches!(self, Type::Interface(_)) || self == other
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::Int(width) => write!(f, "int{}", width.suffix()),
            Type::Uint(width) => write!(f, "uint{}", width.suffix()),
            Type::Float(FloatWidth::F32) => f.write_str("float32"),
            Type::Float(FloatWidth::F64) => f.write_str("float64"),
            Type::Complex(FloatWidth::F32) => f.write_str("complex64"),
            Type::Complex(FloatWidth::F64) => f.write_str("complex128"),
            Type::String => f.write_str("string"),
            Type::Pointer(elem) => write!(f, "*{elem}"),
            Type::Array(elem, len) => write!(f, "[{len}]{elem}"),
            Type::Slice(elem) => write!(f, "[]{elem}"),
            Type::Map(key, value) => write!(f, "map[{key}]{value}"),
            Type::Record(record) => f.write_str(record.name()),
            Type::Interface(name) => f.write_str(name),
            Type::Chan(elem) => write!(f, "chan {elem}"),
            Type::Func(signature) => f.write_str(signature),
        }
    }
}

/// A named record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

/// Record layout: a name and an ordered list of fields.
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    fields: Vec<Field>,
    index: FxHashMap<String, usize>,
}

impl RecordType {
    /// Creates a record type. If two fields share a name, lookups by name
    /// resolve to the first one and the record cannot be encoded.
    pub fn new<N: Into<String>>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, Type)>,
    ) -> Self {
        let fields: Vec<Field> = fields
            .into_iter()
            .map(|(name, ty)| Field { name: name.into(), ty })
            .collect();
        let mut index = FxHashMap::default();
        for (i, field) in fields.iter().enumerate() {
            index.entry(field.name.clone()).or_insert(i);
        }
        Self {
            name: name.into(),
            fields,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the name of the field at index `i`.
    pub fn field_name(&self, i: usize) -> Option<&str> {
        self.fields.get(i).map(|f| f.name.as_str())
    }

    /// Returns the declaration index of the named field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for RecordType {}
