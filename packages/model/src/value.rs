//! The Value type - a dynamically-typed tree of pack data.
//!
//! Everything a pack file can contain is a `Value`: primitives, sequences,
//! insertion-ordered mappings, and lazily-evaluated boxes. Both the JSON
//! and the compound-tag codecs consume this one representation.

use indexmap::IndexMap;

use crate::Lazy;

/// A tree-shaped value attached to models and tree leaves.
///
/// # Design Notes
///
/// - Uses `IndexMap` so mapping keys keep their insertion order; generated
///   files must not reorder what the author wrote.
/// - Integers carry an explicit width (`Byte`/`Short`/`Int`/`Long`) because
///   compound-tag text distinguishes them with numeric suffixes (`3b`,
///   `3s`, `3`, `3l`). Plain host integers map to `Int`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Byte-width integer (`3b` in tag text).
    Byte(i8),
    /// Short-width integer (`3s` in tag text).
    Short(i16),
    /// Default-width integer (bare digits in tag text).
    Int(i64),
    /// Long-width integer (`3l` in tag text).
    Long(i64),
    /// 32-bit float (`1.5f` in tag text).
    Float(f32),
    /// 64-bit float (`1.5d` in tag text).
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data. Tag text encodes it as a byte array; JSON rejects it.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value mapping preserving insertion order.
    Map(IndexMap<String, Value>),
    /// A deferred value, resolved at encoding time.
    Lazy(Lazy),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(IndexMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Create a binary value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// A short name for the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Lazy(_) => "lazy",
        }
    }
}

// Conversion from common host types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
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

impl From<Lazy> for Value {
    fn from(v: Lazy) -> Self {
        Value::Lazy(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}
