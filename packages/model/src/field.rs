//! Typed field lenses over models.
//!
//! A `Field` is declared once at the wrapper-type level (usually as an
//! associated const) and resolves against whichever model instance it is
//! given. Fields never store data themselves: reads and writes go straight
//! through the model's backing store.

use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::{Model, ModelError, Value};

/// Types a field can cast the stored value to and from.
pub trait FieldValue: Sized {
    /// Kind name used in cast error messages.
    const EXPECTED: &'static str;

    /// Cast a stored value to this type. `None` rejects the value.
    fn from_value(value: Value) -> Option<Self>;

    /// Convert back into a stored value.
    fn into_value(self) -> Value;
}

impl FieldValue for Value {
    const EXPECTED: &'static str = "value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }

    fn into_value(self) -> Value {
        self
    }
}

impl FieldValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FieldValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Byte(n) => Some(n as i64),
            Value::Short(n) => Some(n as i64),
            Value::Int(n) | Value::Long(n) => Some(n),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl FieldValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        i64::from_value(value).and_then(|n| i32::try_from(n).ok())
    }

    fn into_value(self) -> Value {
        Value::Int(self as i64)
    }
}

impl FieldValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x as f64),
            Value::Double(x) => Some(x),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl FieldValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FieldValue for Vec<Value> {
    const EXPECTED: &'static str = "array";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Array(self)
    }
}

/// A named, path-qualified, typed lens into a model.
///
/// The default, if declared, is a function producing a fresh value: it is
/// materialized into the model's storage on first read, so two model
/// instances never share one default container by identity.
///
/// # Example
///
/// ```rust
/// use packforge_model::{Field, Model};
///
/// struct Meta;
/// impl Meta {
///     const DESCRIPTION: Field<String> = Field::new("pack/description");
/// }
///
/// let model = Model::new();
/// Meta::DESCRIPTION.set(&model, "hello".to_string()).unwrap();
/// assert_eq!(Meta::DESCRIPTION.get(&model).unwrap(), "hello");
/// ```
pub struct Field<T> {
    path: &'static str,
    default: Option<fn() -> Value>,
    _marker: PhantomData<T>,
}

impl<T: FieldValue> Field<T> {
    /// A field with no default.
    pub const fn new(path: &'static str) -> Self {
        Field {
            path,
            default: None,
            _marker: PhantomData,
        }
    }

    /// A field whose absent reads materialize `default()` into storage.
    pub const fn with_default(path: &'static str, default: fn() -> Value) -> Self {
        Field {
            path,
            default: Some(default),
            _marker: PhantomData,
        }
    }

    /// The field's path within its model.
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Read through the model, casting the stored (or defaulted) value.
    pub fn get(&self, model: &Model) -> Result<T, ModelError> {
        let stored = match self.default {
            Some(default) => model.get_or(self.path, default())?,
            None => model.get(self.path)?.unwrap_or(Value::Null),
        };
        let actual = stored.kind();
        T::from_value(stored).ok_or(ModelError::Cast {
            path: self.path.to_string(),
            expected: T::EXPECTED,
            actual,
        })
    }

    /// Write through the model. The compile-time type is the cast.
    pub fn set(&self, model: &Model, value: T) -> Result<(), ModelError> {
        model.set(self.path, value.into_value())
    }

    /// Write a dynamic value, applying the typed cast first. A rejected
    /// value leaves storage untouched.
    pub fn set_value(&self, model: &Model, value: Value) -> Result<(), ModelError> {
        let actual = value.kind();
        let cast = T::from_value(value).ok_or(ModelError::Cast {
            path: self.path.to_string(),
            expected: T::EXPECTED,
            actual,
        })?;
        self.set(model, cast)
    }
}

/// A lens onto a nested sub-model.
///
/// Reading materializes an empty mapping at the path (if absent) and
/// returns an aliased view sharing the parent's backing store. Writing a
/// model copies its mapping by value, breaking aliasing with the source.
pub struct ModelField {
    path: &'static str,
}

impl ModelField {
    pub const fn new(path: &'static str) -> Self {
        ModelField { path }
    }

    /// The aliased sub-model view.
    pub fn get(&self, model: &Model) -> Result<Model, ModelError> {
        model.submodel(self.path)
    }

    /// Copy `other`'s mapping by value into the field.
    pub fn set(&self, model: &Model, other: &Model) -> Result<(), ModelError> {
        model.assign(self.path, other)
    }

    /// Store a plain mapping directly.
    pub fn set_map(&self, model: &Model, map: IndexMap<String, Value>) -> Result<(), ModelError> {
        model.set(self.path, Value::Map(map))
    }
}
