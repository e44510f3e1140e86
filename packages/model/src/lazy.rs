//! Deferred values.
//!
//! A pack is assembled in one pass, but some values are not known until the
//! whole tree is frozen: a dispatch function's body depends on every slot
//! claimed anywhere, a menu command may reference a function that is created
//! later. `Lazy` defers the read, and `LazyCell` is its writable backing
//! cell for forward references that get filled in afterwards.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Value;

type CastFn = Rc<dyn Fn(Value) -> Value>;

/// A writable cell holding a raw value behind read/write projections.
///
/// Reading applies `get_cast` to the stored raw value; writing applies
/// `set_cast` before storing. Clones share the same cell.
#[derive(Clone)]
pub struct LazyCell {
    raw: Rc<RefCell<Value>>,
    get_cast: Option<CastFn>,
    set_cast: Option<CastFn>,
}

impl LazyCell {
    /// Create a cell with identity projections.
    pub fn new(initial: impl Into<Value>) -> Self {
        LazyCell {
            raw: Rc::new(RefCell::new(initial.into())),
            get_cast: None,
            set_cast: None,
        }
    }

    /// Create a cell with read/write projections.
    pub fn with_casts(
        initial: impl Into<Value>,
        get_cast: impl Fn(Value) -> Value + 'static,
        set_cast: impl Fn(Value) -> Value + 'static,
    ) -> Self {
        let set_cast: CastFn = Rc::new(set_cast);
        LazyCell {
            raw: Rc::new(RefCell::new(set_cast(initial.into()))),
            get_cast: Some(Rc::new(get_cast)),
            set_cast: Some(set_cast),
        }
    }

    /// Read the projected value.
    pub fn get(&self) -> Value {
        let raw = self.raw.borrow().clone();
        match &self.get_cast {
            Some(cast) => cast(raw),
            None => raw,
        }
    }

    /// Store a new raw value, applying the write projection.
    pub fn set(&self, value: impl Into<Value>) {
        let value = value.into();
        *self.raw.borrow_mut() = match &self.set_cast {
            Some(cast) => cast(value),
            None => value,
        };
    }

    /// A deferred view of this cell. Reads after a later `set` observe
    /// the new value.
    pub fn lazy(&self) -> Lazy {
        let cell = self.clone();
        Lazy::computed(move || cell.get())
    }
}

impl fmt::Debug for LazyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LazyCell").field(&self.raw.borrow()).finish()
    }
}

/// A value whose read is deferred to resolution time.
///
/// Combinators never evaluate their operands eagerly: the result recomputes
/// from the current operand values on every `resolve` call.
#[derive(Clone)]
pub struct Lazy {
    read: Rc<dyn Fn() -> Value>,
}

impl Lazy {
    /// Defer to a closure evaluated on every read.
    pub fn computed(f: impl Fn() -> Value + 'static) -> Self {
        Lazy { read: Rc::new(f) }
    }

    /// A lazy wrapper around a fixed value.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Lazy::computed(move || value.clone())
    }

    /// Evaluate to the current value. Nested lazies are resolved through.
    pub fn resolve(&self) -> Value {
        let mut value = (self.read)();
        while let Value::Lazy(inner) = value {
            value = inner.resolve();
        }
        value
    }

    /// A new lazy applying `f` to this value at read time.
    #[must_use]
    pub fn map(&self, f: impl Fn(Value) -> Value + 'static) -> Lazy {
        let this = self.clone();
        Lazy::computed(move || f(this.resolve()))
    }

    /// A new lazy combining two operands at read time.
    #[must_use]
    pub fn join(&self, other: &Lazy, f: impl Fn(Value, Value) -> Value + 'static) -> Lazy {
        let left = self.clone();
        let right = other.clone();
        Lazy::computed(move || f(left.resolve(), right.resolve()))
    }

    /// String concatenation deferred to read time.
    ///
    /// Non-string operands are rendered with their `Display`-like text form
    /// (integers as bare digits).
    #[must_use]
    pub fn concat(&self, other: impl Into<Lazy>) -> Lazy {
        self.join(&other.into(), |a, b| {
            Value::String(format!("{}{}", text_of(&a), text_of(&b)))
        })
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Byte(n) => n.to_string(),
        Value::Short(n) => n.to_string(),
        Value::Int(n) | Value::Long(n) => n.to_string(),
        Value::Float(x) => format!("{:?}", x),
        Value::Double(x) => format!("{:?}", x),
        other => format!("{:?}", other),
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lazy(<deferred>)")
    }
}

impl PartialEq for Lazy {
    fn eq(&self, other: &Self) -> bool {
        self.resolve() == other.resolve()
    }
}

impl From<&LazyCell> for Lazy {
    fn from(cell: &LazyCell) -> Self {
        cell.lazy()
    }
}

impl From<Value> for Lazy {
    fn from(value: Value) -> Self {
        Lazy::constant(value)
    }
}

impl From<&str> for Lazy {
    fn from(s: &str) -> Self {
        Lazy::constant(s)
    }
}
