//! The data-binding model: a path-addressable view into a shared mapping.
//!
//! A `Model` does not own a private tree of data. It is a handle onto a
//! shared backing `Value` plus a base path inside it; a sub-model is the
//! same backing store with a longer base path, so mutations through either
//! handle observe each other. Sharing is always this explicit handle, never
//! incidental aliasing.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::{ModelError, Path, Value};

/// A mutable, path-addressable nested-mapping wrapper.
///
/// Paths are single keys or slash-delimited key sequences; intermediate
/// mappings are created on first write or defaulted read. Cloning a `Model`
/// yields another view of the *same* backing store — use [`Model::dump`]
/// for a value snapshot.
///
/// # Example
///
/// ```rust
/// use packforge_model::{Model, Value};
///
/// let model = Model::new();
/// model.set("a/b/c", 5i64).unwrap();
/// assert_eq!(model.get("a/b/c").unwrap(), Some(Value::Int(5)));
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    root: Rc<RefCell<Value>>,
    base: Path,
}

impl Model {
    /// Create a model over a fresh empty mapping.
    pub fn new() -> Self {
        Model {
            root: Rc::new(RefCell::new(Value::map())),
            base: Path::root(),
        }
    }

    /// Create a model owning the given value as its backing store.
    pub fn from_value(value: Value) -> Self {
        Model {
            root: Rc::new(RefCell::new(value)),
            base: Path::root(),
        }
    }

    /// Read the value at `path`, or `None` if absent. Intermediate
    /// mappings are not created.
    pub fn get(&self, path: impl Into<Path>) -> Result<Option<Value>, ModelError> {
        let full = self.base.join(path);
        let root = self.root.borrow();
        let mut cursor: &Value = &root;
        for (i, segment) in full.iter().enumerate() {
            match cursor {
                Value::Map(map) => match map.get(segment) {
                    Some(next) => cursor = next,
                    None => return Ok(None),
                },
                other => {
                    return Err(not_a_model(&full, i, other.kind()));
                }
            }
        }
        Ok(Some(cursor.clone()))
    }

    /// Read the value at `path`, materializing `default` into storage
    /// first when the terminal key is absent.
    ///
    /// The default is moved in, so every call site hands over a fresh
    /// value; two models can never end up sharing one default by identity.
    pub fn get_or(
        &self,
        path: impl Into<Path>,
        default: impl Into<Value>,
    ) -> Result<Value, ModelError> {
        let full = self.base.join(path);
        self.with_parent_map(&full, |map, key| {
            Ok(map.entry(key.to_string()).or_insert_with(|| default.into()).clone())
        })
    }

    /// Write `value` at `path`, creating intermediate mappings.
    pub fn set(&self, path: impl Into<Path>, value: impl Into<Value>) -> Result<(), ModelError> {
        let full = self.base.join(path);
        self.with_parent_map(&full, |map, key| {
            map.insert(key.to_string(), value.into());
            Ok(())
        })
    }

    /// Append `value` to the sequence at `path`, creating the sequence
    /// (and intermediate mappings) when absent.
    pub fn push(&self, path: impl Into<Path>, value: impl Into<Value>) -> Result<(), ModelError> {
        let full = self.base.join(path);
        self.with_parent_map(&full, |map, key| {
            match map.entry(key.to_string()).or_insert_with(Value::array) {
                Value::Array(items) => {
                    items.push(value.into());
                    Ok(())
                }
                other => Err(ModelError::Cast {
                    path: full.to_string(),
                    expected: "array",
                    actual: other.kind(),
                }),
            }
        })
    }

    /// An aliased sub-model view rooted at `path`.
    ///
    /// An empty mapping is materialized at the path if absent; an existing
    /// non-mapping value there is a [`ModelError::NotAModel`]. The returned
    /// model shares this model's backing store: writes through either side
    /// observe each other.
    pub fn submodel(&self, path: impl Into<Path>) -> Result<Model, ModelError> {
        let full = self.base.join(path);
        self.with_parent_map(&full, |map, key| {
            match map.entry(key.to_string()).or_insert_with(Value::map) {
                Value::Map(_) => Ok(()),
                other => Err(not_a_model(&full, full.len() - 1, other.kind())),
            }
        })?;
        Ok(Model {
            root: Rc::clone(&self.root),
            base: full,
        })
    }

    /// Copy another model's mapping by value into `path`, breaking any
    /// aliasing with the source.
    pub fn assign(&self, path: impl Into<Path>, other: &Model) -> Result<(), ModelError> {
        self.set(path, other.dump())
    }

    /// Snapshot the mapped subtree. A view that was never written resolves
    /// to an empty mapping.
    pub fn dump(&self) -> Value {
        let root = self.root.borrow();
        let mut cursor: &Value = &root;
        for segment in self.base.iter() {
            match cursor {
                Value::Map(map) => match map.get(segment) {
                    Some(next) => cursor = next,
                    None => return Value::map(),
                },
                _ => return Value::map(),
            }
        }
        cursor.clone()
    }

    /// Walk to the mapping holding the path's terminal key, creating
    /// intermediate mappings, then hand the mapping and key to `f`.
    fn with_parent_map<R>(
        &self,
        full: &Path,
        f: impl FnOnce(&mut IndexMap<String, Value>, &str) -> Result<R, ModelError>,
    ) -> Result<R, ModelError> {
        let (parents, key) = match full.split_last() {
            Some(split) => split,
            None => {
                return Err(not_a_model(full, 0, "nothing"));
            }
        };
        let mut root = self.root.borrow_mut();
        let mut cursor: &mut Value = &mut root;
        for (i, segment) in parents.iter().enumerate() {
            match cursor {
                Value::Map(map) => {
                    cursor = map.entry(segment.to_string()).or_insert_with(Value::map);
                }
                other => {
                    return Err(not_a_model(full, i, other.kind()));
                }
            }
        }
        match cursor {
            Value::Map(map) => f(map, key),
            other => Err(not_a_model(full, full.len() - 1, other.kind())),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::new()
    }
}

fn not_a_model(path: &Path, position: usize, kind: &'static str) -> ModelError {
    let shown = if path.is_empty() {
        "<root>".to_string()
    } else {
        path.segments()[..=position.min(path.len() - 1)].join("/")
    };
    ModelError::NotAModel { path: shown, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_addressing() {
        let model = Model::new();
        model.set("a/b/c", 5i64).unwrap();

        let mut c = IndexMap::new();
        c.insert("c".to_string(), Value::Int(5));
        let mut b = IndexMap::new();
        b.insert("b".to_string(), Value::Map(c));
        let mut a = IndexMap::new();
        a.insert("a".to_string(), Value::Map(b));
        assert_eq!(model.dump(), Value::Map(a));

        assert_eq!(model.get("a/b/c").unwrap(), Some(Value::Int(5)));
        assert_eq!(model.get("a/b/missing").unwrap(), None);
    }

    #[test]
    fn get_or_materializes_default() {
        let model = Model::new();
        assert_eq!(
            model.get_or("values", Value::array()).unwrap(),
            Value::array()
        );
        // The default is now stored, not just returned.
        assert_eq!(model.get("values").unwrap(), Some(Value::array()));
    }

    #[test]
    fn get_or_keeps_existing() {
        let model = Model::new();
        model.set("n", 3i64).unwrap();
        assert_eq!(model.get_or("n", 0i64).unwrap(), Value::Int(3));
    }

    #[test]
    fn submodel_aliases_parent() {
        let parent = Model::new();
        let child = parent.submodel("child").unwrap();
        child.set("x", 1i64).unwrap();

        assert_eq!(parent.get("child/x").unwrap(), Some(Value::Int(1)));

        // ... and the other way around.
        parent.set("child/y", 2i64).unwrap();
        assert_eq!(child.get("y").unwrap(), Some(Value::Int(2)));
    }

    #[test]
    fn assign_copies_by_value() {
        let source = Model::new();
        source.set("k", "v").unwrap();

        let target = Model::new();
        target.assign("sub", &source).unwrap();
        source.set("k", "changed").unwrap();

        // The copy is isolated from later mutation of the source.
        assert_eq!(
            target.get("sub/k").unwrap(),
            Some(Value::String("v".to_string()))
        );
    }

    #[test]
    fn traversal_through_primitive_fails() {
        let model = Model::new();
        model.set("leaf", 1i64).unwrap();
        let err = model.set("leaf/inner", 2i64).unwrap_err();
        assert!(matches!(err, ModelError::NotAModel { .. }));

        let err = model.get("leaf/inner").unwrap_err();
        assert!(matches!(err, ModelError::NotAModel { .. }));
    }

    #[test]
    fn submodel_over_primitive_fails() {
        let model = Model::new();
        model.set("leaf", 1i64).unwrap();
        assert!(matches!(
            model.submodel("leaf"),
            Err(ModelError::NotAModel { .. })
        ));
    }

    #[test]
    fn push_creates_and_appends() {
        let model = Model::new();
        model.push("list", 1i64).unwrap();
        model.push("list", 2i64).unwrap();
        assert_eq!(
            model.get("list").unwrap(),
            Some(Value::Array(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn push_onto_non_array_fails() {
        let model = Model::new();
        model.set("n", 1i64).unwrap();
        assert!(matches!(
            model.push("n", 2i64),
            Err(ModelError::Cast { .. })
        ));
    }

    #[test]
    fn clone_is_a_view() {
        let model = Model::new();
        let view = model.clone();
        view.set("k", 1i64).unwrap();
        assert_eq!(model.get("k").unwrap(), Some(Value::Int(1)));
    }
}
