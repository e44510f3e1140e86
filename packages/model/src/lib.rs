//! packforge model layer: the data every pack file is built from.
//!
//! - `Path`: slash-delimited segments addressing models and tree nodes
//! - `Value`: dynamically-typed tree with insertion-ordered mappings and
//!   width-tagged integers
//! - `Lazy` / `LazyCell`: deferred values for forward references
//! - `Model`: a path-addressable view into a shared backing mapping
//! - `Field` / `ModelField`: typed lenses bound at the wrapper-type level
//!
//! # Example
//!
//! ```rust
//! use packforge_model::{Model, Value};
//!
//! let model = Model::new();
//! model.set("pack/pack_format", 26i64).unwrap();
//! let pack = model.submodel("pack").unwrap();
//! assert_eq!(pack.get("pack_format").unwrap(), Some(Value::Int(26)));
//! ```

mod error;
mod field;
mod lazy;
mod model;
mod path;
mod value;

pub use error::ModelError;
pub use field::{Field, FieldValue, ModelField};
pub use lazy::{Lazy, LazyCell};
pub use model::Model;
pub use path::Path;
pub use value::Value;

// Re-export the map type models are backed by.
pub use indexmap::IndexMap;
