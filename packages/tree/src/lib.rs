//! packforge tree layer: a virtual directory tree and its backends.
//!
//! A pack is assembled as an in-memory tree of branches and leaves first,
//! then materialized in one pass into a [`Backend`]. Leaves hold live
//! models and lazy text spans, so everything added to the tree can keep
//! changing right up until materialization.
//!
//! # Design Notes
//!
//! Node handles are reference-counted. Asking for the same path twice
//! returns the same node, which is what makes incremental assembly work:
//! one piece of code creates `data/ns/functions` and another appends a
//! file into it without either knowing about the other.

mod backend;
mod error;
mod node;

pub use backend::{Backend, FileMode, MemoryBackend, OsBackend};
pub use error::TreeError;
pub use node::{materialize_node, Branch, Leaf, Node, NodeKind, NodeRef, TextLeaf, Tree};
