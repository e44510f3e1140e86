//! The virtual tree mirroring the eventual output directory layout.
//!
//! Nodes are held behind `Rc<RefCell<_>>` handles so the same logical path
//! can be touched from several code locations: `ensure` hands back the
//! existing node instead of creating a duplicate, and a handle kept from an
//! earlier call keeps appending to the same leaf.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use packforge_codec as codec;
use packforge_model::{Model, Path, Value};

use crate::{Backend, FileMode, TreeError};

/// Shared handle to a tree node.
pub type NodeRef = Rc<RefCell<Node>>;

/// What kind of node occupies a path. Used for mismatch errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Branch,
    Json,
    Text,
    Bytes,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Branch => "branch",
            NodeKind::Json => "json leaf",
            NodeKind::Text => "text leaf",
            NodeKind::Bytes => "bytes leaf",
        };
        write!(f, "{}", name)
    }
}

/// A directory-to-be or a single renderable file payload.
#[derive(Debug)]
pub enum Node {
    Branch(Branch),
    Leaf(Leaf),
}

impl Node {
    /// A fresh empty branch node.
    pub fn branch() -> Node {
        Node::Branch(Branch::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Branch(_) => NodeKind::Branch,
            Node::Leaf(Leaf::Json(_)) => NodeKind::Json,
            Node::Leaf(Leaf::Text { .. }) => NodeKind::Text,
            Node::Leaf(Leaf::Bytes(_)) => NodeKind::Bytes,
        }
    }
}

/// An inner node owning its children, keyed by relative path segment.
#[derive(Debug, Default)]
pub struct Branch {
    children: IndexMap<String, NodeRef>,
}

impl Branch {
    pub fn new() -> Self {
        Branch {
            children: IndexMap::new(),
        }
    }

    /// Iterate children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &NodeRef)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return the child at `segment`, creating it with `factory` when
    /// absent. An existing child of a different kind is a
    /// [`TreeError::NodeKindMismatch`]; it is never rebuilt or widened.
    fn ensure_child(
        &mut self,
        segment: &str,
        at: &Path,
        kind: NodeKind,
        factory: impl FnOnce() -> Node,
    ) -> Result<NodeRef, TreeError> {
        if let Some(existing) = self.children.get(segment) {
            let existing_kind = existing.borrow().kind();
            if existing_kind != kind {
                return Err(TreeError::NodeKindMismatch {
                    path: at.to_string(),
                    existing: existing_kind,
                    requested: kind,
                });
            }
            return Ok(Rc::clone(existing));
        }
        let node = Rc::new(RefCell::new(factory()));
        self.children.insert(segment.to_string(), Rc::clone(&node));
        Ok(node)
    }
}

/// A renderable file payload.
#[derive(Debug)]
pub enum Leaf {
    /// A model rendered as a JSON document under the backend's policy.
    Json(Model),
    /// Text spans rendered and concatenated verbatim. Spans may be lazy
    /// values resolved at materialization time.
    Text { spans: Vec<Value> },
    /// Raw binary content.
    Bytes(Vec<u8>),
}

/// A handle to a branch node, the main tree-building API.
///
/// Cloning a `Tree` clones the handle, not the branch.
///
/// # Example
///
/// ```rust
/// use packforge_tree::{MemoryBackend, Tree};
/// use packforge_model::Model;
///
/// let tree = Tree::new();
/// let model = Model::new();
/// model.set("a", 1i64).unwrap();
/// tree.add_json("x/y.json", model).unwrap();
///
/// let mut backend = MemoryBackend::new();
/// tree.materialize(&mut backend).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Tree {
    node: NodeRef,
}

impl Tree {
    /// A new empty root branch.
    pub fn new() -> Self {
        Tree {
            node: Rc::new(RefCell::new(Node::branch())),
        }
    }

    /// The underlying node handle.
    pub fn node(&self) -> NodeRef {
        Rc::clone(&self.node)
    }

    /// Return the node at `path`, creating it with `factory` when absent.
    ///
    /// Intermediate branches are created lazily; the factory runs at most
    /// once, and only when the terminal node is absent. A node of a
    /// different kind anywhere along the way fails with
    /// [`TreeError::NodeKindMismatch`].
    pub fn ensure(
        &self,
        path: impl Into<Path>,
        kind: NodeKind,
        factory: impl FnOnce() -> Node,
    ) -> Result<NodeRef, TreeError> {
        let path = path.into();
        let (parents, last) = path.split_last().ok_or(TreeError::EmptyPath)?;

        let mut current = Rc::clone(&self.node);
        let mut walked = Path::root();
        for segment in parents.iter() {
            walked.push(segment);
            let next = {
                let mut node = current.borrow_mut();
                match &mut *node {
                    Node::Branch(branch) => {
                        branch.ensure_child(segment, &walked, NodeKind::Branch, Node::branch)?
                    }
                    leaf => {
                        return Err(TreeError::NodeKindMismatch {
                            path: walked.to_string(),
                            existing: leaf.kind(),
                            requested: NodeKind::Branch,
                        });
                    }
                }
            };
            current = next;
        }

        walked.push(last);
        let mut node = current.borrow_mut();
        match &mut *node {
            Node::Branch(branch) => branch.ensure_child(last, &walked, kind, factory),
            leaf => Err(TreeError::NodeKindMismatch {
                path: walked.to_string(),
                existing: leaf.kind(),
                requested: kind,
            }),
        }
    }

    /// The sub-branch at `path`, created when absent. The empty path is
    /// this branch itself.
    pub fn dir(&self, path: impl Into<Path>) -> Result<Tree, TreeError> {
        let path = path.into();
        if path.is_empty() {
            return Ok(self.clone());
        }
        let node = self.ensure(path, NodeKind::Branch, Node::branch)?;
        Ok(Tree { node })
    }

    /// The text leaf at `path`, created empty when absent.
    pub fn text(&self, path: impl Into<Path>) -> Result<TextLeaf, TreeError> {
        let node = self.ensure(path, NodeKind::Text, || {
            Node::Leaf(Leaf::Text { spans: Vec::new() })
        })?;
        Ok(TextLeaf { node })
    }

    /// Attach `model` as a JSON leaf at `path`.
    ///
    /// Returns the leaf's model — when the leaf already exists this is the
    /// model attached first, so repeated calls keep feeding one document.
    pub fn add_json(&self, path: impl Into<Path>, model: Model) -> Result<Model, TreeError> {
        let path = path.into();
        let node = self.ensure(&path, NodeKind::Json, move || Node::Leaf(Leaf::Json(model)))?;
        let node = node.borrow();
        match &*node {
            Node::Leaf(Leaf::Json(attached)) => Ok(attached.clone()),
            other => Err(TreeError::NodeKindMismatch {
                path: path.to_string(),
                existing: other.kind(),
                requested: NodeKind::Json,
            }),
        }
    }

    /// Attach raw binary content at `path`.
    pub fn add_bytes(&self, path: impl Into<Path>, data: Vec<u8>) -> Result<NodeRef, TreeError> {
        self.ensure(path, NodeKind::Bytes, move || Node::Leaf(Leaf::Bytes(data)))
    }

    /// Render this branch into the backend, depth-first.
    pub fn materialize(&self, backend: &mut dyn Backend) -> Result<(), TreeError> {
        materialize_node(&self.node, &Path::root(), backend)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

/// A handle to a text leaf.
#[derive(Clone, Debug)]
pub struct TextLeaf {
    node: NodeRef,
}

impl TextLeaf {
    /// Append a span rendered verbatim at materialization time.
    pub fn append(&self, span: impl Into<Value>) {
        if let Node::Leaf(Leaf::Text { spans }) = &mut *self.node.borrow_mut() {
            spans.push(span.into());
        }
    }

    /// Append a span followed by a newline.
    pub fn push_line(&self, span: impl Into<Value>) {
        self.append(span);
        self.append("\n");
    }

    /// True when nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        match &*self.node.borrow() {
            Node::Leaf(Leaf::Text { spans }) => spans.is_empty(),
            _ => false,
        }
    }
}

/// Render a node at `rel` into the backend.
///
/// A branch asks the backend for a directory (idempotent) and recurses
/// with a backend rebased there; a leaf renders its payload through the
/// codec and streams it out. The stream is opened, written, and closed
/// within this call; a failure propagates immediately and aborts the
/// remaining walk with no rollback.
pub fn materialize_node(
    node: &NodeRef,
    rel: &Path,
    backend: &mut dyn Backend,
) -> Result<(), TreeError> {
    enum Rendered {
        Text(String),
        Binary(Vec<u8>),
    }

    let borrowed = node.borrow();
    match &*borrowed {
        Node::Branch(branch) => {
            let mut sub = backend.mkdir(rel)?;
            for (segment, child) in branch.children() {
                materialize_node(child, &Path::parse(segment), sub.as_mut())?;
            }
            Ok(())
        }
        Node::Leaf(leaf) => {
            log::trace!("rendering leaf at {}", rel);
            let rendered = match leaf {
                Leaf::Json(model) => Rendered::Text(codec::to_json_string(
                    &model.dump(),
                    &backend.json_policy(),
                )?),
                Leaf::Text { spans } => {
                    let mut out = String::new();
                    for span in spans {
                        out.push_str(&codec::to_plain_text(span)?);
                    }
                    Rendered::Text(out)
                }
                Leaf::Bytes(data) => Rendered::Binary(data.clone()),
            };
            drop(borrowed);

            match rendered {
                Rendered::Text(text) => {
                    let mut file = backend.open(rel, FileMode::Text)?;
                    file.write_all(text.as_bytes())
                        .and_then(|_| file.flush())
                        .map_err(|e| TreeError::io(rel, e))?;
                }
                Rendered::Binary(data) => {
                    let mut file = backend.open(rel, FileMode::Binary)?;
                    file.write_all(&data)
                        .and_then(|_| file.flush())
                        .map_err(|e| TreeError::io(rel, e))?;
                }
            }
            Ok(())
        }
    }
}
