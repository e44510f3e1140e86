//! Namespace-scoped tree nodes and their shared cross-cutting state.
//!
//! Everything under one namespace shares a single [`SharedData`] handle:
//! the on-load/on-tick hook functions, the trigger objective, the claimed
//! dispatch slots. `dir` descends while keeping the handle shared, `fork`
//! produces a sibling view over the same tree nodes with the state shared
//! or copied.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use packforge_model::Path;
use packforge_tree::Tree;

use crate::functions::{create_function, FunctionRef};
use crate::tags::{TagKind, TagsDir};
use crate::PackError;

/// Which pack lifecycle hook a function is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    Load,
    Tick,
}

impl HookKind {
    pub fn name(self) -> &'static str {
        match self {
            HookKind::Load => "load",
            HookKind::Tick => "tick",
        }
    }
}

/// Where hook functions are created and registered: the pack's `data/`
/// branch plus the owning namespace. Kept in [`SharedData`] so any
/// descendant directory can wire a hook without knowing the pack.
#[derive(Clone, Debug)]
pub struct HookWiring {
    data_root: Tree,
    namespace: String,
}

impl HookWiring {
    pub fn new(data_root: Tree, namespace: impl Into<String>) -> Self {
        HookWiring {
            data_root,
            namespace: namespace.into(),
        }
    }

    /// Create the hook function under the namespace's function root and
    /// register it in the game's `minecraft:load` / `minecraft:tick`
    /// function tag.
    fn create_hook(&self, kind: HookKind) -> Result<FunctionRef, PackError> {
        let functions_root = self
            .data_root
            .dir(format!("{}/functions", self.namespace))?;
        let func = create_function(&functions_root, &self.namespace, &Path::root(), kind.name())?;

        let minecraft = TagsDir::new("minecraft", self.data_root.dir("minecraft/tags")?);
        minecraft.tag(TagKind::Functions, kind.name())?.add(func.id())?;
        log::debug!("wired {} hook {}", kind.name(), func.id());
        Ok(func)
    }
}

#[derive(Debug, Default)]
struct DataEntries {
    objective: Option<String>,
    slots: IndexMap<i64, String>,
    max_slot: i64,
    load: Option<FunctionRef>,
    tick: Option<FunctionRef>,
    wiring: Option<HookWiring>,
}

/// The associated-data mapping shared across a namespace's directories.
///
/// Clones share the same state. [`SharedData::fork`] is the explicit copy
/// point: handles inside the state (functions, tree nodes) stay shared, the
/// entries themselves do not.
#[derive(Clone, Debug, Default)]
pub struct SharedData {
    inner: Rc<RefCell<DataEntries>>,
}

impl SharedData {
    pub fn new() -> Self {
        SharedData::default()
    }

    pub fn with_wiring(wiring: HookWiring) -> Self {
        let data = SharedData::new();
        data.inner.borrow_mut().wiring = Some(wiring);
        data
    }

    /// A shallow copy: same function/tree handles, independent entries.
    pub fn fork(&self) -> SharedData {
        let inner = self.inner.borrow();
        SharedData {
            inner: Rc::new(RefCell::new(DataEntries {
                objective: inner.objective.clone(),
                slots: inner.slots.clone(),
                max_slot: inner.max_slot,
                load: inner.load.clone(),
                tick: inner.tick.clone(),
                wiring: inner.wiring.clone(),
            })),
        }
    }

    /// The trigger objective, required once dispatch slots are claimed.
    pub fn objective(&self) -> Result<String, PackError> {
        self.inner
            .borrow()
            .objective
            .clone()
            .ok_or(PackError::MissingRequiredKey { key: "objective" })
    }

    pub fn set_objective(&self, name: impl Into<String>) {
        self.inner.borrow_mut().objective = Some(name.into());
    }

    /// Claim a dispatch slot for the function with resource id `id`.
    ///
    /// An explicit slot already claimed is a [`PackError::DuplicateSlot`];
    /// `None` auto-increments past the highest slot claimed so far.
    pub fn claim_slot(&self, explicit: Option<i64>, id: &str) -> Result<i64, PackError> {
        let objective = self.objective()?;
        let mut inner = self.inner.borrow_mut();
        let slot = match explicit {
            Some(slot) => {
                if inner.slots.contains_key(&slot) {
                    return Err(PackError::DuplicateSlot { objective, slot });
                }
                slot
            }
            None => inner.max_slot + 1,
        };
        inner.slots.insert(slot, id.to_string());
        inner.max_slot = inner.max_slot.max(slot);
        Ok(slot)
    }

    /// The claimed slots in claim order.
    pub fn slots(&self) -> Vec<(i64, String)> {
        self.inner
            .borrow()
            .slots
            .iter()
            .map(|(slot, id)| (*slot, id.clone()))
            .collect()
    }

    /// The hook function for `kind`, created and tag-registered on first
    /// use. Fails with [`PackError::MissingRequiredKey`] when the data was
    /// never wired to a pack.
    pub fn hook(&self, kind: HookKind) -> Result<FunctionRef, PackError> {
        let (existing, wiring) = {
            let inner = self.inner.borrow();
            let existing = match kind {
                HookKind::Load => inner.load.clone(),
                HookKind::Tick => inner.tick.clone(),
            };
            (existing, inner.wiring.clone())
        };
        if let Some(func) = existing {
            return Ok(func);
        }
        let wiring = wiring.ok_or(PackError::MissingRequiredKey { key: "hook wiring" })?;
        let func = wiring.create_hook(kind)?;
        let mut inner = self.inner.borrow_mut();
        match kind {
            HookKind::Load => inner.load = Some(func.clone()),
            HookKind::Tick => inner.tick = Some(func.clone()),
        }
        Ok(func)
    }
}

/// A tree branch scoped by a namespace and a prefix.
///
/// The prefix is the resource-path accumulated by `dir` descents; the
/// namespace only qualifies resource identifiers, it never affects file
/// placement under this node.
#[derive(Clone, Debug)]
pub struct Namespaced {
    namespace: String,
    prefix: Path,
    data: SharedData,
    node: Tree,
}

impl Namespaced {
    pub fn new(namespace: impl Into<String>, node: Tree, data: SharedData) -> Self {
        Namespaced {
            namespace: namespace.into(),
            prefix: Path::root(),
            data,
            node,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<Path>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn data(&self) -> &SharedData {
        &self.data
    }

    pub fn tree(&self) -> &Tree {
        &self.node
    }

    /// The resource path of `name` under this node's prefix.
    pub fn id(&self, name: &str) -> String {
        self.prefix.join(name).to_string()
    }

    /// The fully qualified `namespace:prefix/name` identifier.
    pub fn resource_id(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, self.id(name))
    }

    /// Descend one or more levels: prefix extended, data shared, tree node
    /// ensured under this node.
    pub fn dir(&self, path: impl Into<Path>) -> Result<Namespaced, PackError> {
        let path = path.into();
        Ok(Namespaced {
            namespace: self.namespace.clone(),
            prefix: self.prefix.join(&path),
            data: self.data.clone(),
            node: self.node.dir(path)?,
        })
    }

    /// A sibling view over the same tree node. With `copy` the data
    /// entries are shallow-copied so the fork claims its own slots; without
    /// it the handle is shared.
    pub fn fork(&self, copy: bool) -> Namespaced {
        Namespaced {
            namespace: self.namespace.clone(),
            prefix: self.prefix.clone(),
            data: if copy { self.data.fork() } else { self.data.clone() },
            node: self.node.clone(),
        }
    }
}
