//! The data pack: manifest, `data/` root, namespace access.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use indexmap::IndexMap;

use packforge_model::{Field, Model, Path};
use packforge_tree::{Backend, MemoryBackend, OsBackend, Tree};

use crate::functions::FunctionDir;
use crate::item_modifiers::ItemModifiersDir;
use crate::namespaced::{HookWiring, Namespaced, SharedData};
use crate::recipes::RecipesDir;
use crate::tags::TagsDir;
use crate::PackError;

/// The `pack.mcmeta` manifest.
#[derive(Clone, Debug)]
pub struct PackMeta {
    model: Model,
}

impl PackMeta {
    const DESCRIPTION: Field<String> = Field::new("pack/description");
    const PACK_FORMAT: Field<i64> = Field::new("pack/pack_format");

    pub fn description(&self) -> Result<String, PackError> {
        Ok(Self::DESCRIPTION.get(&self.model)?)
    }

    pub fn set_description(&self, description: &str) -> Result<(), PackError> {
        Ok(Self::DESCRIPTION.set(&self.model, description.to_string())?)
    }

    pub fn pack_format(&self) -> Result<i64, PackError> {
        Ok(Self::PACK_FORMAT.get(&self.model)?)
    }

    pub fn set_pack_format(&self, format: i64) -> Result<(), PackError> {
        Ok(Self::PACK_FORMAT.set(&self.model, format)?)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

/// A whole data pack: the manifest plus a `data/` tree of namespaces.
///
/// # Example
///
/// ```rust
/// use packforge_datapack::{say, DataPack};
/// use packforge_tree::MemoryBackend;
///
/// let pack = DataPack::new("demo", 26).unwrap();
/// let ns = pack.namespace("demo").unwrap();
/// ns.functions().unwrap().create("hello").unwrap().push(say("hi"));
///
/// let mut backend = MemoryBackend::new();
/// pack.write_to(&mut backend).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct DataPack {
    root: Tree,
    data: Tree,
    meta: PackMeta,
    namespaces: Rc<RefCell<IndexMap<String, SharedData>>>,
}

impl DataPack {
    pub fn new(description: &str, pack_format: i64) -> Result<DataPack, PackError> {
        let root = Tree::new();
        let model = root.add_json("pack.mcmeta", Model::new())?;
        let meta = PackMeta { model };
        meta.set_description(description)?;
        meta.set_pack_format(pack_format)?;
        let data = root.dir("data")?;
        Ok(DataPack {
            root,
            data,
            meta,
            namespaces: Rc::new(RefCell::new(IndexMap::new())),
        })
    }

    pub fn meta(&self) -> &PackMeta {
        &self.meta
    }

    /// The whole pack tree, rooted above `pack.mcmeta`.
    pub fn tree(&self) -> &Tree {
        &self.root
    }

    /// The namespace `name` under `data/`. Handles for the same name share
    /// tree nodes and the hook/slot state, so a namespace can be set up
    /// from more than one call site without duplicating hook wiring.
    pub fn namespace(&self, name: &str) -> Result<NamespaceRoot, PackError> {
        let node = self.data.dir(name)?;
        let data = self
            .namespaces
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| SharedData::with_wiring(HookWiring::new(self.data.clone(), name)))
            .clone();
        Ok(NamespaceRoot {
            name: name.to_string(),
            ns: Namespaced::new(name, node, data),
        })
    }

    /// Render the pack into a backend.
    pub fn write_to(&self, backend: &mut dyn Backend) -> Result<(), PackError> {
        log::debug!("materializing pack '{}'", self.meta.description()?);
        Ok(self.root.materialize(backend)?)
    }

    /// Render the pack into a directory on disk.
    pub fn write_dir(&self, path: impl Into<PathBuf>) -> Result<(), PackError> {
        let mut backend = OsBackend::new(path);
        self.write_to(&mut backend)
    }

    /// Render into a fresh in-memory backend and return it, for snapshot
    /// assertions.
    pub fn write_memory(&self) -> Result<MemoryBackend, PackError> {
        let mut backend = MemoryBackend::new();
        self.write_to(&mut backend)?;
        Ok(backend)
    }
}

/// One namespace inside a pack.
#[derive(Clone, Debug)]
pub struct NamespaceRoot {
    name: String,
    ns: Namespaced,
}

impl NamespaceRoot {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fully qualified `namespace:id` identifier for a resource path.
    pub fn resource_id(&self, path: &str) -> String {
        format!("{}:{}", self.name, path)
    }

    /// The namespace's function directory. Function resource ids are
    /// relative to it: `functions/dir/f.mcfunction` is `namespace:dir/f`.
    pub fn functions(&self) -> Result<FunctionDir, PackError> {
        let tree = self.ns.tree().dir("functions")?;
        Ok(FunctionDir::new(Namespaced::new(
            self.name.clone(),
            tree,
            self.ns.data().clone(),
        )))
    }

    /// The namespace's registry tag directory.
    pub fn tags(&self) -> Result<TagsDir, PackError> {
        Ok(TagsDir::new(self.name.clone(), self.ns.tree().dir("tags")?))
    }

    /// The namespace's recipe directory.
    pub fn recipes(&self) -> Result<RecipesDir, PackError> {
        Ok(RecipesDir::new(self.ns.tree().dir("recipes")?))
    }

    /// The namespace's item modifier directory.
    pub fn item_modifiers(&self) -> Result<ItemModifiersDir, PackError> {
        Ok(ItemModifiersDir::new(
            self.name.clone(),
            self.ns.tree().dir("item_modifiers")?,
        ))
    }

    /// An arbitrary directory under the namespace, for resource kinds the
    /// builders do not cover.
    pub fn dir(&self, path: impl Into<Path>) -> Result<Tree, PackError> {
        Ok(self.ns.tree().dir(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::say;
    use packforge_model::Value;

    #[test]
    fn manifest_and_empty_data_root() {
        let pack = DataPack::new("desc", 26).unwrap();
        let snapshot = pack.write_memory().unwrap().snapshot();

        let expected = Model::new();
        expected
            .set(
                "pack.mcmeta",
                "{\"pack\": {\"description\": \"desc\", \"pack_format\": 26}}",
            )
            .unwrap();
        expected.submodel("data").unwrap();
        assert_eq!(snapshot, expected.dump());
    }

    #[test]
    fn meta_reads_back() {
        let pack = DataPack::new("desc", 26).unwrap();
        assert_eq!(pack.meta().description().unwrap(), "desc");
        assert_eq!(pack.meta().pack_format().unwrap(), 26);
    }

    #[test]
    fn namespace_ids_qualify() {
        let pack = DataPack::new("desc", 26).unwrap();
        let ns = pack.namespace("some_pack").unwrap();
        assert_eq!(ns.resource_id("dir/f1"), "some_pack:dir/f1");
    }

    #[test]
    fn namespaces_land_under_data() {
        let pack = DataPack::new("desc", 26).unwrap();
        let ns = pack.namespace("some_pack").unwrap();
        ns.functions().unwrap();

        let snapshot = pack.write_memory().unwrap().snapshot();
        let snap = Model::from_value(snapshot);
        assert_eq!(
            snap.get("data/some_pack/functions").unwrap(),
            Some(Value::map())
        );
    }

    #[test]
    fn repeated_namespace_handles_share_hook_state() {
        let pack = DataPack::new("desc", 26).unwrap();
        pack.namespace("ns")
            .unwrap()
            .functions()
            .unwrap()
            .on_load("say first")
            .unwrap();
        pack.namespace("ns")
            .unwrap()
            .functions()
            .unwrap()
            .on_load("say second")
            .unwrap();

        let snap = Model::from_value(pack.write_memory().unwrap().snapshot());
        // Both lines land in one hook function, registered once.
        assert_eq!(
            snap.get("data/ns/functions/load.mcfunction").unwrap(),
            Some(Value::from("# function load\nsay first\nsay second\n"))
        );
        assert_eq!(
            snap.get("data/minecraft/tags/functions/load.json").unwrap(),
            Some(Value::from("{\"values\": [\"ns:load\"]}"))
        );
    }

    #[test]
    fn item_modifiers_land_under_the_namespace() {
        let pack = DataPack::new("desc", 26).unwrap();
        let ns = pack.namespace("ns").unwrap();
        let modifier = ns.item_modifiers().unwrap().modifier("double").unwrap();
        modifier
            .function("minecraft:set_count")
            .unwrap()
            .count(2)
            .unwrap();

        assert_eq!(modifier.id(), "ns:double");

        let snap = Model::from_value(pack.write_memory().unwrap().snapshot());
        assert_eq!(
            snap.get("data/ns/item_modifiers/double.json").unwrap(),
            Some(Value::from(
                "{\"function\": \"minecraft:set_count\", \"count\": 2}"
            ))
        );
    }

    #[test]
    fn write_dir_renders_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let pack = DataPack::new("desc", 26).unwrap();
        pack.namespace("ns")
            .unwrap()
            .functions()
            .unwrap()
            .create("hello")
            .unwrap()
            .push(say("hi"));

        pack.write_dir(dir.path()).unwrap();

        let body =
            std::fs::read_to_string(dir.path().join("data/ns/functions/hello.mcfunction")).unwrap();
        assert_eq!(body, "# function hello\nsay hi\n");
        assert!(dir.path().join("pack.mcmeta").is_file());
    }
}
