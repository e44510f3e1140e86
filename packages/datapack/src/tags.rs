//! Registry tag documents.
//!
//! A tag is a JSON document listing resource identifiers under a registry
//! (`items`, `blocks`, `functions`, ...). Tags can reference other tags
//! with a `#` prefix.

use packforge_model::{Field, Model, Value};
use packforge_tree::Tree;

use crate::PackError;

/// The registries a tag can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Blocks,
    EntityTypes,
    Fluids,
    Functions,
    GameEvents,
    Items,
}

impl TagKind {
    /// The registry's directory name under `tags/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            TagKind::Blocks => "blocks",
            TagKind::EntityTypes => "entity_types",
            TagKind::Fluids => "fluids",
            TagKind::Functions => "functions",
            TagKind::GameEvents => "game_events",
            TagKind::Items => "items",
        }
    }
}

/// One tag document.
#[derive(Clone, Debug)]
pub struct TagFile {
    id: String,
    model: Model,
}

impl TagFile {
    const REPLACE: Field<bool> = Field::new("replace");
    const VALUES: Field<Vec<Value>> = Field::with_default("values", Value::array);

    fn new(id: String, model: Model) -> Self {
        TagFile { id, model }
    }

    /// The fully qualified `namespace:name` identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The identifier used when another tag references this one.
    pub fn tag_id(&self) -> String {
        format!("#{}", self.id)
    }

    /// Append a resource identifier to the tag's values.
    pub fn add(&self, value: impl Into<Value>) -> Result<&Self, PackError> {
        self.model.push(Self::VALUES.path(), value)?;
        Ok(self)
    }

    /// The values listed so far. An untouched tag reads as an empty list.
    pub fn values(&self) -> Result<Vec<Value>, PackError> {
        Ok(Self::VALUES.get(&self.model)?)
    }

    /// Append a reference to another tag (`#namespace:name`).
    pub fn add_tag(&self, other: &TagFile) -> Result<&Self, PackError> {
        self.add(other.tag_id())
    }

    /// Whether this tag replaces lower-priority tags with the same id.
    pub fn set_replace(&self, replace: bool) -> Result<&Self, PackError> {
        Self::REPLACE.set(&self.model, replace)?;
        Ok(self)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

/// A namespace's `tags/` directory.
#[derive(Clone, Debug)]
pub struct TagsDir {
    namespace: String,
    tree: Tree,
}

impl TagsDir {
    pub fn new(namespace: impl Into<String>, tree: Tree) -> Self {
        TagsDir {
            namespace: namespace.into(),
            tree,
        }
    }

    /// Ensure the tag `name` under the registry `kind`. Asking for the
    /// same tag twice returns a handle onto the same document.
    pub fn tag(&self, kind: TagKind, name: &str) -> Result<TagFile, PackError> {
        let dir = self.tree.dir(kind.dir_name())?;
        let model = dir.add_json(format!("{}.json", name), Model::new())?;
        Ok(TagFile::new(format!("{}:{}", self.namespace, name), model))
    }

    pub fn blocks(&self, name: &str) -> Result<TagFile, PackError> {
        self.tag(TagKind::Blocks, name)
    }

    pub fn entity_types(&self, name: &str) -> Result<TagFile, PackError> {
        self.tag(TagKind::EntityTypes, name)
    }

    pub fn fluids(&self, name: &str) -> Result<TagFile, PackError> {
        self.tag(TagKind::Fluids, name)
    }

    pub fn functions(&self, name: &str) -> Result<TagFile, PackError> {
        self.tag(TagKind::Functions, name)
    }

    pub fn game_events(&self, name: &str) -> Result<TagFile, PackError> {
        self.tag(TagKind::GameEvents, name)
    }

    pub fn items(&self, name: &str) -> Result<TagFile, PackError> {
        self.tag(TagKind::Items, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packforge_tree::MemoryBackend;

    #[test]
    fn tag_documents_list_values() {
        let tags = TagsDir::new("some_pack", Tree::new());
        let swords = tags.items("swords").unwrap();
        swords.add("minecraft:diamond_sword").unwrap();
        swords.add("minecraft:iron_sword").unwrap();

        assert_eq!(swords.id(), "some_pack:swords");
        assert_eq!(swords.tag_id(), "#some_pack:swords");

        let mut backend = MemoryBackend::new();
        tags.tree.materialize(&mut backend).unwrap();
        let expected = Model::new();
        expected
            .set(
                "items/swords.json",
                "{\"values\": [\"minecraft:diamond_sword\", \"minecraft:iron_sword\"]}",
            )
            .unwrap();
        assert_eq!(backend.snapshot(), expected.dump());
    }

    #[test]
    fn same_tag_twice_is_one_document() {
        let tags = TagsDir::new("ns", Tree::new());
        tags.functions("hooks").unwrap().add("ns:a").unwrap();
        tags.functions("hooks").unwrap().add("ns:b").unwrap();

        let again = tags.functions("hooks").unwrap();
        assert_eq!(
            again.model().get("values").unwrap(),
            Some(Value::from(vec![Value::from("ns:a"), Value::from("ns:b")]))
        );
    }

    #[test]
    fn tag_references_carry_the_hash_prefix() {
        let tags = TagsDir::new("ns", Tree::new());
        let metals = tags.items("metals").unwrap();
        let all = tags.items("all").unwrap();
        all.add_tag(&metals).unwrap();

        assert_eq!(
            all.model().get("values").unwrap(),
            Some(Value::from(vec![Value::from("#ns:metals")]))
        );
    }

    #[test]
    fn replace_is_explicit() {
        let tags = TagsDir::new("ns", Tree::new());
        let tag = tags.blocks("ores").unwrap();
        tag.set_replace(true).unwrap();
        assert_eq!(tag.model().get("replace").unwrap(), Some(Value::Bool(true)));
    }
}
