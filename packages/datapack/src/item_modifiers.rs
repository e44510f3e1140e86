//! Item modifier documents.
//!
//! An item modifier is a JSON document applying a loot-table function to an
//! item (`minecraft:set_count`, `minecraft:set_nbt`, ...). Commands such as
//! `item modify` reference it by its `namespace:name` identifier.

use packforge_model::{Field, Model};
use packforge_tree::Tree;

use crate::PackError;

/// One item modifier document.
#[derive(Clone, Debug)]
pub struct ItemModifier {
    id: String,
    model: Model,
}

impl ItemModifier {
    const FUNCTION: Field<String> = Field::new("function");
    const COUNT: Field<i64> = Field::new("count");
    const ADD: Field<bool> = Field::new("add");

    fn new(id: String, model: Model) -> Self {
        ItemModifier { id, model }
    }

    /// The fully qualified `namespace:name` identifier, as referenced by
    /// `item modify` commands.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The loot function this modifier applies.
    pub fn function(&self, function: &str) -> Result<&Self, PackError> {
        Self::FUNCTION.set(&self.model, function.to_string())?;
        Ok(self)
    }

    pub fn count(&self, count: i64) -> Result<&Self, PackError> {
        Self::COUNT.set(&self.model, count)?;
        Ok(self)
    }

    /// Whether `count` adjusts the stack instead of replacing it.
    pub fn add(&self, add: bool) -> Result<&Self, PackError> {
        Self::ADD.set(&self.model, add)?;
        Ok(self)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

/// A namespace's `item_modifiers/` directory.
#[derive(Clone, Debug)]
pub struct ItemModifiersDir {
    namespace: String,
    tree: Tree,
}

impl ItemModifiersDir {
    pub fn new(namespace: impl Into<String>, tree: Tree) -> Self {
        ItemModifiersDir {
            namespace: namespace.into(),
            tree,
        }
    }

    /// Ensure the modifier `name`. Asking for the same name twice returns a
    /// handle onto the same document. `name` may contain slashes.
    pub fn modifier(&self, name: &str) -> Result<ItemModifier, PackError> {
        let model = self.tree.add_json(format!("{}.json", name), Model::new())?;
        Ok(ItemModifier::new(
            format!("{}:{}", self.namespace, name),
            model,
        ))
    }
}
