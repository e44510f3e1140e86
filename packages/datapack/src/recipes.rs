//! Recipe documents.
//!
//! Thin model wrappers over the game's recipe JSON formats. Only the
//! structural shape is enforced; identifiers are passed through untouched.

use indexmap::IndexMap;
use packforge_model::{Field, Model, Value};
use packforge_tree::Tree;

use crate::tags::TagFile;
use crate::PackError;

/// An ingredient slot: a concrete item or a tag of acceptable items.
#[derive(Clone, Debug)]
pub enum Ingredient {
    Item(String),
    Tag(String),
}

impl Ingredient {
    pub fn item(id: impl Into<String>) -> Self {
        Ingredient::Item(id.into())
    }

    pub fn tag(tag: &TagFile) -> Self {
        Ingredient::Tag(tag.id().to_string())
    }

    fn into_value(self) -> Value {
        let mut map = IndexMap::new();
        match self {
            Ingredient::Item(id) => map.insert("item".to_string(), Value::from(id)),
            Ingredient::Tag(id) => map.insert("tag".to_string(), Value::from(id)),
        };
        Value::Map(map)
    }
}

const TYPE: Field<String> = Field::new("type");
const CATEGORY: Field<String> = Field::new("category");
const GROUP: Field<String> = Field::new("group");

fn recipe_model(recipe_type: &str) -> Result<Model, PackError> {
    let model = Model::new();
    TYPE.set(&model, recipe_type.to_string())?;
    Ok(model)
}

fn result_value(item: &str, count: i64) -> Value {
    let mut map = IndexMap::new();
    map.insert("item".to_string(), Value::from(item));
    map.insert("count".to_string(), Value::Int(count));
    Value::Map(map)
}

macro_rules! recipe_common {
    () => {
        /// The crafting-book category.
        pub fn category(&self, category: &str) -> Result<&Self, PackError> {
            CATEGORY.set(&self.model, category.to_string())?;
            Ok(self)
        }

        /// The crafting-book group this recipe collapses under.
        pub fn group(&self, group: &str) -> Result<&Self, PackError> {
            GROUP.set(&self.model, group.to_string())?;
            Ok(self)
        }

        pub fn model(&self) -> &Model {
            &self.model
        }
    };
}

/// A `minecraft:crafting_shaped` recipe.
#[derive(Clone, Debug)]
pub struct ShapedRecipe {
    model: Model,
}

impl ShapedRecipe {
    recipe_common!();

    /// The grid rows, one string per row, one symbol per cell.
    pub fn pattern<S: Into<Value>>(
        &self,
        rows: impl IntoIterator<Item = S>,
    ) -> Result<&Self, PackError> {
        let rows: Vec<Value> = rows.into_iter().map(Into::into).collect();
        self.model.set("pattern", Value::Array(rows))?;
        Ok(self)
    }

    /// Bind a pattern symbol to an ingredient.
    pub fn key(&self, symbol: char, ingredient: Ingredient) -> Result<&Self, PackError> {
        self.model
            .set(format!("key/{}", symbol), ingredient.into_value())?;
        Ok(self)
    }

    pub fn result(&self, item: &str, count: i64) -> Result<&Self, PackError> {
        self.model.set("result", result_value(item, count))?;
        Ok(self)
    }
}

/// A `minecraft:crafting_shapeless` recipe.
#[derive(Clone, Debug)]
pub struct ShapelessRecipe {
    model: Model,
}

impl ShapelessRecipe {
    recipe_common!();

    /// Append an ingredient.
    pub fn ingredient(&self, ingredient: Ingredient) -> Result<&Self, PackError> {
        self.model.push("ingredients", ingredient.into_value())?;
        Ok(self)
    }

    pub fn result(&self, item: &str, count: i64) -> Result<&Self, PackError> {
        self.model.set("result", result_value(item, count))?;
        Ok(self)
    }
}

/// A `minecraft:stonecutting` recipe. The result is flat: the item id and
/// count sit at the top level rather than in a result mapping.
#[derive(Clone, Debug)]
pub struct StonecuttingRecipe {
    model: Model,
}

impl StonecuttingRecipe {
    recipe_common!();

    pub fn ingredient(&self, ingredient: Ingredient) -> Result<&Self, PackError> {
        self.model.set("ingredient", ingredient.into_value())?;
        Ok(self)
    }

    pub fn result(&self, item: &str, count: i64) -> Result<&Self, PackError> {
        self.model.set("result", item)?;
        self.model.set("count", count)?;
        Ok(self)
    }
}

/// A namespace's `recipes/` directory.
#[derive(Clone, Debug)]
pub struct RecipesDir {
    tree: Tree,
}

impl RecipesDir {
    pub fn new(tree: Tree) -> Self {
        RecipesDir { tree }
    }

    fn attach(&self, name: &str, recipe_type: &str) -> Result<Model, PackError> {
        let model = recipe_model(recipe_type)?;
        Ok(self.tree.add_json(format!("{}.json", name), model)?)
    }

    pub fn shaped(&self, name: &str) -> Result<ShapedRecipe, PackError> {
        Ok(ShapedRecipe {
            model: self.attach(name, "minecraft:crafting_shaped")?,
        })
    }

    pub fn shapeless(&self, name: &str) -> Result<ShapelessRecipe, PackError> {
        Ok(ShapelessRecipe {
            model: self.attach(name, "minecraft:crafting_shapeless")?,
        })
    }

    pub fn stonecutting(&self, name: &str) -> Result<StonecuttingRecipe, PackError> {
        Ok(StonecuttingRecipe {
            model: self.attach(name, "minecraft:stonecutting")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packforge_codec::{model_to_json_string, JsonPolicy};
    use packforge_tree::MemoryBackend;

    #[test]
    fn shaped_recipe_shape() {
        let recipes = RecipesDir::new(Tree::new());
        let recipe = recipes.shaped("sword").unwrap();
        recipe
            .pattern(["#", "#", "|"])
            .unwrap()
            .key('#', Ingredient::item("minecraft:diamond"))
            .unwrap()
            .key('|', Ingredient::item("minecraft:stick"))
            .unwrap()
            .result("minecraft:diamond_sword", 1)
            .unwrap();

        let text = model_to_json_string(recipe.model(), &JsonPolicy::compact()).unwrap();
        assert_eq!(
            text,
            "{\"type\": \"minecraft:crafting_shaped\", \
             \"pattern\": [\"#\", \"#\", \"|\"], \
             \"key\": {\"#\": {\"item\": \"minecraft:diamond\"}, \"|\": {\"item\": \"minecraft:stick\"}}, \
             \"result\": {\"item\": \"minecraft:diamond_sword\", \"count\": 1}}"
        );
    }

    #[test]
    fn shapeless_ingredients_accumulate() {
        let recipes = RecipesDir::new(Tree::new());
        let recipe = recipes.shapeless("mix").unwrap();
        recipe
            .ingredient(Ingredient::item("minecraft:sand"))
            .unwrap()
            .ingredient(Ingredient::item("minecraft:gravel"))
            .unwrap()
            .result("minecraft:concrete_powder", 8)
            .unwrap();

        assert_eq!(
            recipe.model().get("ingredients").unwrap(),
            Some(Value::Array(vec![
                Ingredient::item("minecraft:sand").into_value(),
                Ingredient::item("minecraft:gravel").into_value(),
            ]))
        );
    }

    #[test]
    fn stonecutting_result_is_flat() {
        let recipes = RecipesDir::new(Tree::new());
        let recipe = recipes.stonecutting("slab").unwrap();
        recipe
            .ingredient(Ingredient::item("minecraft:stone"))
            .unwrap()
            .result("minecraft:stone_slab", 2)
            .unwrap();

        let text = model_to_json_string(recipe.model(), &JsonPolicy::compact()).unwrap();
        assert_eq!(
            text,
            "{\"type\": \"minecraft:stonecutting\", \
             \"ingredient\": {\"item\": \"minecraft:stone\"}, \
             \"result\": \"minecraft:stone_slab\", \"count\": 2}"
        );
    }

    #[test]
    fn tag_ingredients_reference_the_tag() {
        let recipes = RecipesDir::new(Tree::new());
        let tags = crate::tags::TagsDir::new("ns", Tree::new());
        let planks = tags.items("planks").unwrap();

        let recipe = recipes.shapeless("sticks").unwrap();
        recipe.ingredient(Ingredient::tag(&planks)).unwrap();

        assert_eq!(
            recipe.model().get("ingredients").unwrap(),
            Some(Value::Array(vec![Ingredient::Tag(
                "ns:planks".to_string()
            )
            .into_value()]))
        );
    }

    #[test]
    fn recipe_lands_in_the_directory() {
        let dir_tree = Tree::new();
        let recipes = RecipesDir::new(dir_tree.clone());
        recipes
            .shaped("sword")
            .unwrap()
            .result("minecraft:diamond_sword", 1)
            .unwrap();

        let mut backend = MemoryBackend::new();
        dir_tree.materialize(&mut backend).unwrap();
        let snap = Model::from_value(backend.snapshot());
        assert!(snap.get("sword.json").unwrap().is_some());
    }
}
