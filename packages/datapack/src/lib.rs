//! packforge datapack layer: assembling a pack from namespaced resources.
//!
//! Builds on the tree and model layers: a [`DataPack`] owns the virtual
//! tree, namespaces scope resource identifiers, and the builders
//! (functions, tags, recipes, item modifiers, trigger dispatch) attach
//! models and text leaves that render when the pack is written out.

mod command;
mod error;
mod functions;
mod item_modifiers;
mod namespaced;
mod pack;
mod recipes;
mod tags;

pub use command::{give, say, tell, Command, Target};
pub use error::PackError;
pub use functions::{FunctionDir, FunctionRef, TriggerGroup};
pub use item_modifiers::{ItemModifier, ItemModifiersDir};
pub use namespaced::{HookKind, HookWiring, Namespaced, SharedData};
pub use pack::{DataPack, NamespaceRoot, PackMeta};
pub use recipes::{Ingredient, RecipesDir, ShapedRecipe, ShapelessRecipe, StonecuttingRecipe};
pub use tags::{TagFile, TagKind, TagsDir};
