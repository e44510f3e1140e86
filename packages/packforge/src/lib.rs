//! packforge: a code-first builder for Minecraft data packs.
//!
//! A pack is composed as ordinary values: models bound to paths, function
//! files collecting command lines, tags and recipes as thin builders. The
//! whole thing lives in a virtual tree until one `write` call renders it
//! into a directory on disk or an in-memory map for tests.
//!
//! The layers, leaves first:
//!
//! - [`model`] — path-addressable value binding: [`Model`], [`Field`]
//!   lenses, deferred [`Lazy`] values.
//! - [`codec`] — the same value graph rendered as JSON or as the game's
//!   compound-tag text.
//! - [`tree`] — branches, leaves, backends, materialization.
//! - [`datapack`] — namespaces, functions, tags, recipes, item modifiers,
//!   trigger dispatch.

pub use packforge_codec as codec;
pub use packforge_datapack as datapack;
pub use packforge_model as model;
pub use packforge_tree as tree;

pub use packforge_codec::{to_plain_text, to_tag_text, JsonPolicy};
pub use packforge_datapack::{
    give, say, tell, Command, DataPack, FunctionDir, FunctionRef, Ingredient, ItemModifier,
    ItemModifiersDir, NamespaceRoot, PackError, RecipesDir, TagFile, TagKind, TagsDir, Target,
    TriggerGroup,
};
pub use packforge_model::{Field, Lazy, LazyCell, Model, ModelField, Path, Value};
pub use packforge_tree::{Backend, MemoryBackend, OsBackend, Tree};
