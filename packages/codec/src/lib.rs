//! packforge codec layer: dual serialization of the value graph.
//!
//! The same in-memory tree renders as a JSON document (`pack.mcmeta`,
//! recipe and tag files) and as compound-tag text (the game's
//! string-encoded structured-data notation embedded in commands). The
//! codec is stateless: encoding the same graph twice yields identical
//! output, with mapping keys in insertion order.

mod error;
pub mod json;
pub mod tag;
mod text;

pub use error::CodecError;
pub use json::{model_to_json_string, to_json, to_json_string, JsonPolicy};
pub use tag::{model_to_tag_text, quote, to_tag_text};
pub use text::to_plain_text;
