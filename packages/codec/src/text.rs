//! Plain-text rendering for command lines.
//!
//! A command line is a sequence of parts joined by spaces, where a part may
//! be literal text, a number, a lazily-resolved forward reference, or a
//! structured payload rendered inline as compound-tag text
//! (`give @s diamond_sword{Unbreakable: 1b}` style).

use packforge_model::Value;

use crate::{tag, CodecError};

/// Render a value as raw command text.
///
/// Strings are unquoted, integers are bare digits, sequences become their
/// space-joined parts, mappings (and byte blobs) render as compound-tag
/// text, and lazy values are resolved first. `Null` fails with
/// [`CodecError::UnsupportedValueKind`].
pub fn to_plain_text(value: &Value) -> Result<String, CodecError> {
    match value {
        Value::Null => Err(CodecError::UnsupportedValueKind {
            kind: "null",
            target: "plain text",
        }),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Byte(n) => Ok(n.to_string()),
        Value::Short(n) => Ok(n.to_string()),
        Value::Int(n) | Value::Long(n) => Ok(n.to_string()),
        Value::Float(x) => Ok(format!("{:?}", x)),
        Value::Double(x) => Ok(format!("{:?}", x)),
        Value::String(s) => Ok(s.clone()),
        Value::Bytes(_) | Value::Map(_) => tag::to_tag_text(value),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(to_plain_text(item)?);
            }
            Ok(parts.join(" "))
        }
        Value::Lazy(lazy) => to_plain_text(&lazy.resolve()),
    }
}
