//! JSON encoding of the value graph.

use std::io;

use serde::Serialize;
use serde_json::value::Value as JsonValue;

use packforge_model::{Model, Value};

use crate::CodecError;

/// How JSON text is laid out.
///
/// Backends carry a policy so the same tree can be dumped compact for
/// snapshot tests and indented for files a human will open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonPolicy {
    /// Spaces per indentation level; `None` is the compact form.
    pub indent: Option<usize>,
    /// Escape non-ASCII characters as `\uXXXX`. Off by default so text
    /// round-trips unchanged.
    pub escape_non_ascii: bool,
}

impl JsonPolicy {
    /// Single-line output with `", "` and `": "` separators.
    pub const fn compact() -> Self {
        JsonPolicy {
            indent: None,
            escape_non_ascii: false,
        }
    }

    /// Indented output with `n` spaces per level.
    pub const fn indented(n: usize) -> Self {
        JsonPolicy {
            indent: Some(n),
            escape_non_ascii: false,
        }
    }

    /// Same layout, with non-ASCII text escaped.
    #[must_use]
    pub const fn ascii(mut self) -> Self {
        self.escape_non_ascii = true;
        self
    }
}

impl Default for JsonPolicy {
    fn default() -> Self {
        JsonPolicy::compact()
    }
}

/// Convert a value graph to a JSON-compatible structure.
///
/// Lazy values are resolved at this point; mapping key order is preserved
/// (serde_json is built with `preserve_order`). `Bytes` and non-finite
/// floats have no JSON representation and fail with
/// [`CodecError::UnsupportedValueKind`].
pub fn to_json(value: &Value) -> Result<JsonValue, CodecError> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Byte(n) => Ok(JsonValue::from(*n as i64)),
        Value::Short(n) => Ok(JsonValue::from(*n as i64)),
        Value::Int(n) | Value::Long(n) => Ok(JsonValue::from(*n)),
        Value::Float(x) => finite_number(*x as f64),
        Value::Double(x) => finite_number(*x),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Bytes(_) => Err(CodecError::UnsupportedValueKind {
            kind: "bytes",
            target: "json",
        }),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(to_json(item)?);
            }
            Ok(JsonValue::Array(out))
        }
        Value::Map(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                out.insert(key.clone(), to_json(val)?);
            }
            Ok(JsonValue::Object(out))
        }
        Value::Lazy(lazy) => to_json(&lazy.resolve()),
    }
}

fn finite_number(x: f64) -> Result<JsonValue, CodecError> {
    serde_json::Number::from_f64(x)
        .map(JsonValue::Number)
        .ok_or(CodecError::UnsupportedValueKind {
            kind: "non-finite float",
            target: "json",
        })
}

// Single-line layout keeping a space after `,` and `:` (`{"a": 1, "b": 2}`),
// the separators the game's own generated files use.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Encode a value graph as JSON text under the given policy.
pub fn to_json_string(value: &Value, policy: &JsonPolicy) -> Result<String, CodecError> {
    let json = to_json(value)?;
    let text = match policy.indent {
        None => {
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
            json.serialize(&mut ser)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
        Some(n) => {
            let indent = " ".repeat(n);
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            json.serialize(&mut ser)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };
    if policy.escape_non_ascii {
        Ok(escape_non_ascii(&text))
    } else {
        Ok(text)
    }
}

/// Encode a model's mapped subtree as JSON text.
pub fn model_to_json_string(model: &Model, policy: &JsonPolicy) -> Result<String, CodecError> {
    to_json_string(&model.dump(), policy)
}

// Outside of string literals JSON text is pure ASCII, so escaping every
// non-ASCII character in the encoded output is safe.
fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use packforge_model::LazyCell;

    fn sample() -> Model {
        let model = Model::new();
        model.set("pack/description", "desc").unwrap();
        model.set("pack/pack_format", 26i64).unwrap();
        model
    }

    #[test]
    fn compact_output() {
        let text = model_to_json_string(&sample(), &JsonPolicy::compact()).unwrap();
        assert_eq!(text, r#"{"pack": {"description": "desc", "pack_format": 26}}"#);
    }

    #[test]
    fn compact_separators_keep_their_space() {
        let model = Model::new();
        model.set("a", 1i64).unwrap();
        model.set("b", vec![1i64, 2]).unwrap();
        let text = model_to_json_string(&model, &JsonPolicy::compact()).unwrap();
        assert_eq!(text, r#"{"a": 1, "b": [1, 2]}"#);
    }

    #[test]
    fn indented_output() {
        let model = Model::new();
        model.set("a", 1i64).unwrap();
        let text = model_to_json_string(&model, &JsonPolicy::indented(4)).unwrap();
        assert_eq!(text, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn key_order_is_insertion_order() {
        let model = Model::new();
        model.set("zulu", 1i64).unwrap();
        model.set("alpha", 2i64).unwrap();
        let text = model_to_json_string(&model, &JsonPolicy::compact()).unwrap();
        assert_eq!(text, r#"{"zulu": 1, "alpha": 2}"#);
    }

    #[test]
    fn non_ascii_roundtrips_by_default() {
        let text = to_json_string(&Value::from("héllo"), &JsonPolicy::compact()).unwrap();
        assert_eq!(text, "\"héllo\"");
    }

    #[test]
    fn ascii_mode_escapes() {
        let policy = JsonPolicy::compact().ascii();
        let text = to_json_string(&Value::from("héllo"), &policy).unwrap();
        assert_eq!(text, "\"h\\u00e9llo\"");
    }

    #[test]
    fn ascii_mode_escapes_supplementary_plane() {
        let policy = JsonPolicy::compact().ascii();
        let text = to_json_string(&Value::from("🎮"), &policy).unwrap();
        assert_eq!(text, "\"\\ud83c\\udfae\"");
    }

    #[test]
    fn lazy_resolved_at_encode_time() {
        let cell = LazyCell::new("pending");
        let value = Value::Lazy(cell.lazy());
        cell.set("done");
        let text = to_json_string(&value, &JsonPolicy::compact()).unwrap();
        assert_eq!(text, "\"done\"");
    }

    #[test]
    fn bytes_rejected() {
        let err = to_json(&Value::bytes(vec![1u8, 2])).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedValueKind { kind: "bytes", .. }
        ));
    }

    #[test]
    fn non_finite_float_rejected() {
        let err = to_json(&Value::Double(f64::NAN)).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedValueKind { .. }));
    }

    #[test]
    fn widths_flatten_to_numbers() {
        let value = Value::Array(vec![Value::Byte(3), Value::Short(4), Value::Long(5)]);
        let text = to_json_string(&value, &JsonPolicy::compact()).unwrap();
        assert_eq!(text, "[3, 4, 5]");
    }

    #[test]
    fn encoding_is_referentially_transparent() {
        let model = sample();
        let a = model_to_json_string(&model, &JsonPolicy::indented(2)).unwrap();
        let b = model_to_json_string(&model, &JsonPolicy::indented(2)).unwrap();
        assert_eq!(a, b);
    }
}
