//! Compound-tag text encoding.
//!
//! The bracketed, quoted notation the game's command interpreter reads for
//! structured data (`{Unbreakable: 1b, Enchantments: [{id: "minecraft:sharpness",
//! lvl: 10}]}`). The text is embedded inside commands and JSON strings, so
//! quoting and escaping here must be exact: the consumer does not tolerate
//! malformed tokens.

use packforge_model::{Model, Value};

use crate::CodecError;

/// Encode a value graph as compound-tag text.
///
/// Integers carry their width suffix (`3b`, `3s`, `3`, `3l`), booleans
/// encode as `1b`/`0b`, mapping keys stay in insertion order and are
/// quoted only when they contain reserved characters. `Null` has no tag
/// representation and fails with [`CodecError::UnsupportedValueKind`].
pub fn to_tag_text(value: &Value) -> Result<String, CodecError> {
    let mut out = String::new();
    write_tag(&mut out, value)?;
    Ok(out)
}

/// Encode a model's mapped subtree as compound-tag text.
pub fn model_to_tag_text(model: &Model) -> Result<String, CodecError> {
    to_tag_text(&model.dump())
}

fn write_tag(out: &mut String, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Null => {
            return Err(CodecError::UnsupportedValueKind {
                kind: "null",
                target: "tag text",
            });
        }
        Value::Bool(b) => out.push_str(if *b { "1b" } else { "0b" }),
        Value::Byte(n) => {
            out.push_str(&n.to_string());
            out.push('b');
        }
        Value::Short(n) => {
            out.push_str(&n.to_string());
            out.push('s');
        }
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Long(n) => {
            out.push_str(&n.to_string());
            out.push('l');
        }
        Value::Float(x) => {
            out.push_str(&format!("{:?}", x));
            out.push('f');
        }
        Value::Double(x) => {
            out.push_str(&format!("{:?}", x));
            out.push('d');
        }
        Value::String(s) => out.push_str(&quote(s)),
        Value::Bytes(data) => {
            out.push_str("[B; ");
            for (i, byte) in data.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&byte.to_string());
                out.push('b');
            }
            out.push(']');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_tag(out, item)?;
            }
            out.push(']');
        }
        Value::Map(map) => {
            out.push('{');
            for (i, (key, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if is_bare_key(key) {
                    out.push_str(key);
                } else {
                    out.push_str(&quote(key));
                }
                out.push_str(": ");
                write_tag(out, val)?;
            }
            out.push('}');
        }
        Value::Lazy(lazy) => write_tag(out, &lazy.resolve())?,
    }
    Ok(())
}

/// Double-quote a string, escaping backslashes and embedded double quotes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}
