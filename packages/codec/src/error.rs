//! Error types for the codec layer.

/// Errors raised while encoding a value graph.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value cannot be represented in the target notation.
    #[error("unsupported value kind '{kind}' for {target} encoding")]
    UnsupportedValueKind {
        kind: &'static str,
        target: &'static str,
    },

    /// serde_json failed to serialize.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_kind_and_target() {
        let e = CodecError::UnsupportedValueKind {
            kind: "bytes",
            target: "json",
        };
        let shown = e.to_string();
        assert!(shown.contains("bytes"));
        assert!(shown.contains("json"));
    }
}
