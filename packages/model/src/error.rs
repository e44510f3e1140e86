//! Error types for the model layer.

/// Errors raised by model and field access.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Walked into something that is not a mapping.
    #[error("not a model: value at '{path}' is {kind}, expected a mapping")]
    NotAModel { path: String, kind: &'static str },

    /// A typed field read or dynamic write rejected the value.
    #[error("cast error at '{path}': expected {expected}, got {actual}")]
    Cast {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = ModelError::NotAModel {
            path: "a/b".to_string(),
            kind: "int",
        };
        assert!(e.to_string().contains("a/b"));
        assert!(e.to_string().contains("int"));

        let e = ModelError::Cast {
            path: "x".to_string(),
            expected: "string",
            actual: "map",
        };
        assert!(e.to_string().contains("expected string"));
    }
}
