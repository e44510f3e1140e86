//! Error types for the tree layer.

use packforge_codec::CodecError;
use packforge_model::ModelError;

use crate::NodeKind;

/// Errors raised while building or materializing the virtual tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A path is already occupied by a node of an incompatible kind.
    #[error("node kind mismatch at '{path}': existing {existing}, requested {requested}")]
    NodeKindMismatch {
        path: String,
        existing: NodeKind,
        requested: NodeKind,
    },

    /// An operation that needs at least one path segment got none.
    #[error("empty path")]
    EmptyPath,

    /// Model access failed while rendering a leaf.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Encoding a leaf payload failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A backend directory or file operation failed.
    #[error("io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    pub(crate) fn io(path: impl ToString, source: std::io::Error) -> Self {
        TreeError::Io {
            path: path.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display() {
        let e = TreeError::NodeKindMismatch {
            path: "data/fn".to_string(),
            existing: NodeKind::Text,
            requested: NodeKind::Branch,
        };
        let shown = e.to_string();
        assert!(shown.contains("data/fn"));
        assert!(shown.contains("text"));
        assert!(shown.contains("branch"));
    }
}
