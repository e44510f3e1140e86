//! Error types for pack assembly.

use packforge_codec::CodecError;
use packforge_model::ModelError;
use packforge_tree::TreeError;

/// Errors raised while assembling a data pack.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// Two dispatch entries claimed the same trigger slot.
    #[error("duplicate dispatch slot {slot} on objective '{objective}'")]
    DuplicateSlot { objective: String, slot: i64 },

    /// A derived accessor needs a key that was never set.
    #[error("missing required key '{key}'")]
    MissingRequiredKey { key: &'static str },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
