//! Error types for the diff crate.

use vtree_types::Key;

/// Errors that can occur while computing or decoding patches.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Two siblings share a key. Keys must be unique within one child list.
    #[error("duplicate key `{key}` among children of node {parent_index}")]
    DuplicateKey { key: Key, parent_index: usize },

    /// A serialized patch names a kind outside the patch vocabulary.
    #[error("unknown patch kind {kind:?} at index {index}")]
    UnknownPatchKind { index: String, kind: String },

    /// A serialized patch map does not have the expected shape.
    #[error("malformed patch map: {0}")]
    Malformed(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
