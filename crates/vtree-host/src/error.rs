//! Error types for host trees and patch application.

use vtree_diff::PatchKind;
use vtree_types::Key;

/// Errors raised by a [`HostTree`](crate::HostTree) primitive.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HostError {
    /// The node handle does not belong to this host.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The operation needs an element (attributes, children).
    #[error("node {0} is not an element")]
    NotAnElement(String),

    /// The operation needs a text node.
    #[error("node {0} is not a text node")]
    NotText(String),

    /// `child` is not currently a child of `parent`.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: String, child: String },
}

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors from applying a patch map to a host tree.
///
/// Application stops at the first error. Mutations already performed for
/// earlier indices stay in place.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The host tree has fewer indexable nodes than the patch map addresses.
    #[error("no host node at preorder index {index}")]
    MissingNode { index: usize },

    /// A non-root node that needs a parent for this patch has none.
    #[error("node at index {index} is detached; cannot apply {kind}")]
    Detached { index: usize, kind: PatchKind },

    /// An ORDER remove points past the end of the live child list.
    #[error("ORDER at index {index} removes position {from}, past the last child")]
    MoveOutOfRange { index: usize, from: usize },

    /// An ORDER insert names a key no remove extracted.
    #[error("ORDER at index {index} inserts key `{key}` that was never extracted")]
    MissingMoveSource { index: usize, key: Key },

    /// A host primitive failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Result alias for patch application.
pub type PatchResult<T> = Result<T, PatchError>;
