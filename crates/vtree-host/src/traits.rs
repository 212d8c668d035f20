//! The [`HostTree`] capability: the primitives a platform supplies so that
//! virtual trees can be materialized and patched onto it.

use std::fmt;
use std::hash::Hash;

use vtree_types::PropValue;

use crate::error::HostResult;

/// What a host node is, as far as preorder indexing is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostNodeKind {
    Element,
    Text,
    /// Anything a virtual tree cannot describe (comments, processing
    /// instructions, ...). Skipped by the indexer.
    Other,
}

/// A mutable tree owned by the surrounding platform.
///
/// Handles are cheap copies; the host owns the nodes. Attaching a node that
/// already has a parent (`append_child`, `insert_before`) moves it, as in
/// the DOM.
pub trait HostTree {
    /// Handle to a node of this host.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Create a detached text node.
    fn create_text(&mut self, content: &str) -> Self::Node;

    fn set_attribute(&mut self, node: Self::Node, key: &str, value: &PropValue) -> HostResult<()>;

    /// Removing an attribute that is not set is not an error.
    fn remove_attribute(&mut self, node: Self::Node, key: &str) -> HostResult<()>;

    /// Overwrite the payload of a text node.
    fn set_text(&mut self, node: Self::Node, content: &str) -> HostResult<()>;

    /// Attach `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node) -> HostResult<()>;

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node) -> HostResult<()>;

    /// Put `new` where `old` is attached and detach `old`.
    fn replace_child(
        &mut self,
        parent: Self::Node,
        old: Self::Node,
        new: Self::Node,
    ) -> HostResult<()>;

    /// Attach `node` before `reference`, or last when `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        node: Self::Node,
        reference: Option<Self::Node>,
    ) -> HostResult<()>;

    /// Children of `node` in stable order. Empty for non-elements.
    fn children(&self, node: Self::Node) -> HostResult<Vec<Self::Node>>;

    fn parent(&self, node: Self::Node) -> HostResult<Option<Self::Node>>;

    fn node_kind(&self, node: Self::Node) -> HostResult<HostNodeKind>;

    /// Children that take part in preorder indexing.
    fn indexable_children(&self, node: Self::Node) -> HostResult<Vec<Self::Node>> {
        let mut out = Vec::new();
        for child in self.children(node)? {
            if self.node_kind(child)? != HostNodeKind::Other {
                out.push(child);
            }
        }
        Ok(out)
    }
}
