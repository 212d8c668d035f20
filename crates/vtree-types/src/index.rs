//! Preorder indexing.
//!
//! The same numbering rule addresses nodes of a virtual tree (when patches
//! are computed) and of a host tree (when they are applied): depth-first,
//! each node before its children, children in order. Any divergence
//! between the two sides misapplies patches, so both go through
//! [`PreorderIndex`].

/// Position-addressed view of a tree in preorder.
///
/// Built with an explicit stack; the child enumeration callback decides
/// which nodes take part (a host may skip nodes of kinds the virtual tree
/// cannot describe, such as comments).
#[derive(Clone, Debug)]
pub struct PreorderIndex<N> {
    nodes: Vec<N>,
}

impl<N: Copy> PreorderIndex<N> {
    /// Index the tree under `root`. `children` returns the indexable
    /// children of a node, in order.
    pub fn build<F, I>(root: N, mut children: F) -> Self
    where
        F: FnMut(N) -> I,
        I: IntoIterator<Item = N>,
    {
        let result: Result<Self, std::convert::Infallible> =
            Self::try_build(root, |node| Ok(children(node)));
        match result {
            Ok(index) => index,
            Err(never) => match never {},
        }
    }

    /// Like [`build`](Self::build) for trees whose enumeration can fail.
    pub fn try_build<F, I, E>(root: N, mut children: F) -> Result<Self, E>
    where
        F: FnMut(N) -> Result<I, E>,
        I: IntoIterator<Item = N>,
    {
        let mut nodes = Vec::new();
        let mut stack = vec![root];
        let mut scratch = Vec::new();

        while let Some(node) = stack.pop() {
            nodes.push(node);
            scratch.extend(children(node)?);
            // Reverse so the first child is popped next.
            while let Some(child) = scratch.pop() {
                stack.push(child);
            }
        }

        Ok(Self { nodes })
    }

    /// The node at preorder position `index`.
    pub fn get(&self, index: usize) -> Option<N> {
        self.nodes.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(index, node)` pairs in preorder.
    pub fn iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.nodes.iter().copied().enumerate()
    }
}
