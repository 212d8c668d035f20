//! Apply a [`PatchMap`] to a live host tree.
//!
//! Every patched position is resolved against a preorder index of the host
//! tree taken before the first mutation, so later patches still find their
//! nodes after earlier ones have moved, removed or replaced things.
//! Positions are visited in ascending order, which puts an `ORDER` on a
//! parent ahead of any patch on its children.

use std::collections::HashMap;

use tracing::{debug, trace};
use vtree_diff::{Moves, Patch, PatchMap, PropOp};
use vtree_types::{Key, PreorderIndex};

use crate::error::{PatchError, PatchResult};
use crate::render::render;
use crate::traits::HostTree;

/// Apply `patches` to the host tree rooted at `root`.
///
/// Returns the root after patching: a `REPLACE` at index 0 on a root
/// without a parent hands back the freshly rendered node. Application
/// stops at the first error and earlier mutations are kept.
pub fn apply<H: HostTree>(host: &mut H, root: H::Node, patches: &PatchMap) -> PatchResult<H::Node> {
    if patches.is_empty() {
        return Ok(root);
    }

    let index = PreorderIndex::try_build(root, |node| host.indexable_children(node))?;
    debug!(
        host_nodes = index.len(),
        positions = patches.len(),
        "applying patches"
    );

    let mut current_root = root;
    for (position, list) in patches.iter() {
        let node = index
            .get(position)
            .ok_or(PatchError::MissingNode { index: position })?;
        for patch in list {
            trace!(index = position, kind = %patch.kind(), "patch");
            if let Some(replacement) = apply_one(host, node, position, node == root, patch)? {
                if node == root {
                    current_root = replacement;
                }
            }
        }
    }

    Ok(current_root)
}

/// Apply one patch to `node`. Returns the replacement node for `REPLACE`.
fn apply_one<H: HostTree>(
    host: &mut H,
    node: H::Node,
    index: usize,
    is_root: bool,
    patch: &Patch,
) -> PatchResult<Option<H::Node>> {
    match patch {
        Patch::Insert { node: vnode } => {
            let child = render(host, vnode)?;
            host.append_child(node, child)?;
        }
        Patch::Remove => {
            // Already detached by an earlier ORDER on the parent.
            if let Some(parent) = host.parent(node)? {
                host.remove_child(parent, node)?;
            }
        }
        Patch::Replace { node: vnode } => {
            let replacement = render(host, vnode)?;
            match host.parent(node)? {
                Some(parent) => host.replace_child(parent, node, replacement)?,
                None if is_root => {}
                None => {
                    return Err(PatchError::Detached {
                        index,
                        kind: patch.kind(),
                    })
                }
            }
            return Ok(Some(replacement));
        }
        Patch::Text { content } => host.set_text(node, content)?,
        Patch::Props { ops } => {
            for op in ops {
                match op {
                    PropOp::SetProp { key, value } => host.set_attribute(node, key, value)?,
                    PropOp::RemoveProp { key } => host.remove_attribute(node, key)?,
                }
            }
        }
        Patch::Order { moves } => reorder_children(host, node, index, moves)?,
    }
    Ok(None)
}

/// Run the removes of `moves` against the live child list, keeping keyed
/// nodes aside, then put them back at their target positions.
fn reorder_children<H: HostTree>(
    host: &mut H,
    parent: H::Node,
    index: usize,
    moves: &Moves,
) -> PatchResult<()> {
    let mut extracted: HashMap<&Key, H::Node> = HashMap::new();

    for remove in &moves.removes {
        let children = host.indexable_children(parent)?;
        let child = *children
            .get(remove.from)
            .ok_or(PatchError::MoveOutOfRange {
                index,
                from: remove.from,
            })?;
        if let Some(key) = &remove.key {
            extracted.insert(key, child);
        }
        host.remove_child(parent, child)?;
    }

    for insert in &moves.inserts {
        let child = extracted
            .remove(&insert.key)
            .ok_or_else(|| PatchError::MissingMoveSource {
                index,
                key: insert.key.clone(),
            })?;
        let children = host.indexable_children(parent)?;
        host.insert_before(parent, child, children.get(insert.to).copied())?;
    }

    Ok(())
}
