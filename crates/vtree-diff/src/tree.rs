//! Tree-level diff: walk two virtual trees in lockstep and collect a sparse
//! [`PatchMap`] addressed by the old tree's preorder index.
//!
//! The index of every position is passed down by value: a child at slot `i`
//! sits at `parent + 1 + sum(1 + count)` over the old siblings before it,
//! which is exactly the numbering [`VNode::preorder`] produces.

use tracing::debug;
use vtree_types::{VElement, VNode};

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::patch::{Patch, PatchMap};
use crate::props::diff_props;
use crate::reorder::{find_duplicate_key, reorder, Reordered};

/// Diff two trees with the default configuration.
pub fn diff(old: &VNode, new: &VNode) -> DiffResult<PatchMap> {
    diff_with_config(old, new, &DiffConfig::default())
}

/// Diff two trees.
///
/// Neither tree is modified. The result is empty when the trees are equal.
pub fn diff_with_config(old: &VNode, new: &VNode, config: &DiffConfig) -> DiffResult<PatchMap> {
    let mut differ = Differ {
        config,
        patches: PatchMap::new(),
    };
    differ.walk(old, Some(new), 0)?;

    let patches = differ.patches;
    debug!(
        old_nodes = old.count() + 1,
        positions = patches.len(),
        patches = patches.patch_count(),
        "diff complete"
    );
    Ok(patches)
}

struct Differ<'c> {
    config: &'c DiffConfig,
    patches: PatchMap,
}

impl Differ<'_> {
    fn walk(&mut self, old: &VNode, new: Option<&VNode>, index: usize) -> DiffResult<()> {
        let mut here = Vec::new();

        match new {
            None => here.push(Patch::Remove),
            Some(new) => match (old, new) {
                (VNode::Text(a), VNode::Text(b)) => {
                    if a.content != b.content {
                        here.push(Patch::Text {
                            content: b.content.clone(),
                        });
                    }
                }
                (VNode::Element(a), VNode::Element(b)) => {
                    self.walk_element(a, b, new, index, &mut here)?;
                }
                _ => here.push(Patch::Replace { node: new.clone() }),
            },
        }

        self.patches.extend(index, here);
        Ok(())
    }

    fn walk_element(
        &mut self,
        a: &VElement,
        b: &VElement,
        new: &VNode,
        index: usize,
        here: &mut Vec<Patch>,
    ) -> DiffResult<()> {
        if self.config.use_fingerprints && a.fingerprint() == b.fingerprint() {
            return Ok(());
        }

        if !a.same_identity(b) {
            here.push(Patch::Replace { node: new.clone() });
            return Ok(());
        }

        let ops = diff_props(a.props(), b.props());
        if !ops.is_empty() {
            here.push(Patch::Props { ops });
        }

        if self.children_are_opaque(b) {
            return Ok(());
        }
        self.walk_children(a.children(), b.children(), index, here)
    }

    fn children_are_opaque(&self, el: &VElement) -> bool {
        self.config
            .opaque_children_prop
            .as_deref()
            .is_some_and(|prop| el.props().contains_key(prop))
    }

    fn walk_children(
        &mut self,
        old: &[VNode],
        new: &[VNode],
        index: usize,
        here: &mut Vec<Patch>,
    ) -> DiffResult<()> {
        if self.config.check_duplicate_keys {
            for list in [old, new] {
                if let Some(key) = find_duplicate_key(list) {
                    return Err(DiffError::DuplicateKey {
                        key: key.clone(),
                        parent_index: index,
                    });
                }
            }
        }

        let Reordered {
            children: shuffle,
            moves,
        } = reorder(old, new);

        let mut child_index = index;
        for i in 0..old.len().max(shuffle.len()) {
            child_index += 1;
            let right = shuffle.get(i).copied().flatten();
            match old.get(i) {
                Some(left) => {
                    self.walk(left, right, child_index)?;
                    child_index += left.count();
                }
                None => {
                    if let Some(node) = right {
                        here.push(Patch::Insert { node: node.clone() });
                    }
                }
            }
        }

        if let Some(moves) = moves {
            here.push(Patch::Order { moves });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{MoveInsert, MoveRemove, PatchKind, PropOp};
    use vtree_types::{h, props, text, Key, PropValue, Props};

    fn el(tag: &str, children: Vec<VNode>) -> VNode {
        h(tag, Props::new(), children)
    }

    fn li(k: i32) -> VNode {
        h("li", props([("key", k)]), vec![text(format!("item {k}"))])
    }

    fn kinds(map: &PatchMap) -> Vec<(usize, PatchKind)> {
        map.iter()
            .flat_map(|(i, ps)| ps.iter().map(move |p| (i, p.kind())))
            .collect()
    }

    fn sample() -> VNode {
        h(
            "div",
            props([("id", "root")]),
            vec![
                el("p", vec![text("Virtual DOM")]),
                h("ul", props([("id", "list")]), vec![li(1), li(2), li(3)]),
                el("div", vec![text("Hello world")]),
            ],
        )
    }

    #[test]
    fn identical_trees_yield_nothing() {
        let tree = sample();
        assert!(diff(&tree, &tree).unwrap().is_empty());
        assert!(diff_with_config(&tree, &tree, &DiffConfig::exhaustive())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn float_props_are_idempotent_without_fingerprints() {
        let tree = h(
            "svg",
            props([("w", f64::NAN), ("h", -0.0)]),
            vec![h("rect", props([("x", 1.5)]), vec![])],
        );
        assert!(diff_with_config(&tree, &tree, &DiffConfig::exhaustive())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn text_change_lands_on_the_text_node() {
        let old = el("div", vec![el("p", vec![text("x")])]);
        let new = el("div", vec![el("p", vec![text("y")])]);

        let map = diff(&old, &new).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(2),
            Some(&[Patch::Text { content: "y".into() }][..])
        );
    }

    #[test]
    fn tag_mismatch_is_a_single_replace() {
        let children = vec![text("same"), el("b", vec![])];
        let old = el("div", children.clone());
        let new = el("span", children);

        let map = diff(&old, &new).unwrap();
        assert_eq!(kinds(&map), vec![(0, PatchKind::Replace)]);
    }

    #[test]
    fn key_mismatch_never_reuses_the_node() {
        let old = el("ul", vec![li(1)]);
        let new = el("ul", vec![li(2)]);

        // Both lists are keyed: 1 is deleted, 2 is appended.
        let map = diff(&old, &new).unwrap();
        assert_eq!(
            kinds(&map),
            vec![(0, PatchKind::Insert), (1, PatchKind::Remove)]
        );

        // At the root there is no list to reconcile.
        let map = diff(&li(1), &li(2)).unwrap();
        assert_eq!(kinds(&map), vec![(0, PatchKind::Replace)]);
    }

    #[test]
    fn one_sided_key_is_not_a_mismatch() {
        let old = h("li", props([("key", 1)]), vec![text("a")]);
        let new = h("li", Props::new(), vec![text("b")]);

        let map = diff(&old, &new).unwrap();
        assert_eq!(kinds(&map), vec![(1, PatchKind::Text)]);
    }

    #[test]
    fn text_against_element_is_a_replace() {
        let old = el("div", vec![text("a")]);
        let new = el("div", vec![el("b", vec![])]);

        let map = diff(&old, &new).unwrap();
        assert_eq!(kinds(&map), vec![(1, PatchKind::Replace)]);
    }

    #[test]
    fn keyed_rotation_is_a_single_order_patch() {
        let old = el("ul", vec![li(1), li(2), li(3)]);
        let new = el("ul", vec![li(3), li(1), li(2)]);

        let map = diff(&old, &new).unwrap();
        assert_eq!(map.len(), 1);
        match map.get(0) {
            Some([Patch::Order { moves }]) => {
                assert_eq!(moves.removes, vec![MoveRemove { from: 2, key: Some(Key::Num(3)) }]);
                assert_eq!(moves.inserts, vec![MoveInsert { key: Key::Num(3), to: 0 }]);
            }
            other => panic!("expected a single ORDER, got {other:?}"),
        }
    }

    #[test]
    fn pure_deletion_is_a_remove_without_order() {
        let old = el("ul", vec![li(1), li(2)]);
        let new = el("ul", vec![li(1)]);

        let map = diff(&old, &new).unwrap();
        // ul 0, li(1) 1, its text 2, li(2) 3
        assert_eq!(kinds(&map), vec![(3, PatchKind::Remove)]);
    }

    #[test]
    fn inserts_attach_to_the_parent_before_order() {
        let old = el("ul", vec![li(1), li(2)]);
        let new = el("ul", vec![li(0), li(1), li(2)]);

        let map = diff(&old, &new).unwrap();
        assert_eq!(
            kinds(&map),
            vec![(0, PatchKind::Insert), (0, PatchKind::Order)]
        );
    }

    #[test]
    fn unkeyed_children_pair_positionally() {
        let old = el("ul", vec![el("li", vec![text("a")]), el("li", vec![text("b")])]);
        let new = el(
            "ul",
            vec![
                el("li", vec![text("b")]),
                el("li", vec![text("a")]),
                el("li", vec![text("c")]),
            ],
        );

        let map = diff(&old, &new).unwrap();
        assert_eq!(
            kinds(&map),
            vec![(0, PatchKind::Insert), (2, PatchKind::Text), (4, PatchKind::Text)]
        );
    }

    #[test]
    fn props_and_children_patches_combine() {
        let old = h("div", props([("a", 1), ("b", 2)]), vec![text("x")]);
        let new = h("div", props([("a", 1), ("c", 3)]), vec![text("x"), text("y")]);

        let map = diff(&old, &new).unwrap();
        let at_root = map.get(0).unwrap();
        assert_eq!(at_root.len(), 2);
        match &at_root[0] {
            Patch::Props { ops } => {
                assert_eq!(ops.len(), 2);
                assert!(ops.contains(&PropOp::RemoveProp { key: "b".into() }));
                assert!(ops.contains(&PropOp::SetProp { key: "c".into(), value: PropValue::Int(3) }));
            }
            other => panic!("expected PROPS first, got {other:?}"),
        }
        assert_eq!(at_root[1], Patch::Insert { node: text("y") });
    }

    #[test]
    fn indices_skip_whole_subtrees() {
        let old = sample();
        let mut children = old.children().to_vec();
        children[2] = el("div", vec![text("Goodbye")]);
        let new = h("div", props([("id", "root")]), children);

        let map = diff(&old, &new).unwrap();
        // div 0, p 1, "Virtual DOM" 2, ul 3, li/text 4..9, div 10, text 11
        assert_eq!(kinds(&map), vec![(11, PatchKind::Text)]);
        assert_eq!(old.preorder().get(11).and_then(VNode::as_text), Some("Hello world"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let old = el("ul", vec![li(1), li(2)]);
        let new = el("ul", vec![li(2), li(2)]);

        match diff(&old, &new) {
            Err(DiffError::DuplicateKey { key, parent_index }) => {
                assert_eq!(key, Key::Num(2));
                assert_eq!(parent_index, 0);
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }

        // Unchecked, duplicate keys still produce some result.
        assert!(diff_with_config(&old, &new, &DiffConfig::exhaustive()).is_ok());
    }

    #[test]
    fn opaque_children_are_not_compared() {
        let config = DiffConfig::default().with_opaque_children_prop("ignore");
        let old = h("div", props([("ignore", true)]), vec![text("a")]);
        let new = h("div", props([("ignore", true)]), vec![text("b")]);

        assert!(diff_with_config(&old, &new, &config).unwrap().is_empty());
        assert_eq!(diff(&old, &new).unwrap().len(), 1);
    }

    #[test]
    fn fingerprints_only_skip_equal_subtrees() {
        let old = sample();
        let mut children = old.children().to_vec();
        children.swap(0, 2);
        let new = h("div", props([("id", "root")]), children);

        let fast = diff(&old, &new).unwrap();
        let slow = diff_with_config(&old, &new, &DiffConfig::exhaustive()).unwrap();
        assert_eq!(fast, slow);
        assert!(!fast.is_empty());
    }

    #[test]
    fn patch_indices_address_the_old_tree() {
        let old = sample();
        let new = h(
            "div",
            props([("id", "root")]),
            vec![
                el("p", vec![text("Real DOM")]),
                h("ul", props([("id", "list")]), vec![li(3), li(1)]),
                el("section", vec![]),
            ],
        );

        let map = diff(&old, &new).unwrap();
        let index = old.preorder();
        for (i, patches) in map.iter() {
            let node = index.get(i).expect("patch index inside the old tree");
            for patch in patches {
                match patch {
                    Patch::Text { .. } => assert!(node.is_text()),
                    Patch::Props { .. } | Patch::Order { .. } | Patch::Insert { .. } => {
                        assert!(node.is_element())
                    }
                    Patch::Remove | Patch::Replace { .. } => {}
                }
            }
        }
    }
}
