//! Keyed child-list reconciliation.
//!
//! Given an old and a new child list, [`reorder`] produces a *shuffle*: one
//! slot per old child, holding the new child that takes over that old
//! child's host node (`None` when the old child goes away), followed by new
//! children that have no old counterpart. The tree differ pairs `old[i]`
//! with `shuffle[i]`, so matched children are diffed structurally instead
//! of being recreated.
//!
//! When the shuffle order differs from the new order, [`Moves`] describe
//! how to turn the host child list (old children plus appended inserts)
//! into the new order by extracting children and reinserting them by key.
//!
//! Cost is linear when most children keep their relative order; heavily
//! interleaved moves degrade toward quadratic because of the extraction
//! on the simulated list.

use std::collections::HashMap;

use tracing::trace;
use vtree_types::{Key, VNode};

use crate::patch::{MoveInsert, MoveRemove, Moves};

/// Result of reconciling two child lists.
#[derive(Clone, Debug, PartialEq)]
pub struct Reordered<'a> {
    /// New children laid out in old-list order; `None` marks a deletion.
    pub children: Vec<Option<&'a VNode>>,
    /// Reordering to apply to the host children, if any.
    pub moves: Option<Moves>,
}

/// Keyed children by key, and the positions of unkeyed ("free") children.
struct KeyIndex<'a> {
    keys: HashMap<&'a Key, usize>,
    free: Vec<usize>,
}

impl<'a> KeyIndex<'a> {
    fn build(children: &'a [VNode]) -> Self {
        let mut keys = HashMap::new();
        let mut free = Vec::new();
        for (i, child) in children.iter().enumerate() {
            match child.key() {
                Some(key) => {
                    keys.insert(key, i);
                }
                None => free.push(i),
            }
        }
        Self { keys, free }
    }

    fn all_free(&self, len: usize) -> bool {
        self.free.len() == len
    }
}

/// The first key that appears twice in `children`, if any.
pub fn find_duplicate_key(children: &[VNode]) -> Option<&Key> {
    let mut seen = std::collections::HashSet::new();
    children
        .iter()
        .filter_map(VNode::key)
        .find(|key| !seen.insert(*key))
}

/// Reconcile `old` against `new`.
///
/// If either list has no keys at all, there is nothing to reorder by and the
/// new list is returned as-is for positional pairing.
pub fn reorder<'a>(old: &'a [VNode], new: &'a [VNode]) -> Reordered<'a> {
    let new_index = KeyIndex::build(new);
    if new_index.all_free(new.len()) {
        return positional(new);
    }

    let old_index = KeyIndex::build(old);
    if old_index.all_free(old.len()) {
        return positional(new);
    }

    let mut shuffle: Vec<Option<&'a VNode>> = Vec::with_capacity(old.len().max(new.len()));
    let mut free_cursor = 0;
    let mut deleted = 0;

    // Claim a new child for each old child, in old order.
    for old_child in old {
        match old_child.key() {
            Some(key) => match new_index.keys.get(key) {
                Some(&at) => shuffle.push(Some(&new[at])),
                None => {
                    deleted += 1;
                    shuffle.push(None);
                }
            },
            None => match new_index.free.get(free_cursor) {
                Some(&at) => {
                    free_cursor += 1;
                    shuffle.push(Some(&new[at]));
                }
                None => {
                    deleted += 1;
                    shuffle.push(None);
                }
            },
        }
    }

    // Append new keyed children and leftover free children.
    let first_unclaimed_free = new_index.free.get(free_cursor).copied().unwrap_or(new.len());
    for (j, new_child) in new.iter().enumerate() {
        match new_child.key() {
            Some(key) => {
                if !old_index.keys.contains_key(key) {
                    shuffle.push(Some(new_child));
                }
            }
            None => {
                if j >= first_unclaimed_free {
                    shuffle.push(Some(new_child));
                }
            }
        }
    }

    let moves = converge(&shuffle, new, &new_index);
    trace!(
        old = old.len(),
        new = new.len(),
        deleted,
        removes = moves.removes.len(),
        inserts = moves.inserts.len(),
        "reconciled keyed children"
    );

    if moves.removes.len() == deleted && moves.inserts.is_empty() {
        // Only deletions: the per-child REMOVE patches are enough.
        return Reordered {
            children: shuffle,
            moves: None,
        };
    }

    Reordered {
        children: shuffle,
        moves: Some(moves),
    }
}

fn positional(new: &[VNode]) -> Reordered<'_> {
    Reordered {
        children: new.iter().map(Some).collect(),
        moves: None,
    }
}

/// Simulate turning `shuffle` into `new`, recording the moves.
fn converge(shuffle: &[Option<&VNode>], new: &[VNode], new_index: &KeyIndex<'_>) -> Moves {
    let mut simulate: Vec<Option<&VNode>> = shuffle.to_vec();
    let mut cursor = 0;
    let mut removes = Vec::new();
    let mut inserts = Vec::new();

    let mut k = 0;
    while k < new.len() {
        let wanted = &new[k];

        while matches!(simulate.get(cursor), Some(None)) {
            removes.push(extract(&mut simulate, cursor, None));
        }

        let current = simulate.get(cursor).copied().flatten();
        let current_key = current.and_then(VNode::key);

        if current.is_some() && current_key == wanted.key() {
            cursor += 1;
            k += 1;
            continue;
        }

        match wanted.key() {
            Some(wanted_key) => {
                match current_key {
                    // The child under the cursor belongs right after `k`:
                    // inserting the wanted one in front lines it up.
                    Some(key) if new_index.keys.get(key) == Some(&(k + 1)) => {
                        inserts.push(MoveInsert {
                            key: wanted_key.clone(),
                            to: k,
                        });
                    }
                    Some(key) => {
                        let key = key.clone();
                        removes.push(extract(&mut simulate, cursor, Some(key)));
                        let aligned = matches!(
                            simulate.get(cursor),
                            Some(Some(next)) if next.key() == Some(wanted_key)
                        );
                        if aligned {
                            cursor += 1;
                        } else {
                            inserts.push(MoveInsert {
                                key: wanted_key.clone(),
                                to: k,
                            });
                        }
                    }
                    None => {
                        inserts.push(MoveInsert {
                            key: wanted_key.clone(),
                            to: k,
                        });
                    }
                }
                k += 1;
            }
            None => match current_key {
                // A keyed child sits where a free one is wanted.
                Some(key) => {
                    let key = key.clone();
                    removes.push(extract(&mut simulate, cursor, Some(key)));
                }
                // Every free child of `new` is in `simulate` and only keyed
                // or deleted slots are ever extracted ahead of the cursor, so
                // the simulation cannot run dry here.
                None => break,
            },
        }
    }

    while cursor < simulate.len() {
        let key = simulate[cursor].and_then(VNode::key).cloned();
        removes.push(extract(&mut simulate, cursor, key));
    }

    Moves { removes, inserts }
}

fn extract(simulate: &mut Vec<Option<&VNode>>, index: usize, key: Option<Key>) -> MoveRemove {
    simulate.remove(index);
    MoveRemove { from: index, key }
}
