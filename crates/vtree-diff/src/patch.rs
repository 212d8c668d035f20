//! The patch vocabulary and the sparse [`PatchMap`].
//!
//! Patches are addressed by the preorder index of the old virtual tree.
//! A single position can carry several patches (for example `PROPS`,
//! `INSERT` and `ORDER` on the same parent); their order is the order of
//! application.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vtree_types::{Key, PropValue, VNode};

use crate::error::{DiffError, DiffResult};

/// A single mutation at one preorder position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Patch {
    /// Materialize `node` and append it to the children of this position.
    Insert { node: VNode },
    /// Detach the node at this position.
    Remove,
    /// Swap the node at this position for a freshly materialized `node`.
    Replace { node: VNode },
    /// Overwrite the text payload.
    Text { content: String },
    /// Attribute delta.
    Props { ops: Vec<PropOp> },
    /// Reorder the children of this position.
    Order { moves: Moves },
}

impl Patch {
    pub fn kind(&self) -> PatchKind {
        match self {
            Patch::Insert { .. } => PatchKind::Insert,
            Patch::Remove => PatchKind::Remove,
            Patch::Replace { .. } => PatchKind::Replace,
            Patch::Text { .. } => PatchKind::Text,
            Patch::Props { .. } => PatchKind::Props,
            Patch::Order { .. } => PatchKind::Order,
        }
    }
}

/// Discriminant of a [`Patch`], with its wire name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchKind {
    Insert,
    Remove,
    Replace,
    Text,
    Props,
    Order,
}

impl PatchKind {
    pub const ALL: [PatchKind; 6] = [
        PatchKind::Insert,
        PatchKind::Remove,
        PatchKind::Replace,
        PatchKind::Text,
        PatchKind::Props,
        PatchKind::Order,
    ];

    /// The `kind` tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchKind::Insert => "INSERT",
            PatchKind::Remove => "REMOVE",
            PatchKind::Replace => "REPLACE",
            PatchKind::Text => "TEXT",
            PatchKind::Props => "PROPS",
            PatchKind::Order => "ORDER",
        }
    }

    pub fn from_wire(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute operation inside a `PROPS` patch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropOp {
    SetProp { key: String, value: PropValue },
    RemoveProp { key: String },
}

/// Child moves carried by an `ORDER` patch.
///
/// `removes` are applied first, in order, each against the live child list;
/// then `inserts`, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moves {
    pub removes: Vec<MoveRemove>,
    pub inserts: Vec<MoveInsert>,
}

/// Extract the child at `from`. When `key` is set the node is kept for a
/// later insert; otherwise it is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRemove {
    pub from: usize,
    pub key: Option<Key>,
}

/// Insert the child extracted under `key` at position `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInsert {
    pub key: Key,
    pub to: usize,
}

/// Sparse mapping from preorder index to the patches for that position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchMap {
    entries: BTreeMap<usize, Vec<Patch>>,
}

impl PatchMap {
    /// Create an empty patch map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no position carries a patch.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of patched positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of patches across all positions.
    pub fn patch_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Patches at `index`, in application order.
    pub fn get(&self, index: usize) -> Option<&[Patch]> {
        self.entries.get(&index).map(Vec::as_slice)
    }

    /// Append one patch at `index`.
    pub fn push(&mut self, index: usize, patch: Patch) {
        self.entries.entry(index).or_default().push(patch);
    }

    /// Append `patches` at `index`. Empty lists leave the map untouched.
    pub fn extend(&mut self, index: usize, patches: Vec<Patch>) {
        if !patches.is_empty() {
            self.entries.entry(index).or_default().extend(patches);
        }
    }

    /// Patched positions in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Patch])> {
        self.entries.iter().map(|(i, p)| (*i, p.as_slice()))
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Per-kind summary.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats {
            positions: self.len(),
            ..Default::default()
        };
        for patch in self.entries.values().flatten() {
            match patch.kind() {
                PatchKind::Insert => stats.inserts += 1,
                PatchKind::Remove => stats.removes += 1,
                PatchKind::Replace => stats.replaces += 1,
                PatchKind::Text => stats.texts += 1,
                PatchKind::Props => stats.props += 1,
                PatchKind::Order => stats.orders += 1,
            }
        }
        stats
    }

    /// Decode a patch map from its JSON form.
    ///
    /// Every patch `kind` is checked against the vocabulary first, so an
    /// unknown kind is reported as [`DiffError::UnknownPatchKind`] rather
    /// than as a generic decoding failure.
    pub fn from_json(json: &str) -> DiffResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(positions) = &value else {
            return Err(DiffError::Malformed("expected an object keyed by index".into()));
        };
        for (index, patches) in positions {
            let Value::Array(patches) = patches else {
                return Err(DiffError::Malformed(format!(
                    "patches at index {index} are not a list"
                )));
            };
            for patch in patches {
                let kind = patch.get("kind").and_then(Value::as_str).unwrap_or("");
                if PatchKind::from_wire(kind).is_none() {
                    return Err(DiffError::UnknownPatchKind {
                        index: index.clone(),
                        kind: kind.to_string(),
                    });
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> DiffResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Patch counts of a [`PatchMap`], by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub positions: usize,
    pub inserts: usize,
    pub removes: usize,
    pub replaces: usize,
    pub texts: usize,
    pub props: usize,
    pub orders: usize,
}

impl DiffStats {
    pub fn total(&self) -> usize {
        self.inserts + self.removes + self.replaces + self.texts + self.props + self.orders
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} patches at {} positions (insert {}, remove {}, replace {}, text {}, props {}, order {})",
            self.total(),
            self.positions,
            self.inserts,
            self.removes,
            self.replaces,
            self.texts,
            self.props,
            self.orders
        )
    }
}
