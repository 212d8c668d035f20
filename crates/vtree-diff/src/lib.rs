//! Diff engine for vtree.
//!
//! Compares two immutable virtual trees and produces a sparse [`PatchMap`]:
//! the ordered mutations that turn a host tree rendered from the old tree
//! into one matching the new tree.
//!
//! # Key Types
//!
//! - [`diff`] / [`diff_with_config`] -- Tree differ (preorder walk and case dispatch)
//! - [`reorder`] / [`Reordered`] -- Keyed children reconciler
//! - [`diff_props`] -- Attribute-map differ
//! - [`Patch`] / [`PropOp`] / [`Moves`] -- Patch vocabulary
//! - [`PatchMap`] / [`DiffStats`] -- Sparse index-to-patches map and its summary
//! - [`DiffConfig`] -- Duplicate-key checking, opaque children, fingerprint shortcut

pub mod config;
pub mod error;
pub mod patch;
pub mod props;
pub mod reorder;
pub mod tree;

pub use config::DiffConfig;
pub use error::{DiffError, DiffResult};
pub use patch::{DiffStats, MoveInsert, MoveRemove, Moves, Patch, PatchKind, PatchMap, PropOp};
pub use props::diff_props;
pub use reorder::{find_duplicate_key, reorder, Reordered};
pub use tree::{diff, diff_with_config};
