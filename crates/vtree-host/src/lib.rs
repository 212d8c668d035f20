//! Host side of vtree: the capability a platform tree exposes, an
//! in-memory implementation of it, and the patch applier.
//!
//! # Key Types
//!
//! - [`HostTree`] -- Primitive operations a mutable host tree supplies
//! - [`InMemoryHost`] -- Arena-backed host for tests, tooling and headless rendering
//! - [`render`] / [`mount`] -- Materialize a virtual tree on a host
//! - [`apply`] -- Apply a [`vtree_diff::PatchMap`] to a host tree
//! - [`HostError`] / [`PatchError`] -- Failures of host primitives and of patch application

pub mod apply;
pub mod error;
pub mod memory;
pub mod render;
pub mod traits;

pub use apply::apply;
pub use error::{HostError, HostResult, PatchError, PatchResult};
pub use memory::{InMemoryHost, NodeId};
pub use render::{mount, render};
pub use traits::{HostNodeKind, HostTree};
