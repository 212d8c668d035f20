//! Foundation types for vtree reconciliation.
//!
//! A virtual tree is an immutable description of a UI at one point in
//! time. This crate defines that value type and the preorder numbering that
//! links diff results to nodes of a real, mutable host tree.
//!
//! # Key Types
//!
//! - [`VNode`] -- Text or Element node of a virtual tree
//! - [`VElement`] -- Tag, props, children, optional [`Key`]; sealed with a descendant count and [`Fingerprint`]
//! - [`PropValue`] / [`Props`] -- Primitive attribute values and their ordered map
//! - [`PreorderIndex`] -- Depth-first, self-before-children addressing shared by diff and patch

pub mod fingerprint;
pub mod index;
pub mod node;
pub mod value;

pub use fingerprint::Fingerprint;
pub use index::PreorderIndex;
pub use node::{h, text, VElement, VNode, VText};
pub use value::{props, Key, PropValue, Props};
