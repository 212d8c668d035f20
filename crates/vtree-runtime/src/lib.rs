//! Update cycle for vtree components.
//!
//! A [`Component`] maps state to a virtual tree. [`Mounted`] keeps the
//! last tree applied to a host and, for each dispatched action, reduces the
//! state, renders the next view, diffs the two and patches the host.
//!
//! # Key Types
//!
//! - [`Component`] -- Pure reducer plus view function
//! - [`Mounted`] -- A component rendered into a [`vtree_host::HostTree`]
//! - [`CycleReport`] -- Patch statistics and root of one completed cycle

pub mod component;
pub mod error;
pub mod mount;

pub use component::Component;
pub use error::{RuntimeError, RuntimeResult};
pub use mount::{CycleReport, Mounted};
