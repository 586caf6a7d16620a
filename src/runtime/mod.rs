//! Core runtime for `kinship` managed classes.
//!
//! The runtime is organized into small modules, leaves first:
//!
//! - [`registry`]: identity token issue and name lookup
//! - [`interface`]: interface descriptors and the capability chain
//! - [`class`]: the class composition node and the [`ManagedClass`] contract
//! - [`handle`]: refcounted ownership reference types
//! - [`factory`]: the construction proxy
//!
//! Class and interface metadata is pinned in `'static` storage and
//! materialized exactly once; instances are individually refcounted. All
//! capability queries are pure reads over the immutable metadata.

pub mod class;
pub mod factory;
pub mod handle;
pub mod interface;
pub mod registry;

pub use class::{ClassSpec, ClassSpecBuilder, ManagedClass, Resolution};
pub use factory::Factory;
pub use handle::{Handle, Holder, View};
pub use interface::{CapabilityMatch, InterfaceChain, InterfaceSpec, MAX_INTERFACES};
pub use registry::{ClassId, TokenKind};
