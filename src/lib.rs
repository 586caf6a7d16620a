//! `kinship`: managed object classes for Rust.
//!
//! `kinship` is a substrate for defining **managed object classes**: a class
//! author declares, in one place, a class's parent, the capability
//! interfaces it implements (up to 16), and its constructors, and gets for
//! free:
//!
//! - **Ownership reference types**: mutable [`Handle`], read-only [`View`],
//!   and the deferred [`Holder`] variant, all sharing one atomic refcount
//! - **Interface-capable casting** over identity tokens, without relying on
//!   built-in polymorphic type inspection
//! - **Construction via factory**: one `create*` entry point per declared
//!   constructor, with signature mismatches rejected at compile time
//! - **Cloning** that fails by default and is overridable per class
//! - **Memory-footprint accounting** (shallow and deep `size_of`)
//!
//! # Architecture
//!
//! Class metadata lives in `'static` composition nodes ([`ClassSpec`])
//! materialized exactly once per class; instances are individually
//! reference-counted and only ever reachable through the reference types.
//! Capability lookup order is fixed and documented: a class's own identity,
//! then its declared interfaces in declaration order (each interface's
//! ancestry before the next sibling), then the parent chain.
//!
//! # Example
//!
//! ```rust
//! use kinship::{managed_class, managed_interface, ManagedClass};
//!
//! managed_interface!(Measurable);
//! managed_interface!(Labelled);
//!
//! struct Shape {
//!     area: f64,
//! }
//!
//! managed_class! {
//!     pub class Shape implements (Measurable) {
//!         create(area: f64) => Shape { area };
//!     }
//! }
//!
//! struct Box3 {
//!     area: f64,
//!     label: String,
//! }
//!
//! managed_class! {
//!     pub class Box3 extends (Shape) implements (Measurable, Labelled) {
//!         create(area: f64, label: String) => Box3 { area, label };
//!     }
//!     clone = |b: &Box3| Box3 { area: b.area, label: b.label.clone() };
//! }
//!
//! let b = Box3::create(6.0, "crate".to_string());
//!
//! // Capability queries: own class, ancestor class, interfaces.
//! assert!(b.cast(Box3::class_id()).is_some());
//! assert!(b.cast(Shape::class_id()).is_some());
//! assert!(b.cast(Labelled.id()).is_some());
//!
//! // Cloning is explicit: Box3 opted in, Shape did not.
//! let copy = b.clone_instance().unwrap();
//! assert_eq!(copy.read().label, "crate");
//! assert!(Shape::create(1.0).clone_instance().is_err());
//! ```

pub mod error;
pub mod runtime;

mod macros;

// Re-export commonly used types
pub use error::{Error, Result};
pub use runtime::{
    ClassId, ClassSpec, ClassSpecBuilder, Factory, Handle, Holder,
    InterfaceSpec, ManagedClass, Resolution, View,
};
