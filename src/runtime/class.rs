//! Class composition for the `kinship` runtime.
//!
//! This module implements the **composition node**: the single `&'static`
//! structure that assembles a managed class's identity, parent link,
//! interface chain, and declared footprint, and answers the cross-cutting
//! protocols (cast, size accounting, identity) over that shape.
//!
//! # Architecture
//!
//! Composition nodes are **materialized exactly once** per class:
//! - The [`ManagedClass`] impl pins its [`ClassSpec`] in a per-class
//!   `OnceLock`, so repeated materialization attempts observe one node
//! - The parent link and interface list are fixed at definition time and
//!   never change afterwards (no dynamic reclassification)
//! - Identity tokens come from the global registry at composition
//!
//! # Cast Order
//!
//! A capability query checks the class's own token first, then the declared
//! interface chain (declaration order, each interface's ancestry before the
//! next sibling), and finally tail-recurses up the parent chain. The result
//! is non-`None` iff the token names exactly this class, one of its direct
//! or inherited interfaces, or an ancestor class or interface.

use crate::error::{Error, Result};
use crate::runtime::interface::{CapabilityMatch, InterfaceChain, InterfaceSpec};
use crate::runtime::registry::{self, ClassId, TokenKind};
use std::fmt;
use std::mem;

/// Composition node for one managed class.
///
/// Holds everything the runtime knows about a class: its identity token,
/// name, single parent link, declared interface chain, and flat in-memory
/// footprint. Built through [`ClassSpec::compose`] (usually from the
/// [`managed_class!`](crate::managed_class) macro) and immutable afterwards.
pub struct ClassSpec {
    /// Identity token, issued by the registry at composition.
    id: ClassId,
    /// Class name (e.g. "CacheEntry").
    name: &'static str,
    /// Parent class link. `None` terminates the chain at the root.
    parent: Option<&'static ClassSpec>,
    /// Declared interfaces, in capability lookup order.
    interfaces: InterfaceChain,
    /// Flat footprint of the most-derived type, captured at composition.
    shallow_size: usize,
}

/// How a capability query was satisfied, as reported by
/// [`ClassSpec::resolve`].
///
/// Cast callers usually only need the yes/no answer; the resolution detail
/// exists so the documented lookup order (own identity, then interfaces in
/// declaration order, then ancestors) is observable.
#[derive(Debug, Clone, Copy)]
pub enum Resolution {
    /// The token names exactly the queried class.
    ExactClass,
    /// The token names an ancestor class in the parent chain.
    AncestorClass(&'static ClassSpec),
    /// The token names an interface reachable from `declaring`'s chain.
    Interface {
        /// The class level whose declared interfaces produced the match.
        declaring: &'static ClassSpec,
        /// The matched interface and the declared slot it was reached
        /// through.
        matched: CapabilityMatch,
    },
}

impl ClassSpec {
    /// Starts composing a class, capturing the flat footprint of `T`.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique class name; becomes the registry entry
    ///
    /// # Example
    ///
    /// ```rust
    /// use kinship::runtime::class::ClassSpec;
    ///
    /// struct Blob([u8; 32]);
    ///
    /// let spec = ClassSpec::compose::<Blob>("DocBlob").finish();
    /// assert_eq!(spec.size_of(false), 32);
    /// ```
    #[must_use]
    pub fn compose<T>(name: &'static str) -> ClassSpecBuilder {
        ClassSpecBuilder {
            name,
            shallow_size: mem::size_of::<T>(),
            parent: None,
            interfaces: Vec::new(),
        }
    }

    /// Returns this class's identity token.
    ///
    /// This is the value `cast` compares against, and the key to use in any
    /// identity-token-keyed table.
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the parent composition node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&'static ClassSpec> {
        self.parent
    }

    /// Iterates the directly declared interfaces in declaration order.
    pub fn interfaces(&self) -> impl Iterator<Item = &'static InterfaceSpec> + '_ {
        self.interfaces.iter()
    }

    /// O(1) self-identity check: is this *exactly* the class behind `token`.
    ///
    /// Distinct from [`satisfies`](Self::satisfies), which also accepts
    /// interfaces and ancestors.
    #[must_use]
    pub fn is_exactly(&self, token: ClassId) -> bool {
        self.id == token
    }

    /// Resolves a capability query against this class.
    ///
    /// Checks this class's own token, then does a breadth-first search
    /// across the directly declared interfaces, and finally tail-recurses
    /// up the parent chain.
    ///
    /// # Returns
    ///
    /// - `Some(Resolution)` describing how the token was satisfied
    /// - `None` if the token names an unrelated class or interface; a
    ///   normal "not found", never an error
    #[must_use]
    pub fn resolve(&'static self, token: ClassId) -> Option<Resolution> {
        if self.id == token {
            return Some(Resolution::ExactClass);
        }

        if let Some(matched) = self.interfaces.lookup(token) {
            return Some(Resolution::Interface { declaring: self, matched });
        }

        let parent = self.parent?;
        Some(match parent.resolve(token)? {
            Resolution::ExactClass => Resolution::AncestorClass(parent),
            inherited => inherited,
        })
    }

    /// Checks whether instances of this class satisfy the queried token.
    #[must_use]
    pub fn satisfies(&'static self, token: ClassId) -> bool {
        self.resolve(token).is_some()
    }

    /// Returns the class's in-memory footprint.
    ///
    /// # Arguments
    ///
    /// * `deep` - shallow mode returns exactly the flat footprint of the
    ///   most-derived type, regardless of ancestry depth; deep mode adds the
    ///   parent chain's deep size, recursively, modeling owned substructure
    ///
    /// Deep size is monotonically non-decreasing as the hierarchy grows.
    #[must_use]
    pub fn size_of(&self, deep: bool) -> usize {
        if deep {
            self.shallow_size
                + self.parent.map_or(0, |parent| parent.size_of(true))
        } else {
            self.shallow_size
        }
    }
}

impl fmt::Debug for ClassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSpec")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("parent", &self.parent.map(ClassSpec::name))
            .field("interfaces", &self.interfaces)
            .field("shallow_size", &self.shallow_size)
            .finish()
    }
}

/// Builder for a [`ClassSpec`].
///
/// Obtained from [`ClassSpec::compose`]; collects the parent link and the
/// declared interfaces, then registers the class and produces the node.
pub struct ClassSpecBuilder {
    name: &'static str,
    shallow_size: usize,
    parent: Option<&'static ClassSpec>,
    interfaces: Vec<&'static InterfaceSpec>,
}

impl ClassSpecBuilder {
    /// Sets the single parent class.
    #[must_use]
    pub fn extends(mut self, parent: &'static ClassSpec) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Appends one declared interface. Declaration order becomes the
    /// capability lookup order.
    #[must_use]
    pub fn implements(mut self, interface: &'static InterfaceSpec) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Finishes composition, registering the class.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate class name or on more than 16 declared
    /// interfaces. Both are definition-time failures: they surface the
    /// moment the class definition is first materialized, naming the class.
    #[must_use]
    pub fn finish(self) -> ClassSpec {
        let name = self.name;
        match self.try_finish() {
            Ok(spec) => spec,
            Err(err) => panic!("composition of class '{name}' failed: {err}"),
        }
    }

    /// Fallible variant of [`finish`](Self::finish).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if the class name is already
    /// registered, or [`Error::InterfaceLimitExceeded`] if more than 16
    /// interfaces were declared.
    pub fn try_finish(self) -> Result<ClassSpec> {
        let interfaces =
            InterfaceChain::from_declared(self.name, &self.interfaces)?;
        let id = registry::register(self.name, TokenKind::Class)?;

        log::debug!(
            "composed class '{}' ({} interfaces, parent: {:?})",
            self.name,
            interfaces.len(),
            self.parent.map(ClassSpec::name),
        );

        Ok(ClassSpec {
            id,
            name: self.name,
            parent: self.parent,
            interfaces,
            shallow_size: self.shallow_size,
        })
    }
}

/// Contract every managed class fulfills.
///
/// Implemented by the [`managed_class!`](crate::managed_class) macro, which
/// materializes the composition node exactly once. `duplicate` is the clone
/// hook: the default **fails**, identifying the concrete class. Cloning is
/// unsafe to default-generate for arbitrary classes, so a class must opt in
/// explicitly.
///
/// The `Send + Sync` bound is what lets handles and views of the class be
/// shared across threads; instance state itself is guarded per instance.
pub trait ManagedClass: Sized + Send + Sync + 'static {
    /// Returns the composition node for this class.
    fn spec() -> &'static ClassSpec;

    /// Returns this class's identity token.
    #[must_use]
    fn class_id() -> ClassId {
        Self::spec().id()
    }

    /// Produces an independent copy of this instance's state.
    ///
    /// # Errors
    ///
    /// The default implementation always returns
    /// [`Error::CloneNotSupported`] naming the concrete class. Overriding
    /// classes return `Ok` with a copy that shares no ownership with the
    /// original.
    fn duplicate(&self) -> Result<Self> {
        Err(Error::CloneNotSupported { class: Self::spec().name() })
    }
}
