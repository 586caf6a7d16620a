//! Interface capability chain for the `kinship` runtime.
//!
//! This module implements **interfaces**, the capability contracts a managed
//! class declares it fulfills, and the fixed-arity chain a class carries
//! them in. A class may declare up to [`MAX_INTERFACES`] interfaces; each
//! interface can itself extend other interfaces, and the chain answers
//! capability queries over the whole ancestry.
//!
//! # Lookup Order
//!
//! Lookup order is a fixed, documented tie-break that callers may depend
//! on: declared slots are checked in declaration order, and within one slot
//! the interface's own `extends` list is searched (in its declared order,
//! recursively) before moving to the next sibling slot. A class's own
//! interfaces therefore shadow anything reachable later in the declaration,
//! and in a diamond the first match per declaration order wins. Unused
//! slots are no-ops that immediately report "not found".
//!
//! # Thread Safety
//!
//! Interface descriptors are immutable after declaration and live in
//! `'static` storage; all lookups are pure reads.

use crate::error::{Error, Result};
use crate::runtime::registry::{self, ClassId, TokenKind};
use std::fmt;

/// Maximum number of interfaces a single class may declare.
pub const MAX_INTERFACES: usize = 16;

/// Descriptor for one capability interface.
///
/// An `InterfaceSpec` records the interface's identity token, its name, and
/// the interfaces it extends. Descriptors are declared once (typically via
/// the [`managed_interface!`](crate::managed_interface) macro, which pins
/// them in a `LazyLock` static) and are immutable afterwards.
///
/// # Example
///
/// ```rust
/// use kinship::runtime::interface::InterfaceSpec;
///
/// static NAMED: std::sync::LazyLock<InterfaceSpec> =
///     std::sync::LazyLock::new(|| InterfaceSpec::declare("DocNamed", &[]));
///
/// assert_eq!(NAMED.name(), "DocNamed");
/// assert!(NAMED.satisfies(NAMED.id()));
/// ```
pub struct InterfaceSpec {
    /// Identity token, issued by the registry at declaration.
    id: ClassId,
    /// Interface name (e.g. "Comparable").
    name: &'static str,
    /// Interfaces this interface extends, in declared order.
    extends: Vec<&'static InterfaceSpec>,
}

impl InterfaceSpec {
    /// Declares a new interface, issuing its identity token.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique interface name
    /// * `extends` - Interfaces this one extends, in the order their
    ///   ancestry should be searched
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered. Declaration is a
    /// definition-time act; a duplicate name is a program bug, reported the
    /// moment the definition is first materialized.
    #[must_use]
    pub fn declare(
        name: &'static str,
        extends: &[&'static InterfaceSpec],
    ) -> Self {
        match Self::try_declare(name, extends) {
            Ok(spec) => spec,
            Err(err) => panic!("interface declaration failed: {err}"),
        }
    }

    /// Fallible variant of [`declare`](Self::declare).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if an interface or class with this
    /// name already exists.
    pub fn try_declare(
        name: &'static str,
        extends: &[&'static InterfaceSpec],
    ) -> Result<Self> {
        let id = registry::register(name, TokenKind::Interface)?;
        Ok(InterfaceSpec { id, name, extends: extends.to_vec() })
    }

    /// Returns this interface's identity token.
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Returns the interface name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the interfaces this interface extends, in declared order.
    #[must_use]
    pub fn extends(&self) -> &[&'static InterfaceSpec] {
        &self.extends
    }

    /// Resolves a token against this interface and its ancestry.
    ///
    /// # Returns
    ///
    /// - `Some(spec)` for the first interface in this ancestry (self first,
    ///   then `extends` in declared order, recursively) whose token matches
    /// - `None` if nothing in the ancestry matches
    #[must_use]
    pub fn resolve(&'static self, token: ClassId) -> Option<&'static InterfaceSpec> {
        if self.id == token {
            return Some(self);
        }
        self.extends.iter().find_map(|parent| parent.resolve(token))
    }

    /// Checks whether this interface or anything it extends matches `token`.
    #[must_use]
    pub fn satisfies(&'static self, token: ClassId) -> bool {
        self.resolve(token).is_some()
    }
}

impl fmt::Debug for InterfaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extends: Vec<_> = self.extends.iter().map(|i| i.name).collect();
        f.debug_struct("InterfaceSpec")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("extends", &extends)
            .finish()
    }
}

/// A capability match produced by [`InterfaceChain::lookup`].
///
/// Records both the interface that satisfied the query and the declared
/// slot it was reached through, which makes the declaration-order tie-break
/// observable to callers and tests.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityMatch {
    /// Zero-based declared position of the slot that satisfied the query.
    pub slot: usize,
    /// The interface whose token matched (may be an ancestor of the
    /// declared interface in that slot).
    pub interface: &'static InterfaceSpec,
}

/// Fixed-arity chain of declared interfaces.
///
/// Every class carries one chain of [`MAX_INTERFACES`] slots; slots beyond
/// the declared count stay empty and immediately miss. The chain preserves
/// declaration order, which is the capability lookup order.
pub struct InterfaceChain {
    slots: [Option<&'static InterfaceSpec>; MAX_INTERFACES],
    len: usize,
}

impl InterfaceChain {
    /// Builds a chain from a class's declared interface list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InterfaceLimitExceeded`] if more than
    /// [`MAX_INTERFACES`] interfaces were declared.
    pub(crate) fn from_declared(
        class: &'static str,
        declared: &[&'static InterfaceSpec],
    ) -> Result<Self> {
        if declared.len() > MAX_INTERFACES {
            return Err(Error::InterfaceLimitExceeded {
                class,
                declared: declared.len(),
            });
        }

        let mut slots = [None; MAX_INTERFACES];
        for (slot, interface) in declared.iter().enumerate() {
            slots[slot] = Some(*interface);
        }

        Ok(InterfaceChain { slots, len: declared.len() })
    }

    /// Looks up a token across the declared interfaces.
    ///
    /// Slots are checked in declaration order; within a slot the
    /// interface's full ancestry is searched before the next sibling slot.
    /// A miss is a normal "not found", not an error; the composition node
    /// continues the search up the parent class chain.
    ///
    /// # Returns
    ///
    /// - `Some(CapabilityMatch)` for the first slot whose ancestry matches
    /// - `None` if no declared interface (or ancestor) matches
    #[must_use]
    pub fn lookup(&self, token: ClassId) -> Option<CapabilityMatch> {
        self.slots[..self.len].iter().copied().enumerate().find_map(
            |(slot, entry)| {
                let interface = entry?.resolve(token)?;
                Some(CapabilityMatch { slot, interface })
            },
        )
    }

    /// Returns the number of declared interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no interfaces were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the declared interfaces in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static InterfaceSpec> + '_ {
        self.slots[..self.len].iter().filter_map(|entry| *entry)
    }
}

impl fmt::Debug for InterfaceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(InterfaceSpec::name).collect();
        f.debug_tuple("InterfaceChain").field(&names).finish()
    }
}
