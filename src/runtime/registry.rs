//! Class identity registry for the `kinship` runtime.
//!
//! This module issues the identity tokens that classes and interfaces are
//! known by at runtime. Tokens are the currency of the casting protocol: a
//! capability query is "does this instance satisfy the type behind this
//! token", and a self-identity query is "is this exactly the class behind
//! this token".
//!
//! # Architecture
//!
//! Tokens are **globally issued** and never retired:
//! - Each registered name maps to exactly one [`ClassId`]
//! - Tokens are unique process-wide and stable for the program duration
//! - Classes and interfaces draw from the same token namespace, so `cast`
//!   accepts one token type for both kinds of query
//!
//! # Thread Safety
//!
//! The registry is thread-safe and supports concurrent registration from
//! multiple threads. Uses `RwLock` for table access; token issue happens
//! under the write lock so a name can never observe two tokens.

use crate::error::{Error, Result};
use fxhash::FxHashMap;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::OnceLock;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity token for a registered class or interface.
///
/// Tokens are issued exactly once per name and never change for the life of
/// the process. Comparison is O(1) and is the basis of both self-identity
/// checks and capability lookup.
///
/// # Example
///
/// ```rust
/// use kinship::runtime::registry;
///
/// let id = registry::register("DocExampleToken", registry::TokenKind::Class).unwrap();
/// assert_eq!(registry::lookup("DocExampleToken"), Some(id));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(NonZeroU64);

impl ClassId {
    /// Returns the raw token value.
    ///
    /// Useful as a key in caller-side tables keyed by identity token.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match name_of(*self) {
            Some(name) => write!(f, "ClassId({}: {name})", self.0),
            None => write!(f, "ClassId({})", self.0),
        }
    }
}

/// Kind of definition a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A concrete or abstract managed class.
    Class,
    /// A capability interface.
    Interface,
}

/// Global identity registry.
///
/// Ensures unique names and exactly-once token issue.
struct Registry {
    /// Map of name -> issued token.
    /// Protected by `RwLock` for thread-safe registration.
    ids: RwLock<FxHashMap<&'static str, ClassId>>,
    /// Reverse map of token -> (name, kind) for introspection.
    names: RwLock<FxHashMap<ClassId, (&'static str, TokenKind)>>,
    /// Next token value. Tokens start at 1 so they fit in `NonZeroU64`.
    next: AtomicU64,
}

/// Global registry instance.
static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn global() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry {
        ids: RwLock::new(FxHashMap::default()),
        names: RwLock::new(FxHashMap::default()),
        next: AtomicU64::new(1),
    })
}

/// Registers a name and issues its identity token.
///
/// Registration is automatic from the composition declaration: class and
/// interface specs call this during their first materialization, so no
/// explicit registration call is required from a class author.
///
/// # Arguments
///
/// * `name` - Unique class or interface name
/// * `kind` - Whether the name denotes a class or an interface
///
/// # Returns
///
/// Returns `Ok(ClassId)` with a fresh token, or `Err` if the name is
/// already registered.
///
/// # Thread Safety
///
/// Multiple threads can register concurrently. The double check under the
/// write lock guarantees a name never receives two tokens even when two
/// threads race on the same first use.
///
/// # Errors
///
/// Returns [`Error::DuplicateName`] if a class or interface with this name
/// already exists in the registry.
///
/// # Panics
///
/// Panics if a registry lock is poisoned (indicates a panic in another
/// thread while it held the lock).
pub fn register(name: &'static str, kind: TokenKind) -> Result<ClassId> {
    let registry = global();

    {
        let ids = registry.ids.read().unwrap();
        if ids.contains_key(name) {
            return Err(Error::DuplicateName { name });
        }
    } // Release read lock

    let mut ids = registry.ids.write().unwrap();

    // Double-check: another thread might have registered it while we waited
    if ids.contains_key(name) {
        return Err(Error::DuplicateName { name });
    }

    let raw = registry.next.fetch_add(1, Ordering::Relaxed);
    // Token values start at 1 and only grow
    let id = ClassId(NonZeroU64::new(raw).unwrap());

    ids.insert(name, id);
    drop(ids);

    registry.names.write().unwrap().insert(id, (name, kind));

    log::debug!("registered {kind:?} '{name}' as token {raw}");

    Ok(id)
}

/// Looks up the token for a registered name.
///
/// # Returns
///
/// - `Some(ClassId)` if the name has been registered
/// - `None` if no class or interface with this name exists yet
///
/// # Panics
///
/// Panics if the registry lock is poisoned.
#[must_use]
pub fn lookup(name: &str) -> Option<ClassId> {
    global().ids.read().unwrap().get(name).copied()
}

/// Returns the name a token was issued for.
///
/// # Panics
///
/// Panics if the registry lock is poisoned.
#[must_use]
pub fn name_of(id: ClassId) -> Option<&'static str> {
    global().names.read().unwrap().get(&id).map(|(name, _)| *name)
}

/// Returns the kind of definition a token was issued for.
///
/// # Panics
///
/// Panics if the registry lock is poisoned.
#[must_use]
pub fn kind_of(id: ClassId) -> Option<TokenKind> {
    global().names.read().unwrap().get(&id).map(|(_, kind)| *kind)
}
