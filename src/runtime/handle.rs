//! Ownership reference types for managed instances.
//!
//! This module implements the three reference flavors over a managed class:
//! - [`Handle`]: mutable shared ownership (read and write access)
//! - [`View`]: read-only shared ownership
//! - [`Holder`]: a variant carrying either, for slots that defer the
//!   handle/view distinction to first use
//!
//! # Architecture
//!
//! Instances are heap-allocated with manual lifecycle management:
//! - Each instance has an atomic reference count shared by every handle,
//!   view, and holder over it
//! - The instance is deallocated when the count reaches zero
//! - Instance state sits behind a per-instance `RwLock`, which is what lets
//!   a mutable handle and read-only views coexist safely
//! - Cyclic ownership is not collected; avoiding cycles is the caller's
//!   responsibility
//!
//! # Thread Safety
//!
//! References are `Send + Sync`: retain/release are atomic (AcqRel), and
//! state access goes through the instance lock. Widening a handle to a view
//! is free; the reverse is only available through [`Holder::to_handle`],
//! which can fail.

use crate::error::Result;
use crate::runtime::class::{ClassSpec, ManagedClass};
use crate::runtime::factory::Factory;
use crate::runtime::registry::ClassId;
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Raw instance representation allocated on the heap.
///
/// Not pinned in `'static` storage like class metadata: instances have
/// individual lifetimes controlled by reference counting.
#[repr(C)]
struct RawInstance<T> {
    /// Reference count (starts at 1, deallocated when it reaches 0).
    /// Atomic for thread-safe retain/release.
    refcount: AtomicU32,
    /// Instance state. The lock enforces the handle/view split: handles
    /// take the write side, views only ever the read side.
    state: RwLock<T>,
}

/// Increments the shared reference count.
///
/// # Panics
///
/// Panics if the count would overflow `u32::MAX`.
fn retain<T>(raw: NonNull<RawInstance<T>>) {
    // SAFETY: raw points to a live RawInstance; the caller holds a reference
    let instance = unsafe { &*raw.as_ptr() };

    let old = instance.refcount.fetch_add(1, Ordering::AcqRel);
    if old == u32::MAX {
        panic!("reference count overflow on managed instance");
    }
}

/// Decrements the shared reference count, deallocating at zero.
fn release<T>(raw: NonNull<RawInstance<T>>) {
    // SAFETY: raw points to a live RawInstance; the caller holds a reference
    let instance = unsafe { &*raw.as_ptr() };

    let old = instance.refcount.fetch_sub(1, Ordering::AcqRel);
    if old == 1 {
        // Last owner gone. Reclaim the allocation made in Handle::adopt.
        // SAFETY: the pointer came from Box::into_raw and no other
        // reference can observe it once the count hit zero.
        unsafe {
            drop(Box::from_raw(raw.as_ptr()));
        }
    }
}

/// Mutable shared-ownership reference to a live managed instance.
///
/// A `Handle` is the only reference type that grants write access to the
/// instance state. Handles are produced by the factory's `create*` entry
/// points (never by constructing an instance directly) and by
/// [`clone_instance`](Handle::clone_instance) on classes that support it.
///
/// # Example
///
/// ```rust
/// use kinship::{managed_class, Handle, ManagedClass};
///
/// struct Counter {
///     count: u64,
/// }
///
/// managed_class! {
///     class Counter {
///         create() => Counter { count: 0 };
///     }
/// }
///
/// let counter: Handle<Counter> = Counter::create();
/// counter.write().count += 1;
/// assert_eq!(counter.read().count, 1);
/// ```
pub struct Handle<T: ManagedClass> {
    /// Pointer to the shared instance. Valid while the refcount is held.
    raw: NonNull<RawInstance<T>>,
}

impl<T: ManagedClass> Handle<T> {
    /// Wraps fully constructed state into a fresh instance with refcount 1.
    ///
    /// This is the factory's entry point; the state is complete before the
    /// instance ever becomes reference-visible.
    pub(crate) fn adopt(state: T) -> Self {
        let raw = Box::new(RawInstance {
            refcount: AtomicU32::new(1),
            state: RwLock::new(state),
        });

        // SAFETY: Box::into_raw never returns null
        Handle { raw: unsafe { NonNull::new_unchecked(Box::into_raw(raw)) } }
    }

    /// Locks the instance state for reading.
    ///
    /// # Panics
    ///
    /// Panics if the instance lock is poisoned (a panic in another thread
    /// while it held the write side).
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        // SAFETY: self holds a reference, so the instance is live
        unsafe { &*self.raw.as_ptr() }.state.read().unwrap()
    }

    /// Locks the instance state for writing.
    ///
    /// # Panics
    ///
    /// Panics if the instance lock is poisoned.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        // SAFETY: self holds a reference, so the instance is live
        unsafe { &*self.raw.as_ptr() }.state.write().unwrap()
    }

    /// Widens this handle to a read-only view of the same instance.
    ///
    /// Always safe and always succeeds; the view shares the refcount.
    #[must_use]
    pub fn view(&self) -> View<T> {
        retain(self.raw);
        View { raw: self.raw }
    }

    /// Casts against an identity token.
    ///
    /// # Returns
    ///
    /// - `Some(View)` of this same instance iff the token names exactly
    ///   this class, one of its direct or inherited interfaces, or an
    ///   ancestor class or interface
    /// - `None` on a capability miss, which is a normal outcome, not an
    ///   error
    #[must_use]
    pub fn cast(&self, token: ClassId) -> Option<View<T>> {
        T::spec().satisfies(token).then(|| self.view())
    }

    /// Checks a capability without producing a reference.
    #[must_use]
    pub fn is_a(&self, token: ClassId) -> bool {
        T::spec().satisfies(token)
    }

    /// Returns the composition node of the instance's class.
    #[must_use]
    pub fn class(&self) -> &'static ClassSpec {
        T::spec()
    }

    /// Returns the identity token of the instance's class.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        T::spec().id()
    }

    /// Returns the instance footprint; see [`ClassSpec::size_of`].
    #[must_use]
    pub fn size_of(&self, deep: bool) -> usize {
        T::spec().size_of(deep)
    }

    /// Clones the underlying instance into an independently owned one.
    ///
    /// Routes through [`ManagedClass::duplicate`]: the default fails, so
    /// only classes that explicitly support cloning succeed here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CloneNotSupported`](crate::Error::CloneNotSupported)
    /// for classes that keep the default clone behavior.
    ///
    /// # Panics
    ///
    /// Panics if the instance lock is poisoned.
    pub fn clone_instance(&self) -> Result<Handle<T>> {
        let copy = self.read().duplicate()?;
        Ok(Factory::<T>::assemble(copy))
    }

    /// Checks whether `other` refers to this same instance.
    #[must_use]
    pub fn is_same(&self, other: &View<T>) -> bool {
        std::ptr::eq(self.raw.as_ptr(), other.raw.as_ptr())
    }

    /// Returns the current shared reference count.
    ///
    /// Primarily useful in tests; the count can change concurrently.
    #[must_use]
    pub fn refcount(&self) -> u32 {
        // SAFETY: self holds a reference, so the instance is live
        unsafe { &*self.raw.as_ptr() }.refcount.load(Ordering::Acquire)
    }
}

// SAFETY: the instance is heap-pinned, the refcount is atomic, and state
// access goes through the RwLock; T is Send + Sync by the ManagedClass bound
unsafe impl<T: ManagedClass> Send for Handle<T> {}
unsafe impl<T: ManagedClass> Sync for Handle<T> {}

impl<T: ManagedClass> Clone for Handle<T> {
    fn clone(&self) -> Self {
        retain(self.raw);
        Handle { raw: self.raw }
    }
}

impl<T: ManagedClass> Drop for Handle<T> {
    fn drop(&mut self) {
        release(self.raw);
    }
}

impl<T: ManagedClass> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        // Reference identity: same heap allocation
        std::ptr::eq(self.raw.as_ptr(), other.raw.as_ptr())
    }
}

impl<T: ManagedClass> Eq for Handle<T> {}

impl<T: ManagedClass> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("class", &T::spec().name())
            .field("refcount", &self.refcount())
            .finish()
    }
}

/// Read-only shared-ownership reference to a live managed instance.
///
/// Obtained by widening a [`Handle`] (free, always safe) or from a
/// successful [`cast`](Handle::cast). A view never grants write access;
/// narrowing back to a handle requires the explicit, fallible
/// [`Holder::to_handle`] check.
pub struct View<T: ManagedClass> {
    /// Pointer to the shared instance. Valid while the refcount is held.
    raw: NonNull<RawInstance<T>>,
}

impl<T: ManagedClass> View<T> {
    /// Locks the instance state for reading.
    ///
    /// # Panics
    ///
    /// Panics if the instance lock is poisoned.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        // SAFETY: self holds a reference, so the instance is live
        unsafe { &*self.raw.as_ptr() }.state.read().unwrap()
    }

    /// Casts against an identity token; see [`Handle::cast`].
    #[must_use]
    pub fn cast(&self, token: ClassId) -> Option<View<T>> {
        T::spec().satisfies(token).then(|| self.clone())
    }

    /// Checks a capability without producing a reference.
    #[must_use]
    pub fn is_a(&self, token: ClassId) -> bool {
        T::spec().satisfies(token)
    }

    /// Returns the composition node of the instance's class.
    #[must_use]
    pub fn class(&self) -> &'static ClassSpec {
        T::spec()
    }

    /// Returns the identity token of the instance's class.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        T::spec().id()
    }

    /// Returns the instance footprint; see [`ClassSpec::size_of`].
    #[must_use]
    pub fn size_of(&self, deep: bool) -> usize {
        T::spec().size_of(deep)
    }

    /// Clones the underlying instance; see [`Handle::clone_instance`].
    ///
    /// Cloning is a read-only operation on the source, so it is available
    /// through a view as well. The result is a fresh mutable handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CloneNotSupported`](crate::Error::CloneNotSupported)
    /// for classes that keep the default clone behavior.
    ///
    /// # Panics
    ///
    /// Panics if the instance lock is poisoned.
    pub fn clone_instance(&self) -> Result<Handle<T>> {
        let copy = self.read().duplicate()?;
        Ok(Factory::<T>::assemble(copy))
    }

    /// Returns the current shared reference count.
    #[must_use]
    pub fn refcount(&self) -> u32 {
        // SAFETY: self holds a reference, so the instance is live
        unsafe { &*self.raw.as_ptr() }.refcount.load(Ordering::Acquire)
    }
}

// SAFETY: same justification as Handle; a View is strictly less capable
unsafe impl<T: ManagedClass> Send for View<T> {}
unsafe impl<T: ManagedClass> Sync for View<T> {}

impl<T: ManagedClass> Clone for View<T> {
    fn clone(&self) -> Self {
        retain(self.raw);
        View { raw: self.raw }
    }
}

impl<T: ManagedClass> Drop for View<T> {
    fn drop(&mut self) {
        release(self.raw);
    }
}

impl<T: ManagedClass> PartialEq for View<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.raw.as_ptr(), other.raw.as_ptr())
    }
}

impl<T: ManagedClass> Eq for View<T> {}

impl<T: ManagedClass> From<Handle<T>> for View<T> {
    fn from(handle: Handle<T>) -> Self {
        handle.view()
    }
}

impl<T: ManagedClass> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("class", &T::spec().name())
            .field("refcount", &self.refcount())
            .finish()
    }
}

/// Variant container carrying either a [`Handle`] or a [`View`].
///
/// Used where a stored slot cannot statically commit to the handle/view
/// distinction, such as a collection element that must hold both mutable
/// and immutable references uniformly.
pub enum Holder<T: ManagedClass> {
    /// No reference held.
    Empty,
    /// Mutable shared reference.
    Handle(Handle<T>),
    /// Read-only shared reference.
    View(View<T>),
}

impl<T: ManagedClass> Holder<T> {
    /// Returns `true` if no reference is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Holder::Empty)
    }

    /// Produces a read-only view of the held instance.
    ///
    /// Widening succeeds for both held flavors.
    #[must_use]
    pub fn to_view(&self) -> Option<View<T>> {
        match self {
            Holder::Empty => None,
            Holder::Handle(handle) => Some(handle.view()),
            Holder::View(view) => Some(view.clone()),
        }
    }

    /// Attempts to recover a mutable handle.
    ///
    /// This is the explicit narrowing check: it fails when the holder
    /// carries only a view (views are read-only for safety) or nothing.
    #[must_use]
    pub fn to_handle(&self) -> Option<Handle<T>> {
        match self {
            Holder::Handle(handle) => Some(handle.clone()),
            Holder::Empty | Holder::View(_) => None,
        }
    }
}

impl<T: ManagedClass> Default for Holder<T> {
    fn default() -> Self {
        Holder::Empty
    }
}

impl<T: ManagedClass> From<Handle<T>> for Holder<T> {
    fn from(handle: Handle<T>) -> Self {
        Holder::Handle(handle)
    }
}

impl<T: ManagedClass> From<View<T>> for Holder<T> {
    fn from(view: View<T>) -> Self {
        Holder::View(view)
    }
}

impl<T: ManagedClass> fmt::Debug for Holder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Empty => f.write_str("Holder::Empty"),
            Holder::Handle(handle) => {
                f.debug_tuple("Holder::Handle").field(handle).finish()
            }
            Holder::View(view) => {
                f.debug_tuple("Holder::View").field(view).finish()
            }
        }
    }
}
