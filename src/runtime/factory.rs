//! Construction proxy for managed instances.
//!
//! `Factory` is the single place instances come into being. The public
//! `create*` entry points generated by
//! [`managed_class!`](crate::managed_class) run a class's constructor to
//! completion and hand the finished state here; the factory wraps it into a
//! fresh [`Handle`]. An instance therefore becomes reference-visible only
//! after its constructor has completed; no reference type in this crate can
//! observe a partially constructed instance.
//!
//! # Design
//!
//! - **No pooling**: every assembly allocates a fresh instance
//! - **No public copy path**: the factory takes state by value, and
//!   constructors are private to the declaring module, so duplication is
//!   only reachable through `clone_instance` and the class's explicit
//!   [`duplicate`](crate::ManagedClass::duplicate) hook
//! - **Cheap**: the factory itself is a zero-sized marker

use crate::runtime::class::ManagedClass;
use crate::runtime::handle::Handle;
use std::marker::PhantomData;

/// Construction proxy for one managed class.
///
/// # Example
///
/// ```rust
/// use kinship::{managed_class, Factory};
///
/// struct Pixel {
///     x: u16,
///     y: u16,
/// }
///
/// managed_class! {
///     class Pixel {
///         create(x: u16, y: u16) => Pixel { x, y };
///     }
/// }
///
/// let pixel = Pixel::create(3, 4);
/// assert_eq!(pixel.read().x, 3);
/// ```
pub struct Factory<T: ManagedClass> {
    _class: PhantomData<fn() -> T>,
}

impl<T: ManagedClass> Factory<T> {
    /// Wraps fully constructed state into a mutable [`Handle`].
    ///
    /// The returned handle is the instance's first and only reference; its
    /// refcount starts at 1.
    #[must_use]
    pub fn assemble(state: T) -> Handle<T> {
        log::trace!("assembling instance of '{}'", T::spec().name());
        Handle::adopt(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::class::ClassSpec;
    use std::sync::OnceLock;

    struct Widget {
        label: &'static str,
    }

    impl ManagedClass for Widget {
        fn spec() -> &'static ClassSpec {
            static SPEC: OnceLock<ClassSpec> = OnceLock::new();
            SPEC.get_or_init(|| {
                ClassSpec::compose::<Widget>("FactoryWidget").finish()
            })
        }
    }

    #[test]
    fn test_assemble_wraps_complete_state() {
        let widget = Factory::assemble(Widget { label: "ready" });

        assert_eq!(widget.refcount(), 1);
        assert_eq!(widget.read().label, "ready");
        assert_eq!(widget.class().name(), "FactoryWidget");
    }

    #[test]
    fn test_assembled_instances_are_distinct() {
        let a = Factory::assemble(Widget { label: "a" });
        let b = Factory::assemble(Widget { label: "b" });

        assert_ne!(a, b);
    }
}
