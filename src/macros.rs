//! Declaration macros for managed interfaces and classes.
//!
//! These macros are the one-place declaration surface: a class author names
//! the parent, the interfaces (up to 16, in capability lookup order), and
//! the constructors, and the macros generate the composition glue: the
//! [`ManagedClass`](crate::ManagedClass) impl, the identity registration,
//! and one public `create*` entry point per declared constructor.

/// Declares a capability interface as a `'static` descriptor.
///
/// The static's identifier doubles as the registered interface name. An
/// optional `extends (..)` list names the interfaces this one extends, in
/// the order their ancestry is searched during capability lookup.
///
/// # Example
///
/// ```rust
/// use kinship::managed_interface;
///
/// managed_interface!(pub DocSized);
/// managed_interface!(pub DocKeyed extends (DocSized));
///
/// assert!(DocKeyed.satisfies(DocSized.id()));
/// ```
///
/// # Panics
///
/// First use panics if the interface name is already registered.
#[macro_export]
macro_rules! managed_interface {
    ($vis:vis $name:ident extends ( $($parent:path),* $(,)? ) $(;)?) => {
        #[allow(non_upper_case_globals)]
        $vis static $name: ::std::sync::LazyLock<$crate::InterfaceSpec> =
            ::std::sync::LazyLock::new(|| {
                $crate::InterfaceSpec::declare(
                    ::core::stringify!($name),
                    &[$( &*$parent ),*],
                )
            });
    };
    ($vis:vis $name:ident $(;)?) => {
        $crate::managed_interface!($vis $name extends ());
    };
}

/// Declares a managed class: parent, interfaces, constructors, clone hook.
///
/// Generates, for the named type:
/// - the [`ManagedClass`](crate::ManagedClass) impl, materializing the
///   composition node exactly once (identity token, parent link, interface
///   chain, declared footprint)
/// - one public `create*` entry point per declared constructor, each
///   running the constructor body to completion and wrapping the result in
///   a [`Handle`](crate::Handle) via the factory
/// - optionally, a clone override (`clone = <fn>`); without it the class
///   keeps the default fail-with-`CloneNotSupported` behavior
///
/// An `abstract class` declaration composes identity and interfaces but
/// generates no `create*` entry points.
///
/// # Example
///
/// ```rust
/// use kinship::{managed_class, managed_interface, ManagedClass};
///
/// managed_interface!(DocNamed);
///
/// struct Tag {
///     label: String,
/// }
///
/// managed_class! {
///     class Tag implements (DocNamed) {
///         create(label: String) => Tag { label };
///         create_empty() => Tag { label: String::new() };
///     }
///     clone = |tag: &Tag| Tag { label: tag.label.clone() };
/// }
///
/// let tag = Tag::create("alpha".to_string());
/// assert!(tag.cast(DocNamed.id()).is_some());
/// let copy = tag.clone_instance().unwrap();
/// assert_eq!(copy.read().label, "alpha");
/// ```
///
/// # Construction-signature mismatch
///
/// An argument list with no matching declared constructor has no entry
/// point, so it is rejected when the caller is compiled; there is no
/// runtime fallback:
///
/// ```compile_fail
/// use kinship::managed_class;
///
/// struct Single {
///     value: i32,
/// }
///
/// managed_class! {
///     class Single {
///         create(value: i32) => Single { value };
///     }
/// }
///
/// // No zero-argument constructor was declared.
/// let bad = Single::create();
/// ```
///
/// # Panics
///
/// First materialization of the composition node panics on a duplicate
/// class name or on more than 16 declared interfaces.
#[macro_export]
macro_rules! managed_class {
    (
        $vis:vis class $name:ident
        $(extends ( $parent:path ))?
        $(implements ( $($iface:path),* $(,)? ))?
        {
            $(
                $(#[$create_meta:meta])*
                $create:ident ( $($arg:ident : $argty:ty),* $(,)? ) => $body:expr ;
            )*
        }
        $(clone = $dup:expr ;)?
    ) => {
        $crate::managed_class! {
            @spec $name
            $(extends ( $parent ))?
            $(implements ( $($iface),* ))?
            $(clone = $dup ;)?
        }

        impl $name {
            $(
                $(#[$create_meta])*
                #[must_use]
                $vis fn $create($($arg: $argty),*) -> $crate::Handle<$name> {
                    $crate::Factory::<$name>::assemble($body)
                }
            )*
        }
    };

    (
        $vis:vis abstract class $name:ident
        $(extends ( $parent:path ))?
        $(implements ( $($iface:path),* $(,)? ))?
        $(clone = $dup:expr ;)? $(;)?
    ) => {
        $crate::managed_class! {
            @spec $name
            $(extends ( $parent ))?
            $(implements ( $($iface),* ))?
            $(clone = $dup ;)?
        }
    };

    (
        @spec $name:ident
        $(extends ( $parent:path ))?
        $(implements ( $($iface:path),* ))?
        $(clone = $dup:expr ;)?
    ) => {
        impl $crate::ManagedClass for $name {
            fn spec() -> &'static $crate::ClassSpec {
                static SPEC: ::std::sync::OnceLock<$crate::ClassSpec> =
                    ::std::sync::OnceLock::new();
                SPEC.get_or_init(|| {
                    $crate::ClassSpec::compose::<$name>(::core::stringify!($name))
                        $(.extends(<$parent as $crate::ManagedClass>::spec()))?
                        $($(.implements(&*$iface))*)?
                        .finish()
                })
            }

            $(
                fn duplicate(&self) -> $crate::Result<Self> {
                    ::core::result::Result::Ok(($dup)(self))
                }
            )?
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::runtime::registry;
    use crate::{Holder, ManagedClass};

    managed_interface!(MacroTrackable);
    managed_interface!(MacroAuditable extends (MacroTrackable));

    struct MacroBase {
        id: u32,
    }

    managed_class! {
        class MacroBase implements (MacroTrackable) {
            create(id: u32) => MacroBase { id };
        }
    }

    struct MacroLeaf {
        id: u32,
        score: f64,
    }

    managed_class! {
        class MacroLeaf extends (MacroBase) implements (MacroAuditable) {
            create(id: u32) => MacroLeaf { id, score: 0.0 };
            create_scored(id: u32, score: f64) => MacroLeaf { id, score };
        }
        clone = |leaf: &MacroLeaf| MacroLeaf { id: leaf.id, score: leaf.score };
    }

    struct MacroGhost;

    managed_class! {
        abstract class MacroGhost implements (MacroTrackable);
    }

    #[test]
    fn test_macro_registers_names() {
        let _ = MacroBase::spec();
        let _ = MacroLeaf::spec();

        assert_eq!(registry::lookup("MacroBase"), Some(MacroBase::class_id()));
        assert_eq!(registry::lookup("MacroLeaf"), Some(MacroLeaf::class_id()));
    }

    #[test]
    fn test_create_entry_points_per_arity() {
        let a = MacroLeaf::create(1);
        let b = MacroLeaf::create_scored(2, 9.5);

        assert_eq!(a.read().id, 1);
        assert_eq!(b.read().score, 9.5);
    }

    #[test]
    fn test_macro_wires_inheritance_and_interfaces() {
        let leaf = MacroLeaf::create(1);

        assert!(leaf.is_a(MacroBase::class_id()));
        assert!(leaf.is_a(MacroAuditable.id()));
        // Inherited through MacroBase's declared chain and through
        // MacroAuditable's ancestry alike.
        assert!(leaf.is_a(MacroTrackable.id()));
    }

    #[test]
    fn test_macro_clone_override() {
        let leaf = MacroLeaf::create_scored(7, 1.5);
        let copy = leaf.clone_instance().unwrap();

        assert_ne!(leaf, copy);
        assert_eq!(copy.read().id, 7);

        // Copies are independently owned.
        copy.write().id = 8;
        assert_eq!(leaf.read().id, 7);
    }

    #[test]
    fn test_macro_default_clone_fails() {
        let base = MacroBase::create(1);
        assert_eq!(
            base.clone_instance().unwrap_err(),
            crate::Error::CloneNotSupported { class: "MacroBase" }
        );
    }

    #[test]
    fn test_abstract_class_composes_identity() {
        let spec = MacroGhost::spec();
        assert_eq!(spec.name(), "MacroGhost");
        assert!(spec.satisfies(MacroTrackable.id()));
    }

    #[test]
    fn test_holder_over_macro_class() {
        let leaf = MacroLeaf::create(3);
        let holder: Holder<MacroLeaf> = leaf.view().into();

        assert_eq!(holder.to_view().unwrap().read().id, 3);
        assert!(holder.to_handle().is_none());
    }
}
