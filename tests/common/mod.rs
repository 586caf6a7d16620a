// Common fixtures for integration tests.
//
// Builds the reference hierarchy the suites share: `Base` implements one
// interface, `Derived` extends it adding another plus a clone override, and
// `Probe` declares two sibling interfaces with a shared ancestor for the
// lookup-order tests.

#![allow(dead_code)]

use kinship::{managed_class, managed_interface};

managed_interface!(pub Weighted);
managed_interface!(pub Named);
managed_interface!(pub Unrelated);

// Diamond fixture: both siblings extend Queryable.
managed_interface!(pub Queryable);
managed_interface!(pub Primary extends (Queryable));
managed_interface!(pub Secondary extends (Queryable));

pub struct Base {
    pub weight: u32,
}

managed_class! {
    pub class Base implements (Weighted) {
        create(weight: u32) => Base { weight };
    }
}

pub struct Derived {
    pub weight: u32,
    pub name: String,
}

managed_class! {
    pub class Derived extends (Base) implements (Weighted, Named) {
        create(weight: u32) => Derived { weight, name: String::new() };
        create_named(weight: u32, name: String) => Derived { weight, name };
    }
    clone = |d: &Derived| Derived { weight: d.weight, name: d.name.clone() };
}

pub struct Probe {
    pub hits: u64,
}

managed_class! {
    pub class Probe implements (Primary, Secondary) {
        create() => Probe { hits: 0 };
    }
}
