//! Reference lifecycle across handles, views, and holders.
//!
//! Exercises shared refcounting, the handle/view widening rules, holder
//! narrowing, and thread-safety of both instance sharing and first-use
//! identity materialization.

mod common;

use common::{Base, Derived};
use kinship::{Holder, ManagedClass};
use std::sync::Barrier;

#[test]
fn test_factory_result_is_sole_owner() {
    let base = Base::create(1);
    assert_eq!(base.refcount(), 1);
}

#[test]
fn test_views_and_handles_share_one_count() {
    let handle = Base::create(1);
    let second = handle.clone();
    let view = handle.view();

    assert_eq!(handle.refcount(), 3);
    assert_eq!(view.refcount(), 3);

    drop(second);
    drop(view);
    assert_eq!(handle.refcount(), 1);
}

#[test]
fn test_mutation_through_handle_visible_everywhere() {
    let handle = Derived::create(1);
    let view = handle.view();

    handle.write().weight = 99;
    handle.write().name.push_str("updated");

    assert_eq!(view.read().weight, 99);
    assert_eq!(view.read().name, "updated");
}

#[test]
fn test_holder_defers_flavor_to_first_use() {
    let handle = Derived::create(4);

    // A collection slot can hold both flavors uniformly.
    let slots: Vec<Holder<Derived>> = vec![
        Holder::Empty,
        handle.clone().into(),
        handle.view().into(),
    ];

    assert!(slots[0].is_empty());
    assert!(slots[1].to_handle().is_some());
    assert!(slots[2].to_handle().is_none());
    assert_eq!(slots[2].to_view().unwrap().read().weight, 4);
}

#[test]
fn test_dropping_last_reference_destroys_instance() {
    let handle = Base::create(7);
    let holder: Holder<Base> = handle.view().into();

    assert_eq!(handle.refcount(), 2);
    drop(handle);

    // The holder keeps the instance alive on its own.
    let survivor = holder.to_view().unwrap();
    assert_eq!(survivor.read().weight, 7);
    assert_eq!(survivor.refcount(), 2);
}

#[test]
fn test_handles_shared_across_threads() {
    let handle = Derived::create(0);
    let barrier = std::sync::Arc::new(Barrier::new(4));

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let shared = handle.clone();
            let barrier = std::sync::Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    shared.write().weight += 1;
                }
                // Reads interleave with the other writers without blocking.
                assert!(shared.read().weight >= 100);
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(handle.read().weight, 400);
    assert_eq!(handle.refcount(), 1);
}

#[test]
fn test_identity_materialization_races_to_one_token() {
    let barrier = std::sync::Arc::new(Barrier::new(8));

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let barrier = std::sync::Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                Derived::class_id()
            })
        })
        .collect();

    let tokens: Vec<_> =
        threads.into_iter().map(|t| t.join().unwrap()).collect();

    assert!(tokens.iter().all(|token| *token == tokens[0]));
}
