//! Capability cast benchmarks.
//!
//! Measures the cast walk over a five-level class hierarchy: self-identity
//! hits, interface hits at the leaf and at the root, and full-walk misses.
//!
//! Run with: `cargo bench --bench cast`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kinship::{ClassSpec, InterfaceSpec, Resolution};
use std::sync::LazyLock;

#[allow(dead_code)]
struct Level([u8; 16]);

static ROOT_IFACE: LazyLock<InterfaceSpec> =
    LazyLock::new(|| InterfaceSpec::declare("BenchRootIface", &[]));
static LEAF_IFACE: LazyLock<InterfaceSpec> =
    LazyLock::new(|| InterfaceSpec::declare("BenchLeafIface", &[&ROOT_IFACE]));
static STRANGER: LazyLock<InterfaceSpec> =
    LazyLock::new(|| InterfaceSpec::declare("BenchStranger", &[]));

static L0: LazyLock<ClassSpec> = LazyLock::new(|| {
    ClassSpec::compose::<Level>("BenchL0").implements(&ROOT_IFACE).finish()
});
static L1: LazyLock<ClassSpec> =
    LazyLock::new(|| ClassSpec::compose::<Level>("BenchL1").extends(&L0).finish());
static L2: LazyLock<ClassSpec> =
    LazyLock::new(|| ClassSpec::compose::<Level>("BenchL2").extends(&L1).finish());
static L3: LazyLock<ClassSpec> =
    LazyLock::new(|| ClassSpec::compose::<Level>("BenchL3").extends(&L2).finish());
static LEAF: LazyLock<ClassSpec> = LazyLock::new(|| {
    ClassSpec::compose::<Level>("BenchLeaf")
        .extends(&L3)
        .implements(&LEAF_IFACE)
        .finish()
});

fn bench_self_identity(c: &mut Criterion) {
    let leaf: &'static ClassSpec = &LEAF;

    c.bench_function("cast_self_identity", |b| {
        b.iter(|| {
            let hit = leaf.resolve(black_box(leaf.id()));
            black_box(hit);
        });
    });
}

fn bench_interface_hits(c: &mut Criterion) {
    let leaf: &'static ClassSpec = &LEAF;

    let mut group = c.benchmark_group("cast_interface");

    group.bench_function("own_interface", |b| {
        b.iter(|| {
            let hit = leaf.resolve(black_box(LEAF_IFACE.id()));
            black_box(hit);
        });
    });

    // ROOT_IFACE is reachable both through the leaf's own interface
    // ancestry and through the root class; the walk stops at the first.
    group.bench_function("inherited_interface", |b| {
        b.iter(|| {
            let hit = leaf.resolve(black_box(ROOT_IFACE.id()));
            black_box(hit);
        });
    });

    group.finish();
}

fn bench_ancestor_and_miss(c: &mut Criterion) {
    let leaf: &'static ClassSpec = &LEAF;
    let root: &'static ClassSpec = &L0;

    let mut group = c.benchmark_group("cast_walk");

    group.bench_function("ancestor_class", |b| {
        b.iter(|| {
            let hit = leaf.resolve(black_box(root.id()));
            assert!(matches!(hit, Some(Resolution::AncestorClass(_))));
            black_box(hit);
        });
    });

    group.bench_function("full_walk_miss", |b| {
        b.iter(|| {
            let miss = leaf.resolve(black_box(STRANGER.id()));
            black_box(miss);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_self_identity,
    bench_interface_hits,
    bench_ancestor_and_miss
);
criterion_main!(benches);
