use cow_btree::{mem::MemStore, Tree};
use criterion::{criterion_group, criterion_main, Criterion};

fn tree_insert_n(n: u32) {
    let mut store = MemStore::new();
    let mut tree = Tree::new();
    for key in 0..n {
        let k = key.to_be_bytes();
        tree.insert(&mut store, &k, &[0, 1, 2, 3, 4]);
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("tree_insert 10", |b| {
        b.iter(|| tree_insert_n(10));
    });
    c.bench_function("tree_insert 100", |b| {
        b.iter(|| tree_insert_n(100));
    });
    c.bench_function("tree_insert 1,000", |b| {
        b.iter(|| tree_insert_n(1_000));
    });
    c.bench_function("tree_insert 10,000", |b| {
        b.iter(|| tree_insert_n(10_000));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
