//! # Component Pool Benchmark
//!
//! REQUIREMENTS:
//! - Rent/return churn never allocates once the pool is warm
//! - Growth cost is amortized by doubling
//!
//! Run with: `cargo bench --package fall_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fall_core::{ComponentPool, KIND_COUNT};

/// Benchmark: rent from an empty pool, growing from one group.
fn bench_rent_with_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("rent_with_growth");

    for count in [1_000u64, 100_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut pool: ComponentPool<u64> = ComponentPool::new(1);
                for _ in 0..count {
                    black_box(pool.rent());
                }
                pool.relocations()
            });
        });
    }

    group.finish();
}

/// Benchmark: steady-state churn, every rent served from the free queue.
fn bench_warm_churn(c: &mut Criterion) {
    let mut pool: ComponentPool<u64> = ComponentPool::new(4096);
    let mut live: Vec<_> = (0..4096).map(|_| pool.rent()).collect();

    c.bench_function("warm_churn_4096", |b| {
        b.iter(|| {
            for id in live.drain(..) {
                pool.ret(id);
            }
            for _ in 0..4096 {
                let id = pool.rent();
                pool.get_mut(id.index() as usize)[0] = Some(u64::from(id.generation()));
                live.push(id);
            }
        });
    });
}

/// Benchmark: walk every group's slots, as the world tick does.
fn bench_group_walk(c: &mut Criterion) {
    let mut pool: ComponentPool<u64> = ComponentPool::new(65_536);
    for i in 0..65_536u64 {
        let id = pool.rent();
        pool.get_mut(id.index() as usize)[(i as usize) % KIND_COUNT] = Some(i);
    }

    c.bench_function("group_walk_65536", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for index in 0..pool.count() {
                sum += pool.get(index).iter().flatten().sum::<u64>();
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_rent_with_growth, bench_warm_churn, bench_group_walk);
criterion_main!(benches);
