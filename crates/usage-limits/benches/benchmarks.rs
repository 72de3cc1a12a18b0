//! Usage limit benchmarks
//!
//! - Limiter use and exhaustion
//! - Synchronous group fan-out by group size
//! - Group disuse cascade

use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use usage_limits::prelude::*;

// ============ LIMITER BENCHMARKS ============

fn bench_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("limiter");

    group.bench_function("use_until_exhausted", |b| {
        b.iter(|| {
            let limiter = UsageLimiter::with_limit(
                |n: u64| {
                    black_box(n);
                },
                64,
            );
            for n in 0..128 {
                limiter.consume(black_box(n)).unwrap();
            }
            black_box(limiter.is_usable())
        });
    });

    group.finish();
}

// ============ GROUP BENCHMARKS ============

fn bench_group_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_use_sync");

    for size in [1usize, 16, 256].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("members", size), size, |b, &size| {
            let usage = UsageGroup::with_members(
                (0..size).map(|_| Rc::new(UsageLimiter::<u64>::noop(u64::MAX))),
            );
            b.iter(|| usage.use_sync(black_box(1)).unwrap());
        });
    }

    group.finish();
}

fn bench_group_disuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_disuse");

    for size in [16usize, 256].iter() {
        group.bench_with_input(BenchmarkId::new("members", size), size, |b, &size| {
            b.iter(|| {
                let usage = UsageGroup::with_members(
                    (0..size).map(|_| Rc::new(UsageLimiter::<u64>::noop(1))),
                );
                usage.disuse().unwrap();
                black_box(usage.is_disused())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_limiter, bench_group_fan_out, bench_group_disuse);
criterion_main!(benches);
