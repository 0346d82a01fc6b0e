//! Benchmarks for the deferred-refresh scheduler.
//!
//! Benchmarks cover:
//! - Scheduling throughput (absolute and relative helpers)
//! - Drain passes over mixed due/pending sets
//! - Cancellation against a populated pending set

use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use refresh_scheduler::core::{AppResult, TaskQueue};
use refresh_scheduler::infra::{Invalidator, QueryKey, StaleMap};

fn noop() -> AppResult<()> {
    Ok(())
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    group.throughput(Throughput::Elements(1));

    group.bench_function("schedule_at", |b| {
        let queue = TaskQueue::new();
        let due = UNIX_EPOCH + Duration::from_secs(60);
        b.iter(|| {
            queue.schedule_at(noop, black_box(due)).unwrap();
        });
    });

    group.bench_function("schedule_after", |b| {
        let queue = TaskQueue::new();
        b.iter(|| {
            queue.schedule_after(noop, black_box(30.0)).unwrap();
        });
    });

    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");

    for size in [100_usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("half_due", size), &size, |b, &size| {
            let mut rng = rand::rng();
            b.iter_batched(
                || {
                    let queue = TaskQueue::new();
                    let stale = Arc::new(StaleMap::new());
                    for i in 0..size {
                        // Half the set is due at drain time, with jitter.
                        let due_ms: u64 = if i % 2 == 0 {
                            rng.random_range(1..=1_000)
                        } else {
                            rng.random_range(2_000..=3_000)
                        };
                        let key = QueryKey::new(vec!["bench".to_string(), i.to_string()]);
                        queue
                            .schedule_at(
                                Invalidator::new(Arc::clone(&stale), key),
                                UNIX_EPOCH + Duration::from_millis(due_ms),
                            )
                            .unwrap();
                    }
                    queue
                },
                |queue| {
                    black_box(queue.drain(1_500));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");

    group.bench_function("cancel_in_1000", |b| {
        b.iter_batched(
            || {
                let queue = TaskQueue::new();
                let mut target = None;
                for i in 0..1_000 {
                    let id = queue.schedule_after(noop, 60.0).unwrap();
                    if i == 500 {
                        target = Some(id);
                    }
                }
                (queue, target.unwrap())
            },
            |(queue, id)| {
                black_box(queue.cancel(id));
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_schedule, bench_drain, bench_cancel);
criterion_main!(benches);
