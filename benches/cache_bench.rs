//! Benchmarks for the timed cache.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use timed_cache::{CacheConfig, TimedCache, TimeUnit};

const HOUR_MS: i64 = 3_600_000;

fn millis_cache() -> TimedCache<String, String> {
    let config = CacheConfig::new().time_unit(TimeUnit::Milliseconds).build();
    TimedCache::new(config).unwrap()
}

/// Benchmark single-threaded add/get operations.
fn bench_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");

    let cache = millis_cache();

    // Pre-populate some keys with TTLs long enough to outlive the run
    for i in 0..10_000 {
        cache
            .add(format!("key_{}", i), format!("value_{}", i), HOUR_MS)
            .unwrap();
    }

    group.bench_function("get_existing", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("key_{}", i % 10_000);
            black_box(cache.get(&key).unwrap());
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("missing_{}", i);
            black_box(cache.get(&key).unwrap());
            i += 1;
        });
    });

    group.bench_function("contains_key", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("key_{}", i % 10_000);
            black_box(cache.contains_key(&key).unwrap());
            i += 1;
        });
    });

    // Rotating key set keeps the pending timer count bounded: most adds
    // replace an earlier entry and cancel its timer
    group.bench_function("add", |b| {
        let mut i = 0;
        b.iter(|| {
            let key = format!("add_key_{}", i % 50_000);
            cache.add(key, "value".to_string(), HOUR_MS).unwrap();
            i += 1;
        });
    });

    group.finish();
    cache.shutdown(Duration::from_secs(1));
}

/// Benchmark the cancel-and-reschedule path: every add supersedes the
/// previous timer for the same key.
fn bench_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace");

    let cache = millis_cache();

    group.bench_function("re_add_same_key", |b| {
        b.iter(|| {
            cache
                .add("hot_key".to_string(), "value".to_string(), HOUR_MS)
                .unwrap();
        });
    });

    group.finish();
    cache.shutdown(Duration::from_secs(1));
}

/// Benchmark concurrent operations.
fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8].iter() {
        let cache = millis_cache();

        // Pre-populate
        for i in 0..10_000 {
            cache
                .add(format!("key_{}", i), format!("value_{}", i), HOUR_MS)
                .unwrap();
        }

        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("mixed_ops", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|t| {
                            let cache = cache.clone();
                            std::thread::spawn(move || {
                                for i in 0..1000 {
                                    let key = format!("key_{}", (t * 1000 + i) % 10_000);
                                    if i % 5 == 0 {
                                        cache.add(key, "value".to_string(), HOUR_MS).unwrap();
                                    } else {
                                        black_box(cache.get(&key).unwrap());
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );

        cache.shutdown(Duration::from_secs(1));
    }

    group.finish();
}

criterion_group!(benches, bench_single_threaded, bench_replace, bench_concurrent);
criterion_main!(benches);
