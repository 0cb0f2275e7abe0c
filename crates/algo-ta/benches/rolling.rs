//! Incremental rolling kernels against their naive recomputation.
//!
//! Run with: `cargo bench -p algo-ta --bench rolling`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use algo_ta::indicators::volatility::{ulcer_index, ulcer_index_naive};
use algo_ta::kernels::{
    rolling_max, rolling_max_naive, rolling_sum, rolling_sum_naive, rolling_variance,
    rolling_variance_naive,
};

fn walk(n: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut price = 100.0_f64;
    (0..n)
        .map(|_| {
            price += rng.gen_range(-1.0..1.0);
            price
        })
        .collect()
}

type Kernel = fn(&[f64], usize) -> algo_ta::Result<Vec<f64>>;

fn bench_pair(c: &mut Criterion, name: &str, fast: Kernel, naive: Kernel) {
    let data = walk(20_000);
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(data.len() as u64));
    for period in [10, 50, 200] {
        group.bench_with_input(BenchmarkId::new("incremental", period), &period, |b, &p| {
            b.iter(|| fast(black_box(&data), p))
        });
        group.bench_with_input(BenchmarkId::new("naive", period), &period, |b, &p| {
            b.iter(|| naive(black_box(&data), p))
        });
    }
    group.finish();
}

fn bench_rolling(c: &mut Criterion) {
    bench_pair(c, "rolling_sum", rolling_sum, rolling_sum_naive);
    bench_pair(c, "rolling_variance", rolling_variance, rolling_variance_naive);
    bench_pair(c, "rolling_max", rolling_max, rolling_max_naive);
    bench_pair(c, "ulcer_index", ulcer_index, ulcer_index_naive);
}

criterion_group!(benches, bench_rolling);
criterion_main!(benches);
