//! Benchmarks for ARIMA fitting and order search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickercast::models::arima::{fit, ArimaOrder, FitOptions, OrderSearch};
use tickercast::validation::{adf_test, kpss_test};

/// Seeded AR(1) returns with uniform shocks.
fn generate_returns(n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut prev = 0.0;
    (0..n)
        .map(|_| {
            let shock: f64 = rng.gen_range(-0.5..0.5);
            prev = 0.3 * prev + 0.02 * shock;
            prev
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("arima_fit");

    for size in [250, 500, 1000].iter() {
        let returns = generate_returns(*size);

        group.bench_with_input(BenchmarkId::new("ARIMA(1,0,1)", size), size, |b, _| {
            b.iter(|| fit(black_box(&returns), ArimaOrder::new(1, 0, 1), &FitOptions::default()))
        });

        group.bench_with_input(BenchmarkId::new("ARIMA(2,1,2)", size), size, |b, _| {
            b.iter(|| fit(black_box(&returns), ArimaOrder::new(2, 1, 2), &FitOptions::default()))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_search");
    group.sample_size(10);

    for size in [250, 1000].iter() {
        let returns = generate_returns(*size);

        group.bench_with_input(BenchmarkId::new("p<=3,q<=3", size), size, |b, _| {
            let search = OrderSearch::new(0, 3, 3);
            b.iter(|| search.run(black_box(&returns)))
        });
    }

    group.finish();
}

fn bench_stationarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("stationarity");
    let returns = generate_returns(1000);

    group.bench_function("ADF", |b| b.iter(|| adf_test(black_box(&returns), None)));
    group.bench_function("KPSS", |b| b.iter(|| kpss_test(black_box(&returns), None)));

    group.finish();
}

criterion_group!(benches, bench_fit, bench_search, bench_stationarity);
criterion_main!(benches);
