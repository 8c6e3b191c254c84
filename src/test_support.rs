//! Deterministic synthetic series shared by unit tests.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::PriceSeries;

/// Standard normal draws (Box-Muller) from a seeded generator.
pub(crate) fn white_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
            let u2: f64 = rng.gen();
            (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
        })
        .collect()
}

/// AR(1) process `x_t = phi * x_{t-1} + e_t` with unit-variance shocks.
pub(crate) fn ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
    let shocks = white_noise(n, seed);
    let mut x = vec![0.0; n];
    x[0] = shocks[0];
    for t in 1..n {
        x[t] = phi * x[t - 1] + shocks[t];
    }
    x
}

/// Consecutive calendar dates starting 2022-01-03.
pub(crate) fn dates(n: usize) -> Vec<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap_or_default();
    (0..n).map(|i| base + Duration::days(i as i64)).collect()
}

/// Geometric random walk prices with ~1% daily volatility.
pub(crate) fn price_series(n: usize, seed: u64) -> PriceSeries {
    let shocks = white_noise(n, seed);
    let mut price = 100.0;
    let prices = shocks
        .iter()
        .map(|z| {
            price *= 1.0 + 0.0005 + 0.01 * z;
            price
        })
        .collect();
    PriceSeries::new("SYN", dates(n), prices).unwrap()
}
