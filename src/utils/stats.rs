//! Moments and the normal/chi-squared distribution helpers used by the tests.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Quantile function of the standard normal distribution.
///
/// Saturates to `-inf` for `p <= 0` and `+inf` for `p >= 1`.
///
/// # Example
/// ```
/// use tickercast::utils::quantile_normal;
///
/// // two-sided 95% interval
/// let z = quantile_normal(0.975);
/// assert!((z - 1.959964).abs() < 1e-5);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Cumulative distribution function of the standard normal distribution.
pub fn normal_cdf(x: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Survival function `P(X > x)` of a chi-squared distribution.
///
/// Returns `1.0` for non-positive `x` and NaN for a non-positive `df`.
pub fn chi_squared_sf(x: f64, df: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    match ChiSquared::new(df) {
        Ok(dist) => dist.sf(x),
        Err(_) => f64::NAN,
    }
}

/// Arithmetic mean, NaN when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (`n - 1` denominator), NaN below two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Biased central moments `(mean, m2, m3, m4)` with `n` denominators.
pub fn central_moments(values: &[f64]) -> (f64, f64, f64, f64) {
    let m = mean(values);
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in values {
        let d = x - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m, m2 / n, m3 / n, m4 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_normal_known_values() {
        assert_relative_eq!(quantile_normal(0.5), 0.0, epsilon = 1e-9);
        assert_relative_eq!(quantile_normal(0.975), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(quantile_normal(0.025), -1.959964, epsilon = 1e-5);
        assert_relative_eq!(quantile_normal(0.995), 2.575829, epsilon = 1e-5);
    }

    #[test]
    fn quantile_normal_boundary_values() {
        assert_eq!(quantile_normal(0.0), f64::NEG_INFINITY);
        assert_eq!(quantile_normal(1.0), f64::INFINITY);
    }

    #[test]
    fn normal_cdf_is_symmetric() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(1.3) + normal_cdf(-1.3), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn chi_squared_sf_known_values() {
        // df = 2 has closed form exp(-x/2)
        assert_relative_eq!(chi_squared_sf(3.0, 2.0), (-1.5_f64).exp(), epsilon = 1e-10);
        // 95th percentile of chi2(10) is 18.307
        assert_relative_eq!(chi_squared_sf(18.307, 10.0), 0.05, epsilon = 1e-4);
        assert_eq!(chi_squared_sf(0.0, 5.0), 1.0);
        assert!(chi_squared_sf(1.0, 0.0).is_nan());
    }

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn variance_calculates_correctly() {
        // Sample variance of [1, 2, 3, 4, 5] = 2.5
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert!(variance(&[1.0]).is_nan());
        assert_relative_eq!(std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn central_moments_of_symmetric_data() {
        let (m, m2, m3, m4) = central_moments(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_relative_eq!(m, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m2, 2.0, epsilon = 1e-12);
        assert_relative_eq!(m3, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m4, 6.8, epsilon = 1e-12);
    }
}
