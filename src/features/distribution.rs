//! Distribution shape statistics.
//!
//! Moment estimators use `n` denominators, which is also what the
//! Jarque-Bera statistic is defined on.

use serde::Serialize;

use crate::utils::stats::{central_moments, chi_squared_sf};

/// Returns the skewness (third standardized moment, biased estimator).
///
/// Zero for a series without spread; NaN for fewer than 3 values.
pub fn skewness(series: &[f64]) -> f64 {
    if series.len() < 3 {
        return f64::NAN;
    }
    let (_, m2, m3, _) = central_moments(series);
    if m2 < 1e-300 {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// Returns the excess kurtosis (normal distribution = 0).
pub fn excess_kurtosis(series: &[f64]) -> f64 {
    pearson_kurtosis(series) - 3.0
}

/// Returns the Pearson kurtosis (normal distribution = 3).
pub fn pearson_kurtosis(series: &[f64]) -> f64 {
    if series.len() < 4 {
        return f64::NAN;
    }
    let (_, m2, _, m4) = central_moments(series);
    if m2 < 1e-300 {
        return f64::NAN;
    }
    m4 / (m2 * m2)
}

/// Jarque-Bera normality test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JarqueBeraResult {
    /// `n/6 * (S^2 + K^2/4)`
    pub statistic: f64,
    /// Chi-squared(2) survival probability of the statistic.
    pub p_value: f64,
}

/// Jarque-Bera test of normality.
///
/// Large statistics (small p-values) indicate skewness or excess kurtosis
/// inconsistent with a normal distribution. No verdict is attached.
pub fn jarque_bera(series: &[f64]) -> JarqueBeraResult {
    let n = series.len() as f64;
    let s = skewness(series);
    let k = excess_kurtosis(series);
    if s.is_nan() || k.is_nan() {
        return JarqueBeraResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
        };
    }

    let statistic = n / 6.0 * (s * s + k * k / 4.0);
    JarqueBeraResult {
        statistic,
        p_value: chi_squared_sf(statistic, 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn skewness_of_symmetric_data_is_zero() {
        assert_relative_eq!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn skewness_sign_follows_tail() {
        assert!(skewness(&[1.0, 1.0, 1.0, 1.0, 10.0]) > 0.0);
        assert!(skewness(&[10.0, 10.0, 10.0, 10.0, 1.0]) < 0.0);
    }

    #[test]
    fn kurtosis_of_uniform_grid() {
        // Population kurtosis of [-2..2] is 6.8 / 4 = 1.7
        let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(pearson_kurtosis(&x), 1.7, epsilon = 1e-12);
        assert_relative_eq!(excess_kurtosis(&x), -1.3, epsilon = 1e-12);
    }

    #[test]
    fn kurtosis_needs_spread() {
        assert!(pearson_kurtosis(&[2.0; 10]).is_nan());
        assert!(pearson_kurtosis(&[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn jarque_bera_matches_formula() {
        let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let jb = jarque_bera(&x);
        // n/6 * (0 + 1.69/4)
        assert_relative_eq!(jb.statistic, 5.0 / 6.0 * 1.69 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(jb.p_value, (-jb.statistic / 2.0).exp(), epsilon = 1e-10);
    }

    #[test]
    fn jarque_bera_rejects_heavy_tails() {
        let mut x: Vec<f64> = (0..200).map(|i| ((i * 37) % 11) as f64 / 10.0 - 0.5).collect();
        x[50] = 25.0;
        x[150] = -25.0;
        let jb = jarque_bera(&x);
        assert!(jb.statistic > 100.0);
        assert!(jb.p_value < 0.01);
    }

    #[test]
    fn jarque_bera_short_series_is_nan() {
        assert!(jarque_bera(&[1.0, 2.0]).statistic.is_nan());
    }
}
