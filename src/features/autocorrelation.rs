//! Autocorrelation and partial autocorrelation profiles.

use serde::Serialize;

use crate::utils::stats::mean;

/// Returns the autocorrelation at a specific lag.
///
/// Uses the `n`-denominator autocovariance, so the estimates form a positive
/// semi-definite sequence.
///
/// # Arguments
/// * `series` - Input time series
/// * `lag` - Lag value
pub fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    if series.len() <= lag {
        return f64::NAN;
    }

    let m = mean(series);
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &x) in series.iter().enumerate() {
        denominator += (x - m).powi(2);
        if i >= lag {
            numerator += (x - m) * (series[i - lag] - m);
        }
    }

    if denominator < 1e-300 {
        return 0.0;
    }

    numerator / denominator
}

/// Autocorrelations for lags `0..=nlags`.
pub fn acf(series: &[f64], nlags: usize) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    let nlags = nlags.min(n - 1);

    let m = mean(series);
    let centered: Vec<f64> = series.iter().map(|x| x - m).collect();
    let c0: f64 = centered.iter().map(|x| x * x).sum();

    (0..=nlags)
        .map(|k| {
            if c0 < 1e-300 {
                return if k == 0 { 1.0 } else { 0.0 };
            }
            let ck: f64 = centered
                .iter()
                .skip(k)
                .zip(centered.iter())
                .map(|(a, b)| a * b)
                .sum();
            ck / c0
        })
        .collect()
}

/// Partial autocorrelations for lags `0..=nlags`.
///
/// Uses the Durbin-Levinson recursion on [`acf`]. Once the recursion becomes
/// singular the remaining lags are NaN.
pub fn pacf(series: &[f64], nlags: usize) -> Vec<f64> {
    let r = acf(series, nlags);
    if r.is_empty() {
        return r;
    }
    let nlags = r.len() - 1;

    let mut out = Vec::with_capacity(nlags + 1);
    out.push(1.0);

    // phi[j] holds phi_{k-1, j+1}
    let mut phi: Vec<f64> = Vec::with_capacity(nlags);
    let mut singular = false;

    for k in 1..=nlags {
        if singular {
            out.push(f64::NAN);
            continue;
        }

        let mut num = r[k];
        let mut denom = 1.0;
        for (j, &coef) in phi.iter().enumerate() {
            num -= coef * r[k - 1 - j];
            denom -= coef * r[j + 1];
        }

        if denom.abs() < 1e-12 {
            singular = true;
            out.push(f64::NAN);
            continue;
        }

        let phi_kk = num / denom;
        let previous = phi.clone();
        for j in 0..phi.len() {
            phi[j] = previous[j] - phi_kk * previous[k - 2 - j];
        }
        phi.push(phi_kk);
        out.push(phi_kk);
    }

    out
}

/// Parallel ACF and PACF sequences with their lag indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcfProfile {
    pub lags: Vec<usize>,
    pub acf: Vec<f64>,
    pub pacf: Vec<f64>,
}

impl AcfProfile {
    /// Compute both profiles up to `max_lags`, capped at `len - 1`.
    pub fn compute(series: &[f64], max_lags: usize) -> Self {
        let acf = acf(series, max_lags);
        let pacf = pacf(series, max_lags);
        Self {
            lags: (0..acf.len()).collect(),
            acf,
            pacf,
        }
    }

    /// Highest lag included.
    pub fn max_lag(&self) -> usize {
        self.lags.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ar1;
    use approx::assert_relative_eq;

    #[test]
    fn acf_lag_zero_is_one() {
        let values = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        let r = acf(&values, 3);
        assert_eq!(r.len(), 4);
        assert_relative_eq!(r[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn acf_matches_single_lag_function() {
        let values = ar1(0.6, 120, 1);
        let r = acf(&values, 10);
        for (lag, value) in r.iter().enumerate() {
            assert_relative_eq!(*value, autocorrelation(&values, lag), epsilon = 1e-12);
        }
    }

    #[test]
    fn acf_caps_lags_at_length() {
        let r = acf(&[1.0, 2.0, 4.0], 40);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn pacf_first_lag_equals_acf() {
        let values = ar1(0.6, 200, 2);
        let r = acf(&values, 5);
        let p = pacf(&values, 5);
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], r[1], epsilon = 1e-12);
    }

    #[test]
    fn pacf_second_lag_formula() {
        let values = ar1(0.5, 150, 3);
        let r = acf(&values, 2);
        let p = pacf(&values, 2);
        let expected = (r[2] - r[1] * r[1]) / (1.0 - r[1] * r[1]);
        assert_relative_eq!(p[2], expected, epsilon = 1e-12);
    }

    #[test]
    fn pacf_cuts_off_for_ar1() {
        let values = ar1(0.7, 500, 4);
        let p = pacf(&values, 6);
        assert!(p[1] > 0.5);
        for lag in 2..=6 {
            assert!(p[lag].abs() < 0.2, "lag {lag}: {}", p[lag]);
        }
    }

    #[test]
    fn profile_is_parallel() {
        let values = ar1(0.3, 30, 5);
        let profile = AcfProfile::compute(&values, 40);
        assert_eq!(profile.lags.len(), 30);
        assert_eq!(profile.acf.len(), profile.pacf.len());
        assert_eq!(profile.max_lag(), 29);
    }
}
