//! Stationarity tests for time series.
//!
//! The ADF and KPSS tests have opposite null hypotheses: ADF assumes a unit
//! root (non-stationary) and KPSS assumes stationarity. Rejecting the null
//! therefore means "stationary" for ADF and "non-stationary" for KPSS.

use std::fmt;

use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::utils::ols::ols;
use crate::utils::stats::normal_cdf;

/// Significance level used for stationarity verdicts.
pub const SIGNIFICANCE: f64 = 0.05;

/// Which stationarity test produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StationarityTest {
    /// Augmented Dickey-Fuller, null = unit root.
    Adf,
    /// Kwiatkowski-Phillips-Schmidt-Shin, null = level stationary.
    Kpss,
}

impl StationarityTest {
    /// Whether the null hypothesis states that the series is stationary.
    pub fn null_is_stationary(self) -> bool {
        matches!(self, Self::Kpss)
    }

    /// Plain-English null hypothesis.
    pub fn null_hypothesis(self) -> &'static str {
        match self {
            Self::Adf => "The series is non-stationary.",
            Self::Kpss => "The series is stationary.",
        }
    }

    /// Verdict for a p-value at [`SIGNIFICANCE`].
    pub fn verdict(self, p_value: f64) -> StationarityVerdict {
        let rejects_null = p_value < SIGNIFICANCE;
        StationarityVerdict {
            test: self,
            rejects_null,
            is_stationary: rejects_null != self.null_is_stationary(),
        }
    }
}

/// Decision of one stationarity test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationarityVerdict {
    pub test: StationarityTest,
    /// p-value below the significance level.
    pub rejects_null: bool,
    /// What the decision implies about the series.
    pub is_stationary: bool,
}

impl StationarityVerdict {
    /// Two-line description naming the null hypothesis and the decision.
    pub fn describe(&self, name: &str) -> String {
        let state = if self.is_stationary {
            "stationary"
        } else {
            "non-stationary"
        };
        let decision = if self.rejects_null {
            "reject H0"
        } else {
            "fail to reject H0"
        };
        format!(
            "Null Hypothesis (H0): {}\n--> {name} is {state} ({decision})",
            self.test.null_hypothesis()
        )
    }
}

/// Critical values for stationarity tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

/// Result of a stationarity test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationarityResult {
    /// Test statistic
    pub statistic: f64,
    /// Approximate p-value
    pub p_value: f64,
    /// Number of lags used
    pub lags: usize,
    /// Observations in the final regression
    pub nobs: usize,
    /// Critical values at common significance levels
    pub critical_values: CriticalValues,
    /// Decision at the 5% level
    pub verdict: StationarityVerdict,
}

impl StationarityResult {
    pub fn is_stationary(&self) -> bool {
        self.verdict.is_stationary
    }
}

/// Augmented Dickey-Fuller test with a constant.
///
/// Regression: `Δy_t = α + β y_{t-1} + Σ γ_i Δy_{t-i} + ε_t`; the statistic is
/// the t-ratio of β. The lag order is chosen by AIC over `0..=max_lags` on a
/// common sample (default `max_lags = floor(12 (n/100)^(1/4))`), then the
/// regression is refit on all usable observations.
///
/// # Errors
/// `InsufficientData` for fewer than 6 observations, `DegenerateSeries` when
/// the regression has no residual variation.
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> Result<StationarityResult> {
    let n = series.len();
    if n < 6 {
        return Err(ForecastError::InsufficientData { needed: 6, got: n });
    }

    let default_lags = (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
    let max_lags = max_lags.unwrap_or(default_lags).min(n / 2 - 2);

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let mut best_lag = 0;
    let mut best_aic = f64::INFINITY;
    for lag in 0..=max_lags {
        let (rows, y) = adf_design(series, &diff, lag, max_lags);
        let Ok(fit) = ols(&rows, &y) else { continue };
        let aic = fit.aic();
        if aic < best_aic {
            best_aic = aic;
            best_lag = lag;
        }
    }

    let (rows, y) = adf_design(series, &diff, best_lag, best_lag);
    let fit = ols(&rows, &y)?;
    if fit.rss <= f64::EPSILON * y.iter().map(|v| v * v).sum::<f64>() || fit.std_errors[1] == 0.0
    {
        return Err(ForecastError::DegenerateSeries {
            variance: fit.rss / fit.nobs as f64,
        });
    }

    let statistic = fit.t_stat(1);
    let p_value = mackinnon_p_value(statistic);

    Ok(StationarityResult {
        statistic,
        p_value,
        lags: best_lag,
        nobs: fit.nobs,
        critical_values: mackinnon_critical_values(fit.nobs),
        verdict: StationarityTest::Adf.verdict(p_value),
    })
}

/// Design rows `[1, y_{t-1}, Δy_{t-1} .. Δy_{t-lag}]` with targets `Δy_t`,
/// starting after `start` lags so that different lag orders share a sample.
fn adf_design(level: &[f64], diff: &[f64], lag: usize, start: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rows = Vec::with_capacity(diff.len().saturating_sub(start));
    let mut y = Vec::with_capacity(rows.capacity());
    for t in start..diff.len() {
        let mut row = Vec::with_capacity(lag + 2);
        row.push(1.0);
        row.push(level[t]);
        for i in 1..=lag {
            row.push(diff[t - i]);
        }
        rows.push(row);
        y.push(diff[t]);
    }
    (rows, y)
}

/// MacKinnon (1994) approximate p-value for the constant-only ADF statistic.
fn mackinnon_p_value(stat: f64) -> f64 {
    const TAU_MAX: f64 = 2.74;
    const TAU_MIN: f64 = -18.83;
    const TAU_STAR: f64 = -1.61;
    const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
    const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

    if stat.is_nan() {
        return f64::NAN;
    }
    if stat > TAU_MAX {
        return 1.0;
    }
    if stat < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if stat <= TAU_STAR { &SMALL_P } else { &LARGE_P };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * stat + c);
    normal_cdf(z)
}

/// MacKinnon (2010) finite-sample critical values, constant only.
fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    const CV_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
    const CV_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
    const CV_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

    let inv = 1.0 / nobs as f64;
    let surface = |b: [f64; 4]| b[0] + b[1] * inv + b[2] * inv * inv + b[3] * inv * inv * inv;
    CriticalValues {
        cv_1pct: surface(CV_1),
        cv_5pct: surface(CV_5),
        cv_10pct: surface(CV_10),
    }
}

/// KPSS test for level stationarity.
///
/// The long-run variance uses a Bartlett kernel; the default bandwidth is the
/// Hobijn, Franses and Ooms data-dependent choice. The p-value is
/// interpolated from the tabulated critical values and therefore clamped to
/// `[0.01, 0.10]`.
///
/// # Errors
/// `InsufficientData` for fewer than 4 observations, `DegenerateSeries` when
/// the long-run variance is not positive.
pub fn kpss_test(series: &[f64], lags: Option<usize>) -> Result<StationarityResult> {
    const CRIT: [f64; 4] = [0.347, 0.463, 0.574, 0.739];
    const PVALS: [f64; 4] = [0.10, 0.05, 0.025, 0.01];

    let n = series.len();
    if n < 4 {
        return Err(ForecastError::InsufficientData { needed: 4, got: n });
    }

    let mean = series.iter().sum::<f64>() / n as f64;
    let resid: Vec<f64> = series.iter().map(|x| x - mean).collect();

    let lags = lags
        .unwrap_or_else(|| kpss_autolag(&resid))
        .min(n - 1);

    let mut cumsum = 0.0;
    let eta = resid
        .iter()
        .map(|r| {
            cumsum += r;
            cumsum * cumsum
        })
        .sum::<f64>()
        / (n * n) as f64;

    let mut s2 = resid.iter().map(|r| r * r).sum::<f64>();
    for i in 1..=lags {
        let prod: f64 = resid[i..].iter().zip(&resid[..n - i]).map(|(a, b)| a * b).sum();
        s2 += 2.0 * prod * (1.0 - i as f64 / (lags as f64 + 1.0));
    }
    let s2 = s2 / n as f64;

    if s2 <= 0.0 || !s2.is_finite() {
        return Err(ForecastError::DegenerateSeries { variance: s2 });
    }

    let statistic = eta / s2;
    let p_value = interpolate(statistic, &CRIT, &PVALS);

    Ok(StationarityResult {
        statistic,
        p_value,
        lags,
        nobs: n,
        critical_values: CriticalValues {
            cv_1pct: CRIT[3],
            cv_5pct: CRIT[1],
            cv_10pct: CRIT[0],
        },
        verdict: StationarityTest::Kpss.verdict(p_value),
    })
}

/// Hobijn et al. (1998) bandwidth selection.
fn kpss_autolag(resid: &[f64]) -> usize {
    let n = resid.len();
    let nf = n as f64;
    let covlags = nf.powf(2.0 / 9.0) as usize;

    let mut s0 = resid.iter().map(|r| r * r).sum::<f64>() / nf;
    let mut s1 = 0.0;
    for i in 1..=covlags.min(n - 1) {
        let prod: f64 = resid[i..].iter().zip(&resid[..n - i]).map(|(a, b)| a * b).sum::<f64>()
            / (nf / 2.0);
        s0 += prod;
        s1 += i as f64 * prod;
    }
    if s0 <= 0.0 {
        return 0;
    }

    let s_hat = s1 / s0;
    let gamma = 1.1447 * (s_hat * s_hat).powf(1.0 / 3.0);
    (gamma * nf.powf(1.0 / 3.0)) as usize
}

/// Piecewise-linear interpolation over increasing `xs`, clamped at the ends.
fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if x <= xs[0] {
        return ys[0];
    }
    for i in 1..xs.len() {
        if x <= xs[i] {
            let w = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            return ys[i - 1] + w * (ys[i] - ys[i - 1]);
        }
    }
    ys[ys.len() - 1]
}

/// Joint reading of an ADF and a KPSS verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationarityConclusion {
    /// ADF rejects the unit root and KPSS does not reject stationarity.
    Stationary,
    /// ADF keeps the unit root and KPSS rejects stationarity.
    NonStationary,
    /// The tests disagree.
    Inconclusive,
}

impl StationarityConclusion {
    pub fn from_verdicts(adf: StationarityVerdict, kpss: StationarityVerdict) -> Self {
        match (adf.is_stationary, kpss.is_stationary) {
            (true, true) => Self::Stationary,
            (false, false) => Self::NonStationary,
            _ => Self::Inconclusive,
        }
    }
}

impl fmt::Display for StationarityConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Stationary => "stationary",
            Self::NonStationary => "non_stationary",
            Self::Inconclusive => "inconclusive",
        };
        f.write_str(text)
    }
}

/// Run both tests with default lag selection.
pub fn test_stationarity(
    series: &[f64],
) -> Result<(StationarityResult, StationarityResult, StationarityConclusion)> {
    let adf = adf_test(series, None)?;
    let kpss = kpss_test(series, None)?;
    let conclusion = StationarityConclusion::from_verdicts(adf.verdict, kpss.verdict);
    Ok((adf, kpss, conclusion))
}
