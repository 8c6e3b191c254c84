//! ARIMA (Autoregressive Integrated Moving Average) model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference, difference_operator, integrate};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Bound on AR and MA coefficients during estimation.
const COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    /// Create a new ARIMA order.
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Number of estimated parameters: AR + MA + intercept + innovation variance.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 2
    }

    /// Fewest observations a fit accepts.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// Estimation settings.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Nelder-Mead iteration budget.
    pub max_iterations: usize,
    /// Nelder-Mead convergence tolerance.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 1e-8,
        }
    }
}

/// A fitted ARIMA model.
///
/// Holds the estimated coefficients together with the training history
/// needed to continue the recursion into the future.
#[derive(Debug, Clone, PartialEq)]
pub struct ArimaModel {
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    sigma2: f64,
    /// Training series on the original scale.
    history: Vec<f64>,
    /// Training series after `d` differences.
    differenced: Vec<f64>,
    /// One-step errors aligned with `differenced`; zero before the first
    /// predicted index.
    innovations: Vec<f64>,
}

impl ArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Mean of the differenced series.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Innovation variance.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// True when every coefficient and the innovation variance are finite.
    pub fn is_finite(&self) -> bool {
        self.ar
            .iter()
            .chain(&self.ma)
            .chain([&self.intercept, &self.sigma2])
            .all(|v| v.is_finite())
    }

    /// Point forecasts on the original scale, future shocks set to zero.
    pub fn predict(&self, horizon: usize) -> Vec<f64> {
        let mut values = self.differenced.clone();
        let mut errors = self.innovations.clone();

        for _ in 0..horizon {
            let next = one_step(&values, &errors, &self.ar, &self.ma, self.intercept);
            values.push(next);
            errors.push(0.0);
        }

        let future = &values[self.differenced.len()..];
        integrate(future, &self.history, self.order.d)
    }

    /// First `horizon` weights of the MA(inf) form of `phi(B) (1 - B)^d`.
    ///
    /// `psi[0] = 1`; the h-step forecast variance is `sigma2 * sum(psi[..h]^2)`.
    pub fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        // Full AR polynomial 1 - a_1 B - ... of phi(B)(1 - B)^d
        let phi: Vec<f64> = std::iter::once(1.0).chain(self.ar.iter().map(|a| -a)).collect();
        let delta = difference_operator(self.order.d);
        let mut poly = vec![0.0; phi.len() + delta.len() - 1];
        for (i, a) in phi.iter().enumerate() {
            for (j, b) in delta.iter().enumerate() {
                poly[i + j] += a * b;
            }
        }
        let ar_full: Vec<f64> = poly.iter().skip(1).map(|c| -c).collect();

        let mut psi = Vec::with_capacity(horizon);
        for j in 0..horizon {
            let mut value = if j == 0 {
                1.0
            } else {
                self.ma.get(j - 1).copied().unwrap_or(0.0)
            };
            for (i, a) in ar_full.iter().enumerate() {
                if j > i {
                    value += a * psi[j - 1 - i];
                }
            }
            psi.push(value);
        }
        psi
    }
}

/// Result of fitting one ARIMA order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFitResult {
    pub order: ArimaOrder,
    pub aic: f64,
    pub bic: f64,
    /// Innovation variance (mean squared residual).
    pub sigma2: f64,
    /// In-sample one-step residuals on the differenced scale.
    pub residuals: Vec<f64>,
    #[serde(skip)]
    pub model: ArimaModel,
}

/// Fit an ARIMA model by conditional sum of squares.
///
/// The series is differenced `d` times; intercept, AR and MA coefficients are
/// then estimated with a bounded Nelder-Mead search (coefficients restricted
/// to `(-0.99, 0.99)`). Information criteria use the Gaussian conditional
/// log-likelihood with `p + q + 2` parameters.
///
/// # Errors
/// * `InsufficientData` when the series is shorter than `d + max(p, q) + 2`
/// * `ModelFit` when the optimizer does not converge or the estimate is not
///   usable (non-finite parameters, non-positive residual variance)
pub fn fit(series: &[f64], order: ArimaOrder, options: &FitOptions) -> Result<ModelFitResult> {
    let needed = order.min_observations();
    if series.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: series.len(),
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidParameter(
            "series contains non-finite values".to_string(),
        ));
    }

    let fail = |reason: String| ForecastError::ModelFit { order, reason };

    let differenced = difference(series, order.d);
    let (intercept, ar, ma) = estimate(&differenced, order, options).map_err(fail)?;

    let innovations = one_step_errors(&differenced, &ar, &ma, intercept);
    let start = order.p.max(order.q);
    let residuals = innovations[start..].to_vec();

    let n_eff = residuals.len() as f64;
    let sigma2 = residuals.iter().map(|r| r * r).sum::<f64>() / n_eff;
    if !sigma2.is_finite() || sigma2 <= 0.0 {
        return Err(fail(format!("residual variance {sigma2} is not positive")));
    }

    let k = order.num_params() as f64;
    let log_likelihood = -0.5 * n_eff * (1.0 + sigma2.ln() + (2.0 * std::f64::consts::PI).ln());
    let aic = -2.0 * log_likelihood + 2.0 * k;
    let bic = -2.0 * log_likelihood + k * n_eff.ln();

    let model = ArimaModel {
        order,
        ar,
        ma,
        intercept,
        sigma2,
        history: series.to_vec(),
        differenced,
        innovations,
    };

    Ok(ModelFitResult {
        order,
        aic,
        bic,
        sigma2,
        residuals,
        model,
    })
}

type Coefficients = (f64, Vec<f64>, Vec<f64>);

/// Minimise the conditional sum of squares over intercept, AR and MA terms.
fn estimate(
    differenced: &[f64],
    order: ArimaOrder,
    options: &FitOptions,
) -> std::result::Result<Coefficients, String> {
    let ArimaOrder { p, q, .. } = order;
    let mean = differenced.iter().sum::<f64>() / differenced.len() as f64;

    if p == 0 && q == 0 {
        return Ok((mean, vec![], vec![]));
    }

    let mut initial = vec![0.0; 1 + p + q];
    initial[0] = mean;
    for i in 0..p {
        initial[1 + i] = 0.1 / (i + 1) as f64;
    }
    for i in 0..q {
        initial[1 + p + i] = 0.1 / (i + 1) as f64;
    }

    let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
    bounds.extend(std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND)).take(p + q));

    let config = NelderMeadConfig {
        max_iter: options.max_iterations,
        tolerance: options.tolerance,
        ..Default::default()
    };

    let result = nelder_mead(
        |params| {
            let (intercept, coefs) = params.split_at(1);
            let (ar, ma) = coefs.split_at(p);
            css(differenced, ar, ma, intercept[0])
        },
        &initial,
        Some(&bounds),
        &config,
    );

    if !result.converged {
        return Err(format!(
            "optimizer did not converge after {} iterations",
            result.iterations
        ));
    }
    if result.optimal_point.iter().any(|v| !v.is_finite()) || !result.optimal_value.is_finite() {
        return Err("optimizer produced non-finite parameters".to_string());
    }

    let point = result.optimal_point;
    Ok((point[0], point[1..1 + p].to_vec(), point[1 + p..].to_vec()))
}

/// ARMA prediction for the next index given past values and errors.
fn one_step(values: &[f64], errors: &[f64], ar: &[f64], ma: &[f64], intercept: f64) -> f64 {
    let t = values.len();
    let mut pred = intercept;
    for (i, a) in ar.iter().enumerate() {
        if t > i {
            pred += a * (values[t - 1 - i] - intercept);
        }
    }
    for (i, m) in ma.iter().enumerate() {
        if t > i {
            pred += m * errors[t - 1 - i];
        }
    }
    pred
}

/// One-step-ahead errors from index `max(p, q)` on; earlier entries are zero.
fn one_step_errors(series: &[f64], ar: &[f64], ma: &[f64], intercept: f64) -> Vec<f64> {
    let start = ar.len().max(ma.len());
    let mut errors = vec![0.0; series.len()];
    for t in start..series.len() {
        errors[t] = series[t] - one_step(&series[..t], &errors[..t], ar, ma, intercept);
    }
    errors
}

fn css(series: &[f64], ar: &[f64], ma: &[f64], intercept: f64) -> f64 {
    let start = ar.len().max(ma.len());
    one_step_errors(series, ar, ma, intercept)[start..]
        .iter()
        .map(|e| e * e)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ar1, white_noise};
    use approx::assert_relative_eq;

    #[test]
    fn order_display_and_params() {
        let order = ArimaOrder::new(2, 1, 3);
        assert_eq!(order.to_string(), "(2,1,3)");
        assert_eq!(order.num_params(), 7);
        assert_eq!(order.min_observations(), 6);
    }

    #[test]
    fn order_serialises_as_fields() {
        let json = serde_json::to_string(&ArimaOrder::new(1, 0, 1)).unwrap();
        assert_eq!(json, r#"{"p":1,"d":0,"q":1}"#);
    }

    #[test]
    fn fit_white_noise_mean_model() {
        let series: Vec<f64> = white_noise(200, 51).iter().map(|e| 0.001 + 0.01 * e).collect();
        let result = fit(&series, ArimaOrder::new(0, 0, 0), &FitOptions::default()).unwrap();

        let mean = series.iter().sum::<f64>() / 200.0;
        assert_relative_eq!(result.model.intercept(), mean, epsilon = 1e-12);
        assert_eq!(result.residuals.len(), 200);
        assert!(result.sigma2 > 0.0);
        assert!(result.bic > result.aic);
    }

    #[test]
    fn fit_recovers_ar1_coefficient() {
        let series = ar1(0.7, 400, 52);
        let result = fit(&series, ArimaOrder::new(1, 0, 0), &FitOptions::default()).unwrap();

        let phi = result.model.ar_coefficients()[0];
        assert!((phi - 0.7).abs() < 0.1, "phi = {phi}");
        assert_eq!(result.residuals.len(), 399);
    }

    #[test]
    fn information_criteria_match_likelihood() {
        let series = ar1(0.4, 150, 53);
        let result = fit(&series, ArimaOrder::new(1, 0, 1), &FitOptions::default()).unwrap();

        let n = result.residuals.len() as f64;
        let ll = -0.5 * n * (1.0 + result.sigma2.ln() + (2.0 * std::f64::consts::PI).ln());
        assert_relative_eq!(result.aic, -2.0 * ll + 2.0 * 4.0, epsilon = 1e-9);
        assert_relative_eq!(result.bic, -2.0 * ll + 4.0 * n.ln(), epsilon = 1e-9);
    }

    #[test]
    fn fit_insufficient_data() {
        let err = fit(&[1.0, 2.0, 3.0], ArimaOrder::new(2, 1, 1), &FitOptions::default());
        assert_eq!(
            err.unwrap_err(),
            ForecastError::InsufficientData { needed: 5, got: 3 }
        );
    }

    #[test]
    fn fit_constant_series_fails() {
        let err = fit(&[0.0; 30], ArimaOrder::new(0, 0, 0), &FitOptions::default()).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit { .. }));
    }

    #[test]
    fn fit_reports_non_convergence() {
        let options = FitOptions {
            max_iterations: 2,
            tolerance: 1e-14,
        };
        let series = ar1(0.5, 100, 54);
        let err = fit(&series, ArimaOrder::new(2, 0, 2), &options).unwrap_err();
        match err {
            ForecastError::ModelFit { order, reason } => {
                assert_eq!(order, ArimaOrder::new(2, 0, 2));
                assert!(reason.contains("did not converge"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn coefficients_stay_in_bounds() {
        let series: Vec<f64> = (0..80).map(|i| i as f64 * 0.1).collect();
        let result = fit(&series, ArimaOrder::new(1, 0, 0), &FitOptions::default()).unwrap();
        assert!(result.model.ar_coefficients()[0].abs() <= COEFFICIENT_BOUND);
    }

    #[test]
    fn predict_mean_model_is_flat() {
        let series = white_noise(50, 55);
        let result = fit(&series, ArimaOrder::new(0, 0, 0), &FitOptions::default()).unwrap();
        let forecast = result.model.predict(4);
        assert_eq!(forecast.len(), 4);
        for value in &forecast {
            assert_relative_eq!(*value, result.model.intercept(), epsilon = 1e-12);
        }
    }

    #[test]
    fn predict_ar1_decays_to_mean() {
        let series = ar1(0.8, 300, 56);
        let result = fit(&series, ArimaOrder::new(1, 0, 0), &FitOptions::default()).unwrap();
        let forecast = result.model.predict(60);
        let mean = result.model.intercept();
        assert!((forecast[59] - mean).abs() < (forecast[0] - mean).abs() + 1e-12);
    }

    #[test]
    fn predict_integrates_differences() {
        let series: Vec<f64> = (0..40)
            .map(|i| 5.0 + 2.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let result = fit(&series, ArimaOrder::new(0, 1, 0), &FitOptions::default()).unwrap();
        let forecast = result.model.predict(3);
        let last = series[39];
        let drift = result.model.intercept();
        assert_relative_eq!(forecast[0], last + drift, epsilon = 1e-9);
        assert_relative_eq!(forecast[2], last + 3.0 * drift, epsilon = 1e-9);
    }

    #[test]
    fn psi_weights_ar1() {
        let series = ar1(0.6, 200, 57);
        let result = fit(&series, ArimaOrder::new(1, 0, 0), &FitOptions::default()).unwrap();
        let phi = result.model.ar_coefficients()[0];
        let psi = result.model.psi_weights(4);
        assert_relative_eq!(psi[0], 1.0);
        assert_relative_eq!(psi[1], phi, epsilon = 1e-12);
        assert_relative_eq!(psi[3], phi.powi(3), epsilon = 1e-12);
    }

    #[test]
    fn psi_weights_random_walk_are_ones() {
        let series: Vec<f64> = white_noise(60, 58)
            .iter()
            .scan(0.0, |s, e| {
                *s += e;
                Some(*s)
            })
            .collect();
        let result = fit(&series, ArimaOrder::new(0, 1, 0), &FitOptions::default()).unwrap();
        assert_eq!(result.model.psi_weights(3), vec![1.0, 1.0, 1.0]);
    }
}
