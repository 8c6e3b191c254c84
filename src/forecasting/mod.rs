//! Multi-step return forecasts and compounded price paths.

use chrono::NaiveDate;

use crate::core::{ForecastResult, HorizonDates, PriceForecast};
use crate::error::{ForecastError, Result};
use crate::models::arima::ModelFitResult;
use crate::transform::compound;
use crate::utils::stats::quantile_normal;

/// Where a forecast starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAnchor {
    /// Last date of the training returns.
    pub last_date: NaiveDate,
    /// Price the forecast returns are compounded onto.
    pub last_price: f64,
    /// How horizon dates are produced.
    pub dates: HorizonDates,
}

/// Forecast `horizon` returns from a fitted model and compound them into prices.
///
/// Intervals are `point ± z σ sqrt(Σ_{j<h} ψ_j²)` with `z = Φ⁻¹((1 + confidence) / 2)`
/// and ψ the MA(∞) weights of the fitted model.
///
/// # Errors
/// * `Forecast` for a zero horizon or a model with non-finite parameters
/// * `InvalidParameter` for a confidence outside `(0, 1)` or a non-positive
///   anchor price
/// * date errors from [`HorizonDates::resolve`]
pub fn forecast(
    fit: &ModelFitResult,
    horizon: usize,
    confidence: f64,
    anchor: &ForecastAnchor,
) -> Result<PriceForecast> {
    if horizon == 0 {
        return Err(ForecastError::Forecast(
            "horizon must be at least 1".to_string(),
        ));
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "confidence must be in (0, 1), got {confidence}"
        )));
    }
    if !(anchor.last_price.is_finite() && anchor.last_price > 0.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "last known price must be positive, got {}",
            anchor.last_price
        )));
    }

    let model = &fit.model;
    if !model.is_finite() {
        return Err(ForecastError::Forecast(format!(
            "ARIMA{} has non-finite parameters",
            model.order()
        )));
    }

    let horizon_dates = anchor.dates.resolve(anchor.last_date, horizon)?;
    let point = model.predict(horizon);
    if point.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::Forecast(
            "forecast recursion diverged".to_string(),
        ));
    }

    let z = quantile_normal((1.0 + confidence) / 2.0);
    let sigma = model.sigma2().sqrt();
    let half_widths: Vec<f64> = model
        .psi_weights(horizon)
        .iter()
        .scan(0.0, |acc, psi| {
            *acc += psi * psi;
            Some(z * sigma * acc.sqrt())
        })
        .collect();

    let lower_ci = point.iter().zip(&half_widths).map(|(p, w)| p - w).collect();
    let upper_ci = point.iter().zip(&half_widths).map(|(p, w)| p + w).collect();
    let prices = compound(anchor.last_price, &point);

    Ok(PriceForecast {
        returns: ForecastResult::new(point, lower_ci, upper_ci, horizon_dates, confidence)?,
        prices,
        last_known_price: anchor.last_price,
    })
}
