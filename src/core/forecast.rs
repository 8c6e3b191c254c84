//! Forecast result structures.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ForecastError, Result};

/// Multi-step return forecast with symmetric confidence intervals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Predicted mean return per step.
    pub point: Vec<f64>,
    /// Lower confidence bound per step.
    pub lower_ci: Vec<f64>,
    /// Upper confidence bound per step.
    pub upper_ci: Vec<f64>,
    /// Date of each step.
    pub horizon_dates: Vec<NaiveDate>,
    /// Confidence level of the interval, e.g. 0.95.
    pub confidence: f64,
}

impl ForecastResult {
    /// Assemble a forecast, checking that all parts have the same length.
    pub fn new(
        point: Vec<f64>,
        lower_ci: Vec<f64>,
        upper_ci: Vec<f64>,
        horizon_dates: Vec<NaiveDate>,
        confidence: f64,
    ) -> Result<Self> {
        let h = point.len();
        for (name, len) in [
            ("lower_ci", lower_ci.len()),
            ("upper_ci", upper_ci.len()),
            ("horizon_dates", horizon_dates.len()),
        ] {
            if len != h {
                return Err(ForecastError::Forecast(format!(
                    "{name} has {len} entries for a horizon of {h}"
                )));
            }
        }
        Ok(Self {
            point,
            lower_ci,
            upper_ci,
            horizon_dates,
            confidence,
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Whether the last point is above the first.
    pub fn is_rising(&self) -> bool {
        match (self.point.first(), self.point.last()) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        }
    }
}

/// Return forecast together with the compounded price path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceForecast {
    /// Forecast on the return scale.
    pub returns: ForecastResult,
    /// Compounded price per step.
    pub prices: Vec<f64>,
    /// Price the walk started from.
    pub last_known_price: f64,
}

impl PriceForecast {
    pub fn horizon(&self) -> usize {
        self.returns.horizon()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.returns.horizon_dates
    }
}
