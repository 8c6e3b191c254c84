//! Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use crate::models::arima::{ArimaOrder, FitOptions};
use crate::validation::DiagnosticsConfig;

/// Grid bounds for automatic order selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBounds {
    /// Differencing order shared by every candidate.
    pub d: usize,
    pub p_max: usize,
    pub q_max: usize,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            d: 0,
            p_max: 3,
            q_max: 3,
        }
    }
}

/// Settings for [`Pipeline`](crate::pipeline::Pipeline).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use tickercast::config::PipelineConfig;
///
/// let config = PipelineConfig::from_json(r#"{"horizon": 5, "test_fraction": 0.0}"#).unwrap();
/// assert_eq!(config.horizon, 5);
/// assert_eq!(config.search.p_max, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fixed model order; `None` searches `search` by AIC.
    pub order: Option<ArimaOrder>,
    /// Forecast steps when no test split is held out.
    pub horizon: usize,
    /// Confidence level of the forecast intervals.
    pub confidence: f64,
    /// Share of the returns held out for evaluation, in `[0, 1)`.
    pub test_fraction: f64,
    pub search: SearchBounds,
    /// Highest ACF/PACF lag for returns.
    pub acf_lags: usize,
    /// Highest ACF/PACF lag for prices.
    pub price_acf_lags: usize,
    /// Lags of the residual Ljung-Box tests.
    pub ljung_box_lags: Vec<usize>,
    /// Spacing of generated forecast dates.
    pub frequency: Frequency,
    /// Nelder-Mead iteration budget per fit.
    pub max_iterations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            order: None,
            horizon: 20,
            confidence: 0.95,
            test_fraction: 0.2,
            search: SearchBounds::default(),
            acf_lags: 20,
            price_acf_lags: 40,
            ljung_box_lags: vec![5, 10, 20],
            frequency: Frequency::Daily,
            max_iterations: 5000,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ForecastError::InvalidParameter(msg));

        if self.horizon == 0 {
            return invalid("horizon must be at least 1".to_string());
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return invalid(format!("confidence must be in (0, 1), got {}", self.confidence));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return invalid(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            ));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".to_string());
        }
        if self.ljung_box_lags.iter().any(|&lag| lag == 0) {
            return invalid("Ljung-Box lags must be positive".to_string());
        }
        Ok(())
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            max_iterations: self.max_iterations,
            ..FitOptions::default()
        }
    }

    /// Diagnostics settings for the return series.
    pub fn return_diagnostics(&self) -> DiagnosticsConfig {
        DiagnosticsConfig {
            acf_lags: self.acf_lags,
            ..DiagnosticsConfig::default()
        }
    }

    /// Diagnostics settings for the price series.
    pub fn price_diagnostics(&self) -> DiagnosticsConfig {
        DiagnosticsConfig {
            acf_lags: self.price_acf_lags,
            ..DiagnosticsConfig::default()
        }
    }
}
