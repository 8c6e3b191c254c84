//! Distribution, stationarity and correlation diagnostics of one series.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ForecastError, Result};
use crate::features::autocorrelation::AcfProfile;
use crate::features::distribution::{excess_kurtosis, jarque_bera, skewness, JarqueBeraResult};
use crate::utils::stats::{mean, variance};
use crate::validation::stationarity::{
    adf_test, kpss_test, StationarityConclusion, StationarityResult,
};

/// Fewest observations [`analyze`] accepts.
pub const MIN_OBSERVATIONS: usize = 8;

/// Settings for [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Highest ACF/PACF lag, capped at `n - 1`.
    pub acf_lags: usize,
    /// ADF lag bound; `None` uses `12 (n/100)^(1/4)`.
    pub adf_max_lags: Option<usize>,
    /// KPSS bandwidth; `None` selects it from the data.
    pub kpss_lags: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            acf_lags: 20,
            adf_max_lags: None,
            kpss_lags: None,
        }
    }
}

/// Diagnostics of a return (or price) series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    pub n_obs: usize,
    pub skewness: f64,
    /// Excess kurtosis, 0 for a normal distribution.
    pub kurtosis: f64,
    pub jarque_bera: JarqueBeraResult,
    pub adf: StationarityResult,
    pub kpss: StationarityResult,
    /// Joint reading of the ADF and KPSS verdicts.
    pub stationarity: StationarityConclusion,
    pub acf: AcfProfile,
}

/// Run every diagnostic on `series`.
///
/// # Errors
/// * `InsufficientData` for fewer than [`MIN_OBSERVATIONS`] values
/// * `DegenerateSeries` when the sample variance is below
///   `1e-12 * max(1, mean^2)`, e.g. a constant series
/// * `InvalidParameter` when the series contains non-finite values
pub fn analyze(series: &[f64], config: &DiagnosticsConfig) -> Result<DiagnosticsReport> {
    let n = series.len();
    if n < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidParameter(
            "series contains non-finite values".to_string(),
        ));
    }

    let m = mean(series);
    let var = variance(series);
    if var < 1e-12 * (m * m).max(1.0) {
        return Err(ForecastError::DegenerateSeries { variance: var });
    }

    let adf = adf_test(series, config.adf_max_lags)?;
    let kpss = kpss_test(series, config.kpss_lags)?;
    let stationarity = StationarityConclusion::from_verdicts(adf.verdict, kpss.verdict);
    debug!(
        n,
        adf_p = adf.p_value,
        kpss_p = kpss.p_value,
        %stationarity,
        "stationarity tests"
    );

    Ok(DiagnosticsReport {
        n_obs: n,
        skewness: skewness(series),
        kurtosis: excess_kurtosis(series),
        jarque_bera: jarque_bera(series),
        adf,
        kpss,
        stationarity,
        acf: AcfProfile::compute(series, config.acf_lags),
    })
}
