//! Summary statistics of model residuals.

use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::features::distribution::{pearson_kurtosis, skewness};
use crate::utils::stats::{mean, std_dev};

/// Location, spread and shape of a residual series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResidualSummary {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    /// Biased moment skewness.
    pub skewness: f64,
    /// Pearson kurtosis, 3 for a normal distribution.
    pub kurtosis: f64,
}

impl ResidualSummary {
    /// Summarise `residuals`.
    ///
    /// Shape statistics are NaN when the series is too short for them
    /// (skewness needs 3 values, kurtosis 4) or has no spread.
    ///
    /// # Errors
    /// `InsufficientData` for fewer than 2 residuals.
    pub fn from_residuals(residuals: &[f64]) -> Result<Self> {
        if residuals.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: residuals.len(),
            });
        }
        Ok(Self {
            mean: mean(residuals),
            std: std_dev(residuals),
            skewness: skewness(residuals),
            kurtosis: pearson_kurtosis(residuals),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn summary_of_symmetric_residuals() {
        let summary = ResidualSummary::from_residuals(&[-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(summary.mean, 0.0);
        assert_relative_eq!(summary.std, 2.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(summary.skewness, 0.0, epsilon = 1e-12);
        assert_relative_eq!(summary.kurtosis, 1.7, epsilon = 1e-12);
    }

    #[test]
    fn summary_needs_two_residuals() {
        assert_eq!(
            ResidualSummary::from_residuals(&[0.5]).unwrap_err(),
            ForecastError::InsufficientData { needed: 2, got: 1 }
        );
    }

    #[test]
    fn short_residuals_have_undefined_shape() {
        let summary = ResidualSummary::from_residuals(&[0.1, -0.1]).unwrap();
        assert!(summary.skewness.is_nan());
        assert!(summary.kurtosis.is_nan());
        assert!(summary.std > 0.0);
    }
}
