//! Accuracy metrics for hold-out forecast evaluation.

use serde::Serialize;

use crate::error::{ForecastError, Result};

/// Forecast accuracy against held-out actual values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoldoutAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error in percent (None if zeros in actual)
    pub mape: Option<f64>,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// # Errors
/// `InsufficientData` for empty input, `InvalidParameter` when the lengths
/// differ.
pub fn holdout_accuracy(actual: &[f64], predicted: &[f64]) -> Result<HoldoutAccuracy> {
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "{} actual values for {} predictions",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;
    let errors = || actual.iter().zip(predicted).map(|(a, p)| a - p);

    let mae = errors().map(f64::abs).sum::<f64>() / n;
    let rmse = (errors().map(|e| e * e).sum::<f64>() / n).sqrt();

    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = errors().zip(actual).map(|(e, a)| (e / a).abs()).sum();
        Some(100.0 * sum / n)
    };

    Ok(HoldoutAccuracy { mae, rmse, mape })
}
