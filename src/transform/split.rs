//! Chronological train/test splitting.

use crate::error::{ForecastError, Result};

/// Index at which a series of length `n` splits into train and test parts.
///
/// Returns `floor(n * (1 - test_fraction))`, so the training part is the
/// leading `idx` observations.
///
/// # Errors
/// `InvalidParameter` when `test_fraction` is outside `[0, 1)` or the training
/// part would be empty.
pub fn split_index(n: usize, test_fraction: f64) -> Result<usize> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(ForecastError::InvalidParameter(format!(
            "test_fraction must be in [0, 1), got {test_fraction}"
        )));
    }
    let idx = (n as f64 * (1.0 - test_fraction)).floor() as usize;
    if idx == 0 {
        return Err(ForecastError::InvalidParameter(format!(
            "test_fraction {test_fraction} leaves no training data out of {n} observations"
        )));
    }
    Ok(idx.min(n))
}
