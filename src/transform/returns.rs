//! Percentage-change returns and their inverse.

use crate::core::{PriceSeries, ReturnSeries};
use crate::error::{ForecastError, Result};

/// Derive simple returns `price[t] / price[t-1] - 1`.
///
/// The first price has no predecessor, so the result is one entry shorter
/// and starts at the second date.
///
/// # Errors
/// `InsufficientData` when the series has fewer than two prices.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tickercast::core::PriceSeries;
/// use tickercast::transform::pct_change;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let dates = vec![d(1), d(2), d(3)];
/// let prices = PriceSeries::new("AAPL", dates, vec![100.0, 110.0, 99.0]).unwrap();
/// let returns = pct_change(&prices).unwrap();
///
/// assert_eq!(returns.len(), 2);
/// assert!((returns.values()[0] - 0.10).abs() < 1e-12);
/// assert!((returns.values()[1] + 0.10).abs() < 1e-12);
/// ```
pub fn pct_change(prices: &PriceSeries) -> Result<ReturnSeries> {
    if prices.len() < 2 {
        return Err(ForecastError::InsufficientData {
            needed: 2,
            got: prices.len(),
        });
    }

    let returns = prices.prices().windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    ReturnSeries::new(prices.dates()[1..].to_vec(), returns)
}

/// Compound returns onto a starting price.
///
/// Each step multiplies the running price by `1 + r`, so step `t` depends on
/// every return up to and including `t`.
pub fn compound(base: f64, returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(base, |price, r| {
            *price *= 1.0 + r;
            Some(*price)
        })
        .collect()
}
