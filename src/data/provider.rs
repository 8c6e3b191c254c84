//! The price provider seam and the normalisation every provider shares.

use chrono::NaiveDate;

use crate::core::PriceSeries;
use crate::error::{ForecastError, Result};

/// Source of daily prices for a ticker.
pub trait PriceProvider: Send + Sync {
    /// Prices for `ticker` with `start <= date <= end`, oldest first.
    ///
    /// # Errors
    /// `NoData` when nothing usable falls inside the range; provider-specific
    /// errors (`Io`, `Provider`) when the source cannot be read.
    fn get_price_series(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries>;
}

impl<P: PriceProvider + ?Sized> PriceProvider for Box<P> {
    fn get_price_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        (**self).get_price_series(ticker, start, end)
    }
}

/// Turn raw observations into a valid [`PriceSeries`].
///
/// Sorts by date, drops non-finite and non-positive prices, keeps the last
/// observation of a repeated date and filters to `start..=end`.
///
/// # Errors
/// `InvalidParameter` when `start > end`, `NoData` when nothing remains.
pub fn normalize(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    mut observations: Vec<(NaiveDate, f64)>,
) -> Result<PriceSeries> {
    if start > end {
        return Err(ForecastError::InvalidParameter(format!(
            "start date {start} is after end date {end}"
        )));
    }

    let raw = observations.len();
    // Stable sort keeps input order within a date, so the last one wins below
    observations.sort_by_key(|(date, _)| *date);

    let mut points: Vec<(NaiveDate, f64)> = Vec::with_capacity(raw);
    for (date, price) in observations {
        if date < start || date > end || !price.is_finite() || price <= 0.0 {
            continue;
        }
        match points.last_mut() {
            Some(last) if last.0 == date => last.1 = price,
            _ => points.push((date, price)),
        }
    }

    if points.is_empty() {
        return Err(ForecastError::NoData {
            ticker: ticker.to_string(),
            start,
            end,
            reason: format!("none of {raw} observations are usable prices in range"),
        });
    }

    PriceSeries::from_points(ticker, &points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn normalize_sorts_and_dedupes() {
        let raw = vec![
            (date(3), 12.0),
            (date(1), 10.0),
            (date(2), 11.0),
            (date(2), 11.5),
        ];
        let series = normalize("ABC", date(1), date(31), raw).unwrap();

        assert_eq!(series.dates(), &[date(1), date(2), date(3)]);
        assert_eq!(series.prices(), &[10.0, 11.5, 12.0]);
        assert_eq!(series.ticker(), "ABC");
    }

    #[test]
    fn normalize_drops_bad_prices_and_out_of_range() {
        let raw = vec![
            (date(1), 10.0),
            (date(2), f64::NAN),
            (date(3), -1.0),
            (date(4), 0.0),
            (date(5), 11.0),
            (date(20), 12.0),
        ];
        let series = normalize("ABC", date(1), date(10), raw).unwrap();
        assert_eq!(series.prices(), &[10.0, 11.0]);
    }

    #[test]
    fn normalize_empty_is_no_data() {
        let err = normalize("ABC", date(1), date(2), vec![(date(5), 1.0)]).unwrap_err();
        match err {
            ForecastError::NoData { ticker, start, end, .. } => {
                assert_eq!(ticker, "ABC");
                assert_eq!(start, date(1));
                assert_eq!(end, date(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn normalize_rejects_inverted_range() {
        assert!(matches!(
            normalize("ABC", date(5), date(1), vec![]),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
