//! Price provider backed by in-memory observations.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::PriceSeries;
use crate::data::provider::{normalize, PriceProvider};
use crate::error::{ForecastError, Result};

/// Ticker to observations map, range-filtered on request.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, Vec<(NaiveDate, f64)>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the observations of `ticker`.
    pub fn with_series(
        mut self,
        ticker: impl Into<String>,
        observations: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        self.insert(ticker, observations);
        self
    }

    pub fn insert(
        &mut self,
        ticker: impl Into<String>,
        observations: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) {
        self.series
            .insert(ticker.into(), observations.into_iter().collect());
    }

    /// Register every point of an existing series under its ticker.
    pub fn with_price_series(self, series: &PriceSeries) -> Self {
        let points = series.dates().iter().copied().zip(series.prices().iter().copied());
        self.with_series(series.ticker(), points)
    }
}

impl PriceProvider for InMemoryProvider {
    fn get_price_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        let observations = self.series.get(ticker).ok_or_else(|| ForecastError::NoData {
            ticker: ticker.to_string(),
            start,
            end,
            reason: "unknown ticker".to_string(),
        })?;
        normalize(ticker, start, end, observations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    #[test]
    fn filters_to_requested_range() {
        let provider = InMemoryProvider::new().with_series(
            "XYZ",
            vec![(date(1, 2), 10.0), (date(1, 3), 10.5), (date(2, 1), 11.0)],
        );
        let series = provider
            .get_price_series("XYZ", date(1, 1), date(1, 31))
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_price(), 10.5);
    }

    #[test]
    fn unknown_ticker_is_no_data() {
        let provider = InMemoryProvider::new();
        let err = provider
            .get_price_series("NOPE", date(1, 1), date(12, 31))
            .unwrap_err();
        assert!(matches!(err, ForecastError::NoData { reason, .. } if reason == "unknown ticker"));
    }

    #[test]
    fn round_trips_a_price_series() {
        let original = crate::test_support::price_series(30, 91);
        let provider = InMemoryProvider::new().with_price_series(&original);
        let fetched = provider
            .get_price_series("SYN", original.first_date(), original.last_date())
            .unwrap();
        assert_eq!(fetched, original);
    }
}
