//! Daily closing prices from Yahoo Finance.

use chrono::{DateTime, NaiveDate, NaiveTime};
use time::OffsetDateTime;
use tokio::runtime::{Builder, Runtime};
use tracing::info;
use yahoo_finance_api as yahoo;

use crate::core::PriceSeries;
use crate::data::provider::{normalize, PriceProvider};
use crate::error::{ForecastError, Result};

/// Yahoo Finance provider.
///
/// The connector is async; the provider owns a current-thread runtime and
/// blocks on it so callers stay synchronous. Do not call it from inside
/// another tokio runtime.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    runtime: Runtime,
    adjusted: bool,
}

impl std::fmt::Debug for YahooProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooProvider")
            .field("adjusted", &self.adjusted)
            .finish_non_exhaustive()
    }
}

impl YahooProvider {
    /// Provider returning raw closing prices.
    pub fn new() -> Result<Self> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| ForecastError::Provider(e.to_string()))?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ForecastError::Provider(e.to_string()))?;
        Ok(Self {
            connector,
            runtime,
            adjusted: false,
        })
    }

    /// Use split- and dividend-adjusted closes instead of raw closes.
    pub fn adjusted(mut self) -> Self {
        self.adjusted = true;
        self
    }
}

fn to_offset(date: NaiveDate, time: NaiveTime) -> Result<OffsetDateTime> {
    let timestamp = date.and_time(time).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| ForecastError::TimestampError(e.to_string()))
}

impl PriceProvider for YahooProvider {
    fn get_price_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        if ticker.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "ticker must not be empty".to_string(),
            ));
        }
        let start_time = to_offset(start, NaiveTime::MIN)?;
        let end_time = to_offset(end, NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default())?;

        let response = self
            .runtime
            .block_on(self.connector.get_quote_history(ticker, start_time, end_time))
            .map_err(|e| ForecastError::Provider(e.to_string()))?;
        let quotes = response
            .quotes()
            .map_err(|e| ForecastError::Provider(e.to_string()))?;
        info!(ticker, quotes = quotes.len(), "fetched Yahoo Finance history");

        let observations = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                let price = if self.adjusted { q.adjclose } else { q.close };
                Some((date, price))
            })
            .collect();

        normalize(ticker, start, end, observations)
    }
}
