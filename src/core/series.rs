//! Dated price and return series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::transform::split::split_index;

fn validate_dates(dates: &[NaiveDate]) -> Result<()> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(ForecastError::TimestampError(format!(
                "dates must be strictly increasing ({} follows {})",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

/// A single dated price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A single dated return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    #[serde(rename = "return")]
    pub value: f64,
}

/// Daily price series for one ticker.
///
/// Dates are strictly increasing and every price is finite and positive.
/// The series cannot be modified once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Build a price series, validating ordering and price positivity.
    pub fn new(ticker: impl Into<String>, dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "{} dates but {} prices",
                dates.len(),
                prices.len()
            )));
        }
        if dates.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        validate_dates(&dates)?;
        if let Some((date, price)) = dates
            .iter()
            .zip(&prices)
            .find(|(_, p)| !p.is_finite() || **p <= 0.0)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "price on {date} must be finite and positive, got {price}"
            )));
        }

        Ok(Self {
            ticker: ticker.into(),
            dates,
            prices,
        })
    }

    /// Build a price series from `(date, price)` pairs already in date order.
    pub fn from_points(ticker: impl Into<String>, points: &[(NaiveDate, f64)]) -> Result<Self> {
        let (dates, prices) = points.iter().copied().unzip();
        Self::new(ticker, dates, prices)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// First observation date.
    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last observation date.
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Last observed price.
    pub fn last_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    /// Dated points, for serialisation.
    pub fn points(&self) -> Vec<PricePoint> {
        self.dates
            .iter()
            .zip(&self.prices)
            .map(|(&date, &price)| PricePoint { date, price })
            .collect()
    }

    /// Split into leading training and trailing test parts.
    ///
    /// The split index is `floor(n * (1 - test_fraction))`; the test part is
    /// `None` when it would be empty.
    pub fn split_at_fraction(&self, test_fraction: f64) -> Result<(Self, Option<Self>)> {
        let idx = split_index(self.len(), test_fraction)?;
        let train = Self {
            ticker: self.ticker.clone(),
            dates: self.dates[..idx].to_vec(),
            prices: self.prices[..idx].to_vec(),
        };
        let test = (idx < self.len()).then(|| Self {
            ticker: self.ticker.clone(),
            dates: self.dates[idx..].to_vec(),
            prices: self.prices[idx..].to_vec(),
        });
        Ok((train, test))
    }
}

/// Percentage-change returns derived from a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl ReturnSeries {
    /// Build a return series, validating ordering and finiteness.
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Result<Self> {
        if dates.len() != returns.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "{} dates but {} returns",
                dates.len(),
                returns.len()
            )));
        }
        validate_dates(&dates)?;
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "returns must be finite".to_string(),
            ));
        }
        Ok(Self { dates, returns })
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.returns
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn points(&self) -> Vec<ReturnPoint> {
        self.dates
            .iter()
            .zip(&self.returns)
            .map(|(&date, &value)| ReturnPoint { date, value })
            .collect()
    }

    /// Split into leading training and trailing test parts.
    pub fn split_at_fraction(&self, test_fraction: f64) -> Result<(Self, Option<Self>)> {
        let idx = split_index(self.len(), test_fraction)?;
        let train = Self {
            dates: self.dates[..idx].to_vec(),
            returns: self.returns[..idx].to_vec(),
        };
        let test = (idx < self.len()).then(|| Self {
            dates: self.dates[idx..].to_vec(),
            returns: self.returns[idx..].to_vec(),
        });
        Ok((train, test))
    }
}
