//! Error types for the tickercast library.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::arima::ArimaOrder;

/// Result type alias for tickercast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fetching, diagnosing, fitting or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Series variance is too small for the statistics to be defined.
    #[error("degenerate series: variance {variance:e} is effectively zero")]
    DegenerateSeries { variance: f64 },

    /// A single ARIMA fit failed.
    #[error("failed to fit ARIMA{order}: {reason}")]
    ModelFit { order: ArimaOrder, reason: String },

    /// Every candidate of an order search failed.
    #[error(
        "no viable ARIMA model: all {attempts} candidates with d={d}, p<={p_max}, q<={q_max} failed"
    )]
    NoViableModel {
        d: usize,
        p_max: usize,
        q_max: usize,
        attempts: usize,
    },

    /// Forecast could not be produced from the fitted model.
    #[error("forecast error: {0}")]
    Forecast(String),

    /// The data provider returned nothing usable.
    #[error("no data for {ticker} between {start} and {end}: {reason}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Upstream provider failure (network, API).
    #[error("provider error: {0}")]
    Provider(String),

    /// I/O or parse failure while reading local price files.
    #[error("io error: {0}")]
    Io(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A request-level failure with the request context attached.
    #[error("request for {ticker} ({start} to {end}) failed")]
    Request {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
        #[source]
        source: Box<ForecastError>,
    },
}

impl ForecastError {
    /// Wrap this error with the ticker and date range of the failing request.
    pub fn for_request(self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        match self {
            already @ Self::Request { .. } => already,
            other => Self::Request {
                ticker: ticker.to_string(),
                start,
                end,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping request context.
    pub fn root(&self) -> &ForecastError {
        match self {
            Self::Request { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
