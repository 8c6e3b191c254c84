//! # tickercast
//!
//! Daily stock-return diagnostics and ARIMA price forecasting.
//!
//! Prices come from a [`PriceProvider`](data::PriceProvider) and are turned into
//! percentage-change returns. The returns go through distribution, stationarity
//! (ADF and KPSS) and autocorrelation diagnostics. An ARIMA model is then fitted,
//! either at a fixed order or by AIC order search, and its return forecasts are
//! compounded back into prices with confidence intervals and a plain-English
//! explanation.
//!
//! ```
//! use tickercast::prelude::*;
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.search.p_max, 3);
//! assert_eq!(config.ljung_box_lags, vec![5, 10, 20]);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod features;
pub mod forecasting;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod transform;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::{PipelineConfig, SearchBounds};
    pub use crate::core::{Frequency, HorizonDates, PriceForecast, PriceSeries, ReturnSeries};
    pub use crate::data::{CsvProvider, InMemoryProvider, PriceProvider};
    pub use crate::error::{ForecastError, Result};
    pub use crate::forecasting::{forecast, ForecastAnchor};
    pub use crate::models::arima::{fit, search, ArimaOrder, FitOptions, ModelFitResult};
    pub use crate::pipeline::{
        ForecastReport, ForecastRequest, MarketReport, MarketRequest, Pipeline,
    };
    pub use crate::transform::{compound, pct_change};
    pub use crate::validation::{adf_test, analyze, kpss_test, ljung_box_at, DiagnosticsReport};
}
