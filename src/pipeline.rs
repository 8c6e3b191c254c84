//! Request-scoped orchestration: fetch, diagnose, fit, forecast, explain.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::core::{
    HorizonDates, PriceForecast, PricePoint, PriceSeries, ReturnPoint, ReturnSeries,
};
use crate::data::PriceProvider;
use crate::error::{ForecastError, Result};
use crate::features::AcfProfile;
use crate::forecasting::{forecast, ForecastAnchor};
use crate::models::arima::{fit, ArimaOrder, CandidateScore, ModelFitResult, OrderSearch};
use crate::report::{explain, Explanation, ExplanationInputs, ResidualSummary};
use crate::transform::pct_change;
use crate::utils::metrics::{holdout_accuracy, HoldoutAccuracy};
use crate::validation::{
    analyze, ljung_box_at, DiagnosticsReport, LjungBoxReport, StationarityResult,
};

/// Ticker and inclusive date range of a market data request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A forecast request; `None` fields fall back to the pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Fixed model order instead of a search.
    #[serde(default)]
    pub order: Option<ArimaOrder>,
    /// Hold-out share of the returns.
    #[serde(default)]
    pub test_fraction: Option<f64>,
}

impl ForecastRequest {
    pub fn new(ticker: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            end,
            order: None,
            test_fraction: None,
        }
    }

    pub fn with_order(mut self, order: ArimaOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = Some(test_fraction);
        self
    }
}

/// Price history and returns of one ticker, with diagnostics of both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub price_diagnostics: DiagnosticsReport,
    pub returns_diagnostics: DiagnosticsReport,
    pub price_data: Vec<PricePoint>,
    pub returns_data: Vec<ReturnPoint>,
}

/// A stationarity test result with its plain-English reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationaritySummary {
    pub result: StationarityResult,
    pub response: String,
}

impl StationaritySummary {
    fn new(result: StationarityResult, name: &str) -> Self {
        Self {
            response: result.verdict.describe(name),
            result,
        }
    }
}

/// ACF/PACF profiles of both price and return series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationProfiles {
    pub prices: AcfProfile,
    pub returns: AcfProfile,
}

/// Everything produced by one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub prices: Vec<PricePoint>,
    pub returns: Vec<ReturnPoint>,
    pub order: ArimaOrder,
    pub aic: f64,
    pub bic: f64,
    /// Grid candidates when the order was searched, empty for a fixed order.
    pub candidates: Vec<CandidateScore>,
    pub forecast: PriceForecast,
    /// Forecast prices against the held-out prices, when a test split exists.
    pub holdout: Option<HoldoutAccuracy>,
    pub residuals_summary: ResidualSummary,
    pub ljung_box: LjungBoxReport,
    pub explanation: Explanation,
    /// Distribution, stationarity and ACF diagnostics of the price levels.
    pub price_diagnostics: DiagnosticsReport,
    pub price_adf: StationaritySummary,
    pub price_kpss: StationaritySummary,
    /// Stationarity of the returns the model is fitted on.
    pub adf: StationaritySummary,
    pub kpss: StationaritySummary,
    pub acf_pacf: CorrelationProfiles,
}

/// Runs market and forecast requests against a price provider.
#[derive(Debug, Clone)]
pub struct Pipeline<P> {
    provider: P,
    config: PipelineConfig,
}

impl<P: PriceProvider> Pipeline<P> {
    pub fn new(provider: P, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Prices, returns and the diagnostics of both for `request`.
    ///
    /// # Errors
    /// Any failure, wrapped in `ForecastError::Request` with the ticker and range.
    pub fn market_report(&self, request: &MarketRequest) -> Result<MarketReport> {
        self.market_report_inner(request)
            .map_err(|e| e.for_request(&request.ticker, request.start, request.end))
    }

    /// Fit, forecast and explain for `request`.
    ///
    /// # Errors
    /// Any failure, wrapped in `ForecastError::Request` with the ticker and range.
    pub fn forecast_report(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        self.forecast_report_inner(request)
            .map_err(|e| e.for_request(&request.ticker, request.start, request.end))
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(PriceSeries, ReturnSeries)> {
        self.config.validate()?;
        let prices = self.provider.get_price_series(ticker, start, end)?;
        let returns = pct_change(&prices)?;
        info!(
            ticker,
            prices = prices.len(),
            returns = returns.len(),
            "fetched price history"
        );
        Ok((prices, returns))
    }

    /// Diagnostics of the returns, then of the price levels.
    fn diagnose(
        &self,
        prices: &PriceSeries,
        returns: &ReturnSeries,
    ) -> Result<(DiagnosticsReport, DiagnosticsReport)> {
        let returns_diagnostics = analyze(returns.values(), &self.config.return_diagnostics())?;
        let price_diagnostics = analyze(prices.prices(), &self.config.price_diagnostics())?;
        info!(
            prices = %price_diagnostics.stationarity,
            returns = %returns_diagnostics.stationarity,
            "stationarity"
        );
        Ok((price_diagnostics, returns_diagnostics))
    }

    fn market_report_inner(&self, request: &MarketRequest) -> Result<MarketReport> {
        let (prices, returns) = self.fetch(&request.ticker, request.start, request.end)?;
        let (price_diagnostics, returns_diagnostics) = self.diagnose(&prices, &returns)?;

        Ok(MarketReport {
            ticker: request.ticker.clone(),
            start: request.start,
            end: request.end,
            price_diagnostics,
            returns_diagnostics,
            price_data: prices.points(),
            returns_data: returns.points(),
        })
    }

    fn forecast_report_inner(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        let config = &self.config;
        let (prices, returns) = self.fetch(&request.ticker, request.start, request.end)?;

        let (price_diagnostics, diagnostics) = self.diagnose(&prices, &returns)?;
        let acf_pacf = CorrelationProfiles {
            prices: price_diagnostics.acf.clone(),
            returns: diagnostics.acf.clone(),
        };

        let test_fraction = request.test_fraction.unwrap_or(config.test_fraction);
        let (train, test) = returns.split_at_fraction(test_fraction)?;
        info!(
            train = train.len(),
            test = test.as_ref().map_or(0, ReturnSeries::len),
            "split returns"
        );

        let (fitted, candidates) = self.fit_returns(train.values(), request.order)?;

        // Returns are dated at their closing price, so return i pairs with price i + 1
        let last_price = prices.prices()[train.len()];
        let last_date = train.last_date().ok_or(ForecastError::InsufficientData {
            needed: 1,
            got: 0,
        })?;
        let (horizon, dates) = match &test {
            Some(test) => (test.len(), HorizonDates::Aligned(test.dates().to_vec())),
            None => (config.horizon, HorizonDates::Continue(config.frequency)),
        };
        let anchor = ForecastAnchor {
            last_date,
            last_price,
            dates,
        };
        let price_forecast = forecast(&fitted, horizon, config.confidence, &anchor)?;

        let holdout = match &test {
            Some(_) => {
                let actual = &prices.prices()[train.len() + 1..];
                Some(holdout_accuracy(actual, &price_forecast.prices)?)
            }
            None => None,
        };

        let residuals_summary = ResidualSummary::from_residuals(&fitted.residuals)?;
        let ljung_box = ljung_box_at(&fitted.residuals, &config.ljung_box_lags);
        let p_values: Vec<f64> = ljung_box.p_values().collect();
        let explanation = explain(&ExplanationInputs {
            d: fitted.order.d,
            ljung_box_p_values: &p_values,
            forecast: &price_forecast.returns,
        });
        debug!(%explanation, "explanation");

        Ok(ForecastReport {
            ticker: request.ticker.clone(),
            start: request.start,
            end: request.end,
            prices: prices.points(),
            returns: returns.points(),
            order: fitted.order,
            aic: fitted.aic,
            bic: fitted.bic,
            candidates,
            forecast: price_forecast,
            holdout,
            residuals_summary,
            ljung_box,
            explanation,
            price_adf: StationaritySummary::new(price_diagnostics.adf.clone(), "Prices"),
            price_kpss: StationaritySummary::new(price_diagnostics.kpss.clone(), "Prices"),
            price_diagnostics,
            adf: StationaritySummary::new(diagnostics.adf, "Returns"),
            kpss: StationaritySummary::new(diagnostics.kpss, "Returns"),
            acf_pacf,
        })
    }

    /// Fit the requested order, the configured order, or the best searched one.
    fn fit_returns(
        &self,
        train: &[f64],
        requested: Option<ArimaOrder>,
    ) -> Result<(ModelFitResult, Vec<CandidateScore>)> {
        let options = self.config.fit_options();
        match requested.or(self.config.order) {
            Some(order) => {
                let fitted = fit(train, order, &options)?;
                info!(%order, aic = fitted.aic, "fitted requested ARIMA order");
                Ok((fitted, Vec::new()))
            }
            None => {
                let bounds = self.config.search;
                let report = OrderSearch::new(bounds.d, bounds.p_max, bounds.q_max)
                    .with_fit_options(options)
                    .run(train)?;
                Ok((report.best, report.candidates))
            }
        }
    }
}
