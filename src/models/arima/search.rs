//! Exhaustive ARIMA order selection by AIC.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ForecastError, Result};
use crate::models::arima::model::{fit, ArimaOrder, FitOptions, ModelFitResult};

/// Outcome of one grid candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub order: ArimaOrder,
    /// AIC of the fit, `None` when it failed.
    pub aic: Option<f64>,
    /// Why the fit failed.
    pub error: Option<String>,
}

/// Best model of a search together with every attempted candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub best: ModelFitResult,
    /// Candidates in attempt order.
    pub candidates: Vec<CandidateScore>,
}

/// Grid search over `p in 0..=p_max`, `q in 0..=q_max` at a fixed `d`.
///
/// Every pair is attempted with `p` in the outer loop. Failing fits are
/// skipped; the strictly lowest AIC wins so ties keep the earlier candidate.
#[derive(Debug, Clone)]
pub struct OrderSearch {
    d: usize,
    p_max: usize,
    q_max: usize,
    options: FitOptions,
    deadline: Option<Instant>,
}

impl OrderSearch {
    pub fn new(d: usize, p_max: usize, q_max: usize) -> Self {
        Self {
            d,
            p_max,
            q_max,
            options: FitOptions::default(),
            deadline: None,
        }
    }

    /// Estimation settings used for every candidate.
    pub fn with_fit_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop attempting new candidates once `deadline` has passed.
    ///
    /// The deadline is checked between fits; the best model found so far is
    /// returned.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Candidate orders in attempt order.
    pub fn candidates(&self) -> impl Iterator<Item = ArimaOrder> + '_ {
        (0..=self.p_max)
            .flat_map(move |p| (0..=self.q_max).map(move |q| ArimaOrder::new(p, self.d, q)))
    }

    /// Run the search on `series`.
    ///
    /// # Errors
    /// `NoViableModel` when no candidate could be fitted.
    pub fn run(&self, series: &[f64]) -> Result<SearchReport> {
        let mut best: Option<ModelFitResult> = None;
        let mut candidates = Vec::new();

        for order in self.candidates() {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    warn!(
                        attempted = candidates.len(),
                        "order search deadline expired; keeping best model so far"
                    );
                    break;
                }
            }

            match fit(series, order, &self.options) {
                Ok(result) => {
                    debug!(%order, aic = result.aic, "candidate fitted");
                    candidates.push(CandidateScore {
                        order,
                        aic: Some(result.aic),
                        error: None,
                    });
                    if best.as_ref().map_or(true, |b| result.aic < b.aic) {
                        best = Some(result);
                    }
                }
                Err(err) => {
                    debug!(%order, error = %err, "candidate skipped");
                    candidates.push(CandidateScore {
                        order,
                        aic: None,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let best = best.ok_or(ForecastError::NoViableModel {
            d: self.d,
            p_max: self.p_max,
            q_max: self.q_max,
            attempts: candidates.len(),
        })?;
        info!(order = %best.order, aic = best.aic, "selected ARIMA order");

        Ok(SearchReport { best, candidates })
    }
}

/// Select the lowest-AIC ARIMA(p, d, q) with default estimation settings.
pub fn search(series: &[f64], d: usize, p_max: usize, q_max: usize) -> Result<ModelFitResult> {
    OrderSearch::new(d, p_max, q_max)
        .run(series)
        .map(|report| report.best)
}
