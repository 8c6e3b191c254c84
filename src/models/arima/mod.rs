//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - Conditional-sum-of-squares estimation of ARIMA(p, d, q)
//! - Exhaustive order selection by AIC

mod diff;
mod model;
mod search;

pub use diff::{difference, difference_operator, integrate};
pub use model::{fit, ArimaModel, ArimaOrder, FitOptions, ModelFitResult};
pub use search::{search, CandidateScore, OrderSearch, SearchReport};
