//! Numerical helpers shared by the diagnostics and models.

pub mod metrics;
pub mod ols;
pub mod optimization;
pub mod stats;

pub use metrics::{holdout_accuracy, HoldoutAccuracy};
pub use ols::{ols, OlsFit};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{chi_squared_sf, quantile_normal};
