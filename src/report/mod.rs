//! Residual diagnostics and the forecast explanation.

pub mod explanation;
pub mod residuals;

pub use explanation::{explain, Explanation, ExplanationInputs};
pub use residuals::ResidualSummary;
