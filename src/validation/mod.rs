//! Statistical tests for series and model residuals.
//!
//! # Example
//!
//! ```
//! use tickercast::validation::{ljung_box_at, StationarityTest};
//!
//! // ADF rejects a unit root, KPSS keeps stationarity: both say "stationary"
//! assert!(StationarityTest::Adf.verdict(0.001).is_stationary);
//! assert!(StationarityTest::Kpss.verdict(0.40).is_stationary);
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let report = ljung_box_at(&residuals, &[5, 10, 20]);
//! assert_eq!(report.lags.len(), 3);
//! assert!(report.lags[2].p_value.is_none());
//! ```

pub mod diagnostics;
pub mod stationarity;

pub use diagnostics::{analyze, DiagnosticsConfig, DiagnosticsReport};
pub use residual_tests::{ljung_box, ljung_box_at, LjungBoxLag, LjungBoxReport, LjungBoxResult};
pub use stationarity::{
    adf_test, kpss_test, test_stationarity, CriticalValues, StationarityConclusion,
    StationarityResult, StationarityTest, StationarityVerdict,
};
