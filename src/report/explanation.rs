//! Plain-English summary of a forecast run.

use std::fmt;

use serde::Serialize;

use crate::core::ForecastResult;

/// Facts the explanation is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplanationInputs<'a> {
    /// Differencing order of the fitted model.
    pub d: usize,
    /// Ljung-Box p-values of the lags that could be computed.
    pub ljung_box_p_values: &'a [f64],
    /// Return forecast whose direction is described.
    pub forecast: &'a ForecastResult,
}

/// Ordered explanation sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Explanation {
    sentences: Vec<&'static str>,
}

impl Explanation {
    pub fn sentences(&self) -> &[&'static str] {
        &self.sentences
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sentences.join(" "))
    }
}

/// Ljung-Box significance level for "uncorrelated" residuals.
const LJUNG_BOX_ALPHA: f64 = 0.05;

/// Build the explanation: differencing, selection criterion, residual
/// correlation, forecast direction, always in that order.
///
/// With no Ljung-Box p-values the residuals count as uncorrelated. A flat
/// forecast (last equal to first) is described as downward.
pub fn explain(inputs: &ExplanationInputs<'_>) -> Explanation {
    let differencing = if inputs.d >= 1 {
        "The time series was differenced to achieve stationarity."
    } else {
        "The time series was stationary and did not require differencing."
    };

    let selection =
        "The ARIMA model was selected based on AIC/BIC criteria to balance fit and complexity.";

    let residuals = if inputs
        .ljung_box_p_values
        .iter()
        .all(|&p| p > LJUNG_BOX_ALPHA)
    {
        "The Ljung-Box test indicates that residuals are uncorrelated, suggesting a good model fit."
    } else {
        "The Ljung-Box test indicates that some residual correlation remains, suggesting the model may be improved."
    };

    let direction = if inputs.forecast.is_rising() {
        "The forecast indicates an upward trend in returns."
    } else {
        "The forecast indicates a downward trend in returns."
    };

    Explanation {
        sentences: vec![differencing, selection, residuals, direction],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn returns(points: &[f64]) -> ForecastResult {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..points.len()).map(|i| base + Duration::days(i as i64)).collect();
        let p = points.to_vec();
        ForecastResult::new(p.clone(), p.clone(), p, dates, 0.95).unwrap()
    }

    #[test]
    fn stationary_good_fit_rising() {
        let explanation = explain(&ExplanationInputs {
            d: 0,
            ljung_box_p_values: &[0.40, 0.35, 0.22],
            forecast: &returns(&[0.001, 0.002, 0.004]),
        });

        assert_eq!(
            explanation.to_string(),
            "The time series was stationary and did not require differencing. \
             The ARIMA model was selected based on AIC/BIC criteria to balance fit and complexity. \
             The Ljung-Box test indicates that residuals are uncorrelated, suggesting a good model fit. \
             The forecast indicates an upward trend in returns."
        );
    }

    #[test]
    fn differenced_correlated_falling() {
        let explanation = explain(&ExplanationInputs {
            d: 1,
            ljung_box_p_values: &[0.40, 0.01],
            forecast: &returns(&[0.003, 0.001]),
        });
        let sentences = explanation.sentences();

        assert_eq!(sentences.len(), 4);
        assert!(sentences[0].contains("differenced to achieve stationarity"));
        assert!(sentences[2].contains("some residual correlation remains"));
        assert!(sentences[3].contains("downward trend"));
    }

    #[test]
    fn boundary_p_value_is_not_uncorrelated() {
        let explanation = explain(&ExplanationInputs {
            d: 0,
            ljung_box_p_values: &[0.05],
            forecast: &returns(&[0.0]),
        });
        assert!(explanation.sentences()[2].contains("some residual correlation remains"));
    }

    #[test]
    fn flat_forecast_reads_downward() {
        let explanation = explain(&ExplanationInputs {
            d: 0,
            ljung_box_p_values: &[],
            forecast: &returns(&[0.002, 0.002]),
        });
        assert!(explanation.sentences()[2].contains("residuals are uncorrelated"));
        assert!(explanation.sentences()[3].contains("downward trend"));
    }

    #[test]
    fn serialises_as_sentence_list() {
        let explanation = explain(&ExplanationInputs {
            d: 0,
            ljung_box_p_values: &[0.9],
            forecast: &returns(&[0.0, 1.0]),
        });
        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(4));
    }
}
