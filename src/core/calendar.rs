//! Forecast horizon dates.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Spacing of generated horizon dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Consecutive calendar days.
    #[default]
    Daily,
    /// Monday to Friday only.
    BusinessDaily,
}

impl Frequency {
    /// The next date after `date` at this frequency.
    pub fn next(self, date: NaiveDate) -> NaiveDate {
        let mut next = date + Duration::days(1);
        if self == Self::BusinessDaily {
            while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                next += Duration::days(1);
            }
        }
        next
    }

    /// `horizon` dates continuing immediately after `last`.
    pub fn continue_from(self, last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(horizon);
        let mut current = last;
        for _ in 0..horizon {
            current = self.next(current);
            dates.push(current);
        }
        dates
    }
}

/// Where forecast dates come from.
#[derive(Debug, Clone, PartialEq)]
pub enum HorizonDates {
    /// Generate dates after the last training date.
    Continue(Frequency),
    /// Use these held-out dates verbatim.
    Aligned(Vec<NaiveDate>),
}

impl HorizonDates {
    /// Resolve to exactly `horizon` strictly increasing dates after `last_training`.
    pub fn resolve(&self, last_training: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
        match self {
            Self::Continue(freq) => Ok(freq.continue_from(last_training, horizon)),
            Self::Aligned(dates) => {
                if dates.len() != horizon {
                    return Err(ForecastError::Forecast(format!(
                        "{} aligned dates for a horizon of {horizon}",
                        dates.len()
                    )));
                }
                if let Some(&first) = dates.first() {
                    if first <= last_training {
                        return Err(ForecastError::TimestampError(format!(
                            "forecast date {first} does not follow training date {last_training}"
                        )));
                    }
                }
                if dates.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(ForecastError::TimestampError(
                        "aligned forecast dates must be strictly increasing".to_string(),
                    ));
                }
                Ok(dates.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_continues_every_calendar_day() {
        let dates = Frequency::Daily.continue_from(date(2024, 2, 28), 3);
        assert_eq!(dates, vec![date(2024, 2, 29), date(2024, 3, 1), date(2024, 3, 2)]);
    }

    #[test]
    fn business_daily_skips_weekends() {
        // 2024-01-05 is a Friday
        let dates = Frequency::BusinessDaily.continue_from(date(2024, 1, 5), 3);
        assert_eq!(dates, vec![date(2024, 1, 8), date(2024, 1, 9), date(2024, 1, 10)]);
    }

    #[test]
    fn aligned_dates_must_follow_training() {
        let aligned = HorizonDates::Aligned(vec![date(2024, 1, 2), date(2024, 1, 3)]);
        assert!(aligned.resolve(date(2024, 1, 1), 2).is_ok());
        assert!(matches!(
            aligned.resolve(date(2024, 1, 2), 2),
            Err(ForecastError::TimestampError(_))
        ));
        assert!(matches!(
            aligned.resolve(date(2024, 1, 1), 3),
            Err(ForecastError::Forecast(_))
        ));
    }

    #[test]
    fn frequency_deserialises_snake_case() {
        let freq: Frequency = serde_json::from_str("\"business_daily\"").unwrap();
        assert_eq!(freq, Frequency::BusinessDaily);
    }
}
