//! Price provider reading one CSV file per ticker.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::PriceSeries;
use crate::data::provider::{normalize, PriceProvider};
use crate::error::{ForecastError, Result};

/// One `date,price` row.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Price", alias = "close", alias = "Close", alias = "Adj Close")]
    price: f64,
}

/// Reads `<dir>/<TICKER>.csv` files with a `date,price` header.
///
/// Dates use the `YYYY-MM-DD` format. Rows that fail to parse are skipped.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `ticker`.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn read_rows(path: &Path) -> Result<Vec<(NaiveDate, f64)>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (line, record) in reader.deserialize::<PriceRow>().enumerate() {
            match record {
                Ok(row) => rows.push((row.date, row.price)),
                Err(e) => {
                    debug!(line = line + 2, error = %e, "skipping unparsable row");
                    skipped += 1;
                }
            }
        }
        info!(path = %path.display(), rows = rows.len(), skipped, "loaded price file");
        Ok(rows)
    }
}

impl PriceProvider for CsvProvider {
    fn get_price_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(ForecastError::NoData {
                ticker: ticker.to_string(),
                start,
                end,
                reason: format!("{} not found", path.display()),
            });
        }
        let rows = Self::read_rows(&path)?;
        normalize(ticker, start, end, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn provider_with(ticker: &str, contents: &str) -> (TempDir, CsvProvider) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("{ticker}.csv")), contents).unwrap();
        let provider = CsvProvider::new(dir.path());
        (dir, provider)
    }

    #[test]
    fn reads_date_price_columns() {
        let (_dir, provider) = provider_with(
            "AAPL",
            "date,price\n2024-01-02,185.6\n2024-01-03,184.2\n2024-01-04,181.9\n",
        );
        let series = provider
            .get_price_series("AAPL", date(1, 1), date(1, 31))
            .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), date(1, 2));
        assert_eq!(series.prices(), &[185.6, 184.2, 181.9]);
    }

    #[test]
    fn accepts_close_header_and_skips_bad_rows() {
        let (_dir, provider) = provider_with(
            "MSFT",
            "Date,Close\n2024-01-03,371.0\nnot-a-date,1.0\n2024-01-02,370.0\n2024-01-04,\n",
        );
        let series = provider
            .get_price_series("MSFT", date(1, 1), date(1, 31))
            .unwrap();
        assert_eq!(series.prices(), &[370.0, 371.0]);
    }

    #[test]
    fn missing_file_is_no_data() {
        let dir = TempDir::new().unwrap();
        let provider = CsvProvider::new(dir.path());
        let err = provider
            .get_price_series("NONE", date(1, 1), date(1, 31))
            .unwrap_err();
        assert!(matches!(err, ForecastError::NoData { .. }));
    }

    #[test]
    fn nothing_in_range_is_no_data() {
        let (_dir, provider) = provider_with("IBM", "date,price\n2023-06-01,140.0\n");
        let err = provider
            .get_price_series("IBM", date(1, 1), date(1, 31))
            .unwrap_err();
        assert!(matches!(err, ForecastError::NoData { .. }));
    }
}
