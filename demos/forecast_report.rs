//! End-to-end forecast report for one ticker.
//!
//! Run with: cargo run --example forecast_report [CSV_DIR TICKER]
//!
//! Without arguments a synthetic price history is used. With a directory and
//! a ticker, `<CSV_DIR>/<TICKER>.csv` is read (`Date,Close` columns).
//! Set `RUST_LOG=tickercast=debug` to see every order-search candidate.

use std::error::Error;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickercast::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn synthetic_provider(ticker: &str) -> (InMemoryProvider, NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut price = 180.0;
    let observations: Vec<_> = (0..300)
        .map(|i| {
            price *= 1.0 + 0.0004 + rng.gen_range(-0.02..0.02);
            (start + Duration::days(i), price)
        })
        .collect();
    let end = observations[observations.len() - 1].0;
    (InMemoryProvider::new().with_series(ticker, observations), start, end)
}

fn print_report(report: &ForecastReport) {
    println!("=== {} forecast ===\n", report.ticker);
    println!("Selected ARIMA{}  AIC {:.2}  BIC {:.2}", report.order, report.aic, report.bic);

    println!("\n--- Stationarity of returns ---");
    println!("ADF  p={:.4}\n{}", report.adf.result.p_value, report.adf.response);
    println!("KPSS p={:.4}\n{}", report.kpss.result.p_value, report.kpss.response);

    println!("\n--- Price forecast ---");
    let f = &report.forecast;
    for (i, date) in f.dates().iter().enumerate().take(10) {
        println!(
            "{date}  price {:>9.2}  return {:+.5}  [{:+.5}, {:+.5}]",
            f.prices[i], f.returns.point[i], f.returns.lower_ci[i], f.returns.upper_ci[i]
        );
    }

    if let Some(holdout) = &report.holdout {
        println!("\nHold-out MAE {:.3}  RMSE {:.3}", holdout.mae, holdout.rmse);
    }

    println!("\n--- Explanation ---");
    println!("{}", report.explanation);
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickercast=info".into()),
        )
        .init();

    let config = PipelineConfig {
        search: SearchBounds {
            d: 0,
            p_max: 2,
            q_max: 2,
        },
        ..Default::default()
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [dir, ticker] => {
            let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            let end = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
            Pipeline::new(CsvProvider::new(dir), config)
                .forecast_report(&ForecastRequest::new(ticker.as_str(), start, end))
        }
        _ => {
            let (provider, start, end) = synthetic_provider("SYNTH");
            Pipeline::new(provider, config)
                .forecast_report(&ForecastRequest::new("SYNTH", start, end))
        }
    };

    match result {
        Ok(report) => {
            print_report(&report);
            println!("\n--- Explanation JSON ---");
            let json = serde_json::to_string_pretty(&report.explanation).unwrap();
            println!("{json}");
        }
        Err(e) => {
            eprintln!("forecast failed: {e}");
            let mut cause = e.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {inner}");
                cause = inner.source();
            }
            std::process::exit(1);
        }
    }
}
