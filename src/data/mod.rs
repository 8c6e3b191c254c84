//! Price data sources.
//!
//! Every provider funnels its raw observations through [`normalize`], so a
//! [`PriceSeries`](crate::core::PriceSeries) is sorted, de-duplicated and
//! restricted to the requested range whatever its origin.

mod csv_file;
mod memory;
mod provider;
#[cfg(feature = "yahoo")]
mod yahoo;

pub use csv_file::CsvProvider;
pub use memory::InMemoryProvider;
pub use provider::{normalize, PriceProvider};
#[cfg(feature = "yahoo")]
pub use yahoo::YahooProvider;
