//! Core data structures: dated series, forecast results and horizon calendars.

mod calendar;
mod forecast;
mod series;

pub use calendar::{Frequency, HorizonDates};
pub use forecast::{ForecastResult, PriceForecast};
pub use series::{PricePoint, PriceSeries, ReturnPoint, ReturnSeries};
