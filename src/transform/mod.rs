//! Price-to-return transformations and train/test splitting.
//!
//! # Example
//!
//! ```
//! use tickercast::transform::compound;
//!
//! let prices = compound(100.0, &[0.01, -0.02, 0.03]);
//! assert!((prices[2] - 101.9494).abs() < 1e-9);
//! ```

pub mod returns;
pub mod split;

pub use returns::{compound, pct_change};
pub use split::split_index;
