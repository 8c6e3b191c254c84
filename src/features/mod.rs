//! Distribution and correlation features of a series.

pub mod autocorrelation;
pub mod distribution;

pub use autocorrelation::{acf, autocorrelation, pacf, AcfProfile};
pub use distribution::{
    excess_kurtosis, jarque_bera, pearson_kurtosis, skewness, JarqueBeraResult,
};
