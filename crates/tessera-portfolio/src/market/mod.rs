//! Market data inputs: aligned price histories and risk-free rates.
//!
//! Data acquisition is the caller's business. This module only validates,
//! aligns and resamples what it is given.

mod risk_free;
mod store;

pub use risk_free::{to_periodic, RiskFreeRateSeries};
pub use store::PriceSeriesStore;
