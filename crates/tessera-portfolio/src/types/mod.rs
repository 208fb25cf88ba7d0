//! Domain types for portfolio evaluation.
//!
//! - [`Holding`]: a ticker with a fixed weight
//! - [`ReturnConvention`]: simple or logarithmic returns
//! - [`AnalysisConfig`]: configuration passed to every evaluation

mod config;
mod convention;
mod holding;

pub use config::AnalysisConfig;
pub use convention::ReturnConvention;
pub use holding::Holding;
