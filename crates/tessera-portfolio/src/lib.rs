//! # Tessera Portfolio
//!
//! Performance and risk evaluation of a fixed-weight portfolio against a
//! benchmark.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: every calculation takes its inputs explicitly, with no
//!   I/O and no caching
//! - **Fail fast on bad data**: misaligned series and non-positive prices are
//!   errors, never silently reindexed or filled
//! - **Undefined is not zero**: degenerate statistics are `None` and listed in
//!   the result with their cause
//! - **Config-driven parallelism**: optional rayon support with threshold-based
//!   switching
//!
//! ## Features
//!
//! - **Returns**: simple and logarithmic, fixed-weight portfolio returns,
//!   compounding, periodic resampling
//! - **Risk**: annualized return and volatility, Sharpe ratio against a
//!   risk-free rate series
//! - **Alpha/Beta**: covariance and OLS methods cross-checked, with standard
//!   errors, p-values, information ratio and significance verdict
//! - **Correlation**: pairwise correlation and covariance matrices
//! - **Report**: full range, trailing window and per-holding breakdown
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera_portfolio::prelude::*;
//!
//! let portfolio = Portfolio::builder("Core")
//!     .add("AAPL", 0.4)
//!     .add("MSFT", 0.6)
//!     .build()?;
//! let store = PriceSeriesStore::inner_join(vec![
//!     ("AAPL", aapl), ("MSFT", msft), ("SPY", spy),
//! ])?;
//! let rf = RiskFreeRateSeries::from_percent(&irx)?;
//!
//! let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default())?;
//! println!("alpha {:?} beta {:?}", result.alpha_regression(), result.beta_regression());
//! ```
//!
//! ## Module Overview
//!
//! - [`analytics`] - Returns, risk, alpha/beta, correlation
//! - [`market`] - Price store and risk-free rates
//! - [`portfolio`] - Portfolio and builder types
//! - [`report`] - [`evaluate`] and its result types
//! - [`types`] - Holding, return convention, configuration
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing of the per-holding breakdown

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod error;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod types;

// Re-export error types at crate root
pub use error::{PortfolioError, PortfolioResult};

pub use types::{AnalysisConfig, Holding, ReturnConvention};

pub use portfolio::{Portfolio, PortfolioBuilder, WEIGHT_TOLERANCE};

pub use market::{PriceSeriesStore, RiskFreeRateSeries};

pub use analytics::{
    annualized_return, annualized_volatility, compounded_return, correlation_matrix,
    covariance_alpha_beta, cross_check_betas, maybe_parallel_map, portfolio_returns,
    price_returns, regression_alpha_beta, returns_by_ticker, risk_metrics, sharpe_ratio,
    BetaCrossCheck, CorrelationMatrix, CovarianceEstimate, RegressionEstimate, RiskMetrics,
};

pub use report::{
    evaluate, AnalysisResult, HoldingBreakdown, Reconciliation, TrailingWindowResult,
    UndefinedStatistic,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analytics::{
        covariance_alpha_beta, portfolio_returns, price_returns, regression_alpha_beta,
        risk_metrics, CorrelationMatrix, CovarianceEstimate, RegressionEstimate, RiskMetrics,
    };
    pub use crate::error::{PortfolioError, PortfolioResult};
    pub use crate::market::{PriceSeriesStore, RiskFreeRateSeries};
    pub use crate::portfolio::{Portfolio, PortfolioBuilder};
    pub use crate::report::{evaluate, AnalysisResult, HoldingBreakdown, TrailingWindowResult};
    pub use crate::types::{AnalysisConfig, Holding, ReturnConvention};
}
