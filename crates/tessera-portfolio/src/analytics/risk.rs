//! Return, volatility and Sharpe ratio.
//!
//! ## Formulas
//!
//! ```text
//! annualized return     = mean(r) × f
//! annualized volatility = stdev(r) × √f          (sample, n − 1)
//! Sharpe                = (annualized return − annualized rf) / annualized volatility
//! ```
//!
//! where `f` is the annualization factor and the annualized risk-free rate is
//! the mean of the per-period rates over the return dates times `f`.

use serde::{Deserialize, Serialize};
use tessera_core::TimeSeries;
use tessera_math::statistics::{mean, sample_std_dev};

use crate::error::{PortfolioError, PortfolioResult};
use crate::market::RiskFreeRateSeries;

/// Risk and return of one return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Number of return observations.
    pub observations: usize,

    /// Mean period return times the annualization factor.
    pub annualized_return: f64,

    /// Sample standard deviation times the square root of the factor.
    pub annualized_volatility: f64,

    /// Risk-free rate over the same dates, annualized the same way.
    pub annualized_risk_free: f64,

    /// Excess return per unit of volatility. `None` when volatility is zero.
    pub sharpe_ratio: Option<f64>,
}

impl RiskMetrics {
    /// Annualized return in excess of the risk-free rate.
    #[must_use]
    pub fn excess_return(&self) -> f64 {
        self.annualized_return - self.annualized_risk_free
    }
}

/// Computes risk metrics for `returns`.
///
/// `scope` names the portfolio or holding in errors.
///
/// # Errors
///
/// - `InsufficientData` for fewer than two observations
/// - `DataIntegrity` if `risk_free` misses a return date
pub fn risk_metrics(
    scope: &str,
    returns: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    factor: f64,
) -> PortfolioResult<RiskMetrics> {
    let n = returns.len();
    if n < 2 {
        return Err(PortfolioError::insufficient_data("risk metrics", scope, 2, n)
            .with_range(returns.date_range()));
    }

    let annualized_return = annualized_return(returns.values(), factor)
        .map_err(|e| PortfolioError::from_math("annualized return", scope, &e))?;
    let annualized_volatility = annualized_volatility(returns.values(), factor)
        .map_err(|e| PortfolioError::from_math("annualized volatility", scope, &e))?;
    let annualized_risk_free = risk_free.annualized_over(returns.dates(), factor)?;

    let sharpe_ratio = sharpe_ratio(annualized_return, annualized_risk_free, annualized_volatility);

    Ok(RiskMetrics {
        observations: n,
        annualized_return,
        annualized_volatility,
        annualized_risk_free,
        sharpe_ratio,
    })
}

/// Mean period return times `factor`.
pub fn annualized_return(returns: &[f64], factor: f64) -> tessera_math::MathResult<f64> {
    Ok(mean(returns)? * factor)
}

/// Sample standard deviation times `sqrt(factor)`.
pub fn annualized_volatility(returns: &[f64], factor: f64) -> tessera_math::MathResult<f64> {
    Ok(sample_std_dev(returns)? * factor.sqrt())
}

/// Excess return over volatility, undefined for zero volatility.
#[must_use]
pub fn sharpe_ratio(annualized_return: f64, annualized_risk_free: f64, volatility: f64) -> Option<f64> {
    (volatility > 0.0).then(|| (annualized_return - annualized_risk_free) / volatility)
}
