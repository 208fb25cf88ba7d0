//! Evaluation output records.

use serde::{Deserialize, Serialize};
use tessera_core::DateRange;

use crate::analytics::{
    BetaCrossCheck, CorrelationMatrix, CovarianceEstimate, RegressionEstimate, RiskMetrics,
};
use crate::error::PortfolioError;
use crate::types::AnalysisConfig;

/// A statistic that could not be computed, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndefinedStatistic {
    /// Name of the statistic.
    pub statistic: String,
    /// Portfolio, holding ticker, benchmark or window.
    pub scope: String,
    /// Dates the computation covered.
    pub range: Option<DateRange>,
    /// Cause.
    pub reason: String,
}

impl UndefinedStatistic {
    /// Creates a record.
    #[must_use]
    pub fn new(
        statistic: impl Into<String>,
        scope: impl Into<String>,
        range: Option<DateRange>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            statistic: statistic.into(),
            scope: scope.into(),
            range,
            reason: reason.into(),
        }
    }

    /// Record for an `InsufficientData` error, `None` for any other error.
    #[must_use]
    pub fn from_error(err: &PortfolioError) -> Option<Self> {
        match err {
            PortfolioError::InsufficientData {
                statistic,
                scope,
                range,
                required,
                actual,
            } => Some(Self::new(
                statistic.as_str(),
                scope.as_str(),
                *range,
                format!("insufficient data: need at least {required}, got {actual}"),
            )),
            _ => None,
        }
    }
}

/// One holding evaluated on its own (weight 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingBreakdown {
    /// Ticker.
    pub ticker: String,
    /// Portfolio weight.
    pub weight: f64,
    /// Compounded return over the evaluated range.
    pub period_return: f64,
    /// Risk and return of the holding alone.
    pub metrics: Option<RiskMetrics>,
    /// Covariance-method alpha/beta against the benchmark.
    pub covariance: Option<CovarianceEstimate>,
    /// Regression-method alpha/beta against the benchmark.
    pub regression: Option<RegressionEstimate>,
    /// `annualized return × weight`.
    pub contribution: Option<f64>,
}

impl HoldingBreakdown {
    /// Covariance-method beta.
    #[must_use]
    pub fn beta(&self) -> Option<f64> {
        self.covariance.as_ref().map(|c| c.beta)
    }

    /// Annualized return of the holding.
    #[must_use]
    pub fn annualized_return(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.annualized_return)
    }

    /// Annualized volatility of the holding.
    #[must_use]
    pub fn annualized_volatility(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.annualized_volatility)
    }
}

/// Re-run of the risk and alpha/beta analysis over the most recent periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingWindowResult {
    /// Configured window length.
    pub requested_periods: usize,
    /// Return periods actually used (the whole history when shorter).
    pub periods: usize,
    /// Dates of the returns in the window.
    pub date_range: DateRange,
    /// Compounded portfolio return over the window.
    pub portfolio_return: f64,
    /// Compounded benchmark return over the window.
    pub benchmark_return: f64,
    /// Portfolio minus benchmark compounded return.
    pub excess_return: f64,
    /// Portfolio risk metrics over the window.
    pub metrics: Option<RiskMetrics>,
    /// Benchmark risk metrics over the window.
    pub benchmark_metrics: Option<RiskMetrics>,
    /// Covariance-method alpha/beta over the window.
    pub covariance: Option<CovarianceEstimate>,
    /// Regression-method alpha/beta over the window.
    pub regression: Option<RegressionEstimate>,
}

impl TrailingWindowResult {
    /// Annualized benchmark volatility over the window.
    #[must_use]
    pub fn benchmark_volatility(&self) -> Option<f64> {
        self.benchmark_metrics
            .as_ref()
            .map(|m| m.annualized_volatility)
    }
}

/// Sum of holding contributions against the portfolio's annualized return.
///
/// Under the simple convention the two agree up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Portfolio annualized return.
    pub portfolio_return: f64,
    /// Sum of `annualized return × weight` over holdings.
    pub contribution_total: f64,
    /// `portfolio_return − contribution_total`.
    pub difference: f64,
}

/// Full evaluation of a portfolio against a benchmark.
///
/// Built once per evaluation and never mutated. Statistics that could not be
/// computed are `None` and listed in [`undefined`](Self::undefined).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Portfolio name.
    pub portfolio: String,
    /// Benchmark identifier.
    pub benchmark: String,
    /// Configuration used.
    pub config: AnalysisConfig,
    /// Dates of the return observations.
    pub date_range: DateRange,
    /// Number of return observations.
    pub observations: usize,
    /// Compounded portfolio return over the range.
    pub period_return: f64,
    /// Compounded benchmark return over the range.
    pub benchmark_period_return: f64,
    /// Portfolio risk metrics.
    pub metrics: Option<RiskMetrics>,
    /// Benchmark risk metrics.
    pub benchmark_metrics: Option<RiskMetrics>,
    /// Covariance-method alpha/beta.
    pub covariance: Option<CovarianceEstimate>,
    /// Regression-method alpha/beta.
    pub regression: Option<RegressionEstimate>,
    /// Agreement of the two betas.
    pub beta_check: Option<BetaCrossCheck>,
    /// Correlations among holdings and the benchmark (benchmark last).
    pub correlation: CorrelationMatrix,
    /// Per-holding breakdown in portfolio order.
    pub holdings: Vec<HoldingBreakdown>,
    /// Most recent sub-period.
    pub trailing: Option<TrailingWindowResult>,
    /// Statistics reported as undefined.
    pub undefined: Vec<UndefinedStatistic>,
}

impl AnalysisResult {
    /// Portfolio annualized return.
    #[must_use]
    pub fn annualized_return(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.annualized_return)
    }

    /// Portfolio annualized volatility.
    #[must_use]
    pub fn annualized_volatility(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.annualized_volatility)
    }

    /// Portfolio Sharpe ratio.
    #[must_use]
    pub fn sharpe_ratio(&self) -> Option<f64> {
        self.metrics.as_ref().and_then(|m| m.sharpe_ratio)
    }

    /// Alpha by the covariance method.
    #[must_use]
    pub fn alpha_covariance(&self) -> Option<f64> {
        self.covariance.as_ref().map(|c| c.alpha)
    }

    /// Alpha by the regression method.
    #[must_use]
    pub fn alpha_regression(&self) -> Option<f64> {
        self.regression.as_ref().map(|r| r.alpha)
    }

    /// Beta by the covariance method.
    #[must_use]
    pub fn beta_covariance(&self) -> Option<f64> {
        self.covariance.as_ref().map(|c| c.beta)
    }

    /// Beta by the regression method.
    #[must_use]
    pub fn beta_regression(&self) -> Option<f64> {
        self.regression.as_ref().map(|r| r.beta)
    }

    /// Regression R².
    #[must_use]
    pub fn r_squared(&self) -> Option<f64> {
        self.regression.as_ref().and_then(|r| r.r_squared)
    }

    /// Two-sided p-value of the regression beta.
    #[must_use]
    pub fn beta_p_value(&self) -> Option<f64> {
        self.regression.as_ref().and_then(|r| r.beta_p_value)
    }

    /// Alpha is positive and significant.
    #[must_use]
    pub fn alpha_is_significant(&self) -> bool {
        self.regression
            .as_ref()
            .is_some_and(|r| r.alpha_is_significant)
    }

    /// Breakdown for `ticker`.
    #[must_use]
    pub fn holding(&self, ticker: &str) -> Option<&HoldingBreakdown> {
        self.holdings.iter().find(|h| h.ticker == ticker)
    }

    /// Returns true if `statistic` was reported undefined for `scope`.
    #[must_use]
    pub fn is_undefined(&self, statistic: &str, scope: &str) -> bool {
        self.undefined
            .iter()
            .any(|u| u.statistic == statistic && u.scope == scope)
    }

    /// Compares holding contributions with the portfolio annualized return.
    ///
    /// `None` when the portfolio return or any contribution is undefined.
    #[must_use]
    pub fn reconciliation(&self) -> Option<Reconciliation> {
        let portfolio_return = self.annualized_return()?;
        let contribution_total = self
            .holdings
            .iter()
            .map(|h| h.contribution)
            .sum::<Option<f64>>()?;
        Some(Reconciliation {
            portfolio_return,
            contribution_total,
            difference: portfolio_return - contribution_total,
        })
    }
}
