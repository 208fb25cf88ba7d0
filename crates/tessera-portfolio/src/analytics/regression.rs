//! Alpha and beta against a benchmark, estimated two independent ways.
//!
//! - **Covariance method**: `β = Cov(p, b) / Var(b)`, `α = mean(p) − β × mean(b)`
//!   on raw returns, annualized by the factor. Jensen's alpha against the
//!   risk-free rate is reported alongside.
//! - **Regression method**: OLS of portfolio excess returns on benchmark excess
//!   returns. Slope is beta, annualized intercept is alpha, with standard
//!   errors, t-statistics and two-sided p-values.
//!
//! Both methods share the covariance and variance primitives of
//! `tessera-math`, so with a zero risk-free rate the two betas are
//! bit-for-bit identical.

use serde::{Deserialize, Serialize};
use tessera_core::TimeSeries;
use tessera_math::regression::LinearRegression;
use tessera_math::statistics::{correlation, covariance, mean, sample_std_dev, sample_variance};
use tessera_math::MathError;
use tracing::warn;

use crate::error::{PortfolioError, PortfolioResult};
use crate::market::RiskFreeRateSeries;
use crate::types::AnalysisConfig;

/// Covariance-method estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceEstimate {
    /// Paired observations used.
    pub observations: usize,
    /// `Cov(p, b) / Var(b)`.
    pub beta: f64,
    /// Annualized `mean(p) − β × mean(b)`.
    pub alpha: f64,
    /// Annualized Jensen's alpha: `mean(p) − [rf + β × (mean(b) − rf)]`.
    pub jensen_alpha: f64,
}

/// Regression-method estimate with inference.
///
/// Inference fields are `None` for a perfect fit, where the residual
/// variance is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionEstimate {
    /// Paired observations used.
    pub observations: usize,
    /// Slope of portfolio excess on benchmark excess returns.
    pub beta: f64,
    /// Intercept times the annualization factor.
    pub alpha: f64,
    /// Coefficient of determination.
    pub r_squared: Option<f64>,
    /// Standard error of beta.
    pub beta_std_error: Option<f64>,
    /// Standard error of the annualized alpha.
    pub alpha_std_error: Option<f64>,
    /// t-statistic of beta against zero.
    pub beta_t_stat: Option<f64>,
    /// t-statistic of alpha against zero.
    pub alpha_t_stat: Option<f64>,
    /// Two-sided p-value of beta.
    pub beta_p_value: Option<f64>,
    /// Two-sided p-value of alpha.
    pub alpha_p_value: Option<f64>,
    /// Annualized mean over volatility of the per-period alpha contribution
    /// (intercept plus residual). `None` for a perfect fit.
    pub information_ratio: Option<f64>,
    /// Correlation of the alpha contribution with benchmark excess returns.
    /// `None` for a perfect fit.
    pub alpha_benchmark_correlation: Option<f64>,
    /// Alpha is positive and its p-value is below the significance threshold.
    pub alpha_is_significant: bool,
}

/// Comparison of the two beta estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaCrossCheck {
    /// Beta from the covariance method.
    pub covariance_beta: f64,
    /// Beta from the regression method.
    pub regression_beta: f64,
    /// `|β_cov − β_reg| / max(|β_cov|, |β_reg|)`, zero when both are zero.
    pub relative_difference: f64,
    /// Relative difference within tolerance.
    pub agrees: bool,
}

impl BetaCrossCheck {
    /// Compares two betas against a relative `tolerance`.
    #[must_use]
    pub fn new(covariance_beta: f64, regression_beta: f64, tolerance: f64) -> Self {
        let scale = covariance_beta.abs().max(regression_beta.abs());
        let relative_difference = if scale == 0.0 {
            0.0
        } else {
            (covariance_beta - regression_beta).abs() / scale
        };
        Self {
            covariance_beta,
            regression_beta,
            relative_difference,
            agrees: relative_difference <= tolerance,
        }
    }
}

/// Checks both estimates against each other, warning on disagreement.
///
/// Disagreement is a data-quality signal, never an error.
#[must_use]
pub fn cross_check_betas(
    scope: &str,
    covariance: &CovarianceEstimate,
    regression: &RegressionEstimate,
    tolerance: f64,
) -> BetaCrossCheck {
    let check = BetaCrossCheck::new(covariance.beta, regression.beta, tolerance);
    if !check.agrees {
        warn!(
            scope,
            covariance_beta = check.covariance_beta,
            regression_beta = check.regression_beta,
            relative_difference = check.relative_difference,
            tolerance,
            "beta estimates disagree"
        );
    }
    check
}

/// Covariance-method alpha and beta.
///
/// Returns `Ok(None)` when the benchmark has zero variance.
///
/// # Errors
///
/// - `DataIntegrity` if the series are not aligned or `risk_free` misses a date
/// - `InsufficientData` below `config.min_regression_observations` pairs
pub fn covariance_alpha_beta(
    scope: &str,
    portfolio: &TimeSeries,
    benchmark: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    config: &AnalysisConfig,
) -> PortfolioResult<Option<CovarianceEstimate>> {
    const STATISTIC: &str = "covariance alpha/beta";
    check_inputs(STATISTIC, scope, portfolio, benchmark, config)?;
    let math = |e: MathError| PortfolioError::from_math(STATISTIC, scope, &e);

    let p = portfolio.values();
    let b = benchmark.values();
    let var_b = sample_variance(b).map_err(math)?;
    if var_b == 0.0 {
        return Ok(None);
    }

    let beta = covariance(b, p).map_err(math)? / var_b;
    let mean_p = mean(p).map_err(math)?;
    let mean_b = mean(b).map_err(math)?;
    let alpha = (mean_p - beta * mean_b) * config.annualization_factor;

    let rf = risk_free.periodic_over(portfolio.dates(), config.annualization_factor)?;
    let mean_rf = mean(&rf).map_err(math)?;
    let expected = mean_rf + beta * (mean_b - mean_rf);
    let jensen_alpha = (mean_p - expected) * config.annualization_factor;

    Ok(Some(CovarianceEstimate {
        observations: p.len(),
        beta,
        alpha,
        jensen_alpha,
    }))
}

/// Regression-method alpha and beta on excess returns.
///
/// Returns `Ok(None)` when the benchmark excess returns have zero variance.
///
/// # Errors
///
/// Same as [`covariance_alpha_beta`].
pub fn regression_alpha_beta(
    scope: &str,
    portfolio: &TimeSeries,
    benchmark: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    config: &AnalysisConfig,
) -> PortfolioResult<Option<RegressionEstimate>> {
    const STATISTIC: &str = "regression alpha/beta";
    check_inputs(STATISTIC, scope, portfolio, benchmark, config)?;
    let math = |e: MathError| PortfolioError::from_math(STATISTIC, scope, &e);
    let factor = config.annualization_factor;

    let rf = risk_free.periodic_over(portfolio.dates(), factor)?;
    let excess_p: Vec<f64> = portfolio.values().iter().zip(&rf).map(|(r, f)| r - f).collect();
    let excess_b: Vec<f64> = benchmark.values().iter().zip(&rf).map(|(r, f)| r - f).collect();

    let fit = match LinearRegression::fit(&excess_b, &excess_p) {
        Ok(fit) => fit,
        Err(MathError::ZeroVariance { .. }) => return Ok(None),
        Err(e) => return Err(math(e)),
    };

    let alpha = fit.intercept * factor;

    // With a perfect fit the alpha contribution is rounding noise.
    let (information_ratio, alpha_benchmark_correlation) = if fit.perfect_fit {
        (None, None)
    } else {
        let alpha_contribution: Vec<f64> =
            fit.residuals.iter().map(|e| fit.intercept + e).collect();
        let sd = sample_std_dev(&alpha_contribution).map_err(math)?;
        let ir = if sd > 0.0 {
            Some(mean(&alpha_contribution).map_err(math)? / sd * factor.sqrt())
        } else {
            None
        };
        (ir, correlation(&alpha_contribution, &excess_b).map_err(math)?)
    };

    let alpha_is_significant = alpha > 0.0
        && fit
            .intercept_p_value
            .is_some_and(|p| p < config.significance_threshold);

    Ok(Some(RegressionEstimate {
        observations: fit.observations,
        beta: fit.slope,
        alpha,
        r_squared: fit.r_squared,
        beta_std_error: fit.slope_std_error,
        alpha_std_error: fit.intercept_std_error.map(|se| se * factor),
        beta_t_stat: fit.slope_t_stat,
        alpha_t_stat: fit.intercept_t_stat,
        beta_p_value: fit.slope_p_value,
        alpha_p_value: fit.intercept_p_value,
        information_ratio,
        alpha_benchmark_correlation,
        alpha_is_significant,
    }))
}

fn check_inputs(
    statistic: &str,
    scope: &str,
    portfolio: &TimeSeries,
    benchmark: &TimeSeries,
    config: &AnalysisConfig,
) -> PortfolioResult<()> {
    portfolio
        .ensure_aligned(benchmark)
        .map_err(|e| PortfolioError::from_core(scope, &e))?;
    let required = config.min_regression_observations;
    if portfolio.len() < required {
        return Err(
            PortfolioError::insufficient_data(statistic, scope, required, portfolio.len())
                .with_range(portfolio.date_range()),
        );
    }
    Ok(())
}
