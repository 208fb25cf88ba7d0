//! Simple ordinary least squares with coefficient inference.
//!
//! Fits `y = intercept + slope * x + e` and reports standard errors,
//! t-statistics and two-sided p-values for both coefficients under the
//! classical assumptions (Student-t with n − 2 degrees of freedom).

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{MathError, MathResult};
use crate::statistics::{covariance, mean, sample_variance};

/// Minimum observations for a fit with residual degrees of freedom.
pub const MIN_OBSERVATIONS: usize = 3;

/// Result of a simple OLS fit.
///
/// Inference fields are `None` for a perfect fit, where the residuals are
/// indistinguishable from rounding error: the standard errors vanish and the
/// t-statistics carry no information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Number of paired observations.
    pub observations: usize,
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
    /// Coefficient of determination, `None` when `y` is constant.
    pub r_squared: Option<f64>,
    /// Unbiased residual variance, `SSE / (n - 2)`.
    pub residual_variance: f64,
    /// Residuals are within rounding error of zero relative to the scale of `y`.
    pub perfect_fit: bool,
    /// Standard error of the slope.
    pub slope_std_error: Option<f64>,
    /// Standard error of the intercept.
    pub intercept_std_error: Option<f64>,
    /// t-statistic of the slope against zero.
    pub slope_t_stat: Option<f64>,
    /// t-statistic of the intercept against zero.
    pub intercept_t_stat: Option<f64>,
    /// Two-sided p-value for the slope.
    pub slope_p_value: Option<f64>,
    /// Two-sided p-value for the intercept.
    pub intercept_p_value: Option<f64>,
    /// Residuals `y - (intercept + slope * x)`, in input order.
    pub residuals: Vec<f64>,
}

impl LinearRegression {
    /// Fits `ys` on `xs`.
    ///
    /// The slope is `Cov(x, y) / Var(x)` computed with the shared statistics
    /// primitives, and the intercept is `mean(y) - slope * mean(x)`.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` if the samples differ in length
    /// - `InsufficientData` for fewer than [`MIN_OBSERVATIONS`] pairs
    /// - `ZeroVariance` if `xs` is constant
    pub fn fit(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::LengthMismatch {
                left: xs.len(),
                right: ys.len(),
            });
        }
        let n = xs.len();
        if n < MIN_OBSERVATIONS {
            return Err(MathError::insufficient_data(MIN_OBSERVATIONS, n));
        }

        let var_x = sample_variance(xs)?;
        if var_x == 0.0 {
            return Err(MathError::zero_variance("regressor"));
        }

        let slope = covariance(xs, ys)? / var_x;
        let mx = mean(xs)?;
        let my = mean(ys)?;
        let intercept = my - slope * mx;

        let residuals: Vec<f64> = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| y - (intercept + slope * x))
            .collect();
        let sse: f64 = residuals.iter().map(|e| e * e).sum();
        let sst: f64 = ys.iter().map(|y| (y - my) * (y - my)).sum();
        let perfect_fit = is_rounding_noise(sse, ys);

        let r_squared = (sst > 0.0).then(|| (1.0 - sse / sst).clamp(0.0, 1.0));

        let df = (n - 2) as f64;
        let residual_variance = sse / df;
        let sxx = var_x * (n - 1) as f64;

        let (slope_std_error, intercept_std_error) = if !perfect_fit {
            (
                Some((residual_variance / sxx).sqrt()),
                Some((residual_variance * (1.0 / n as f64 + mx * mx / sxx)).sqrt()),
            )
        } else {
            (None, None)
        };

        let slope_t_stat = slope_std_error.map(|se| slope / se);
        let intercept_t_stat = intercept_std_error.map(|se| intercept / se);
        let slope_p_value = slope_t_stat
            .map(|t| student_t_p_value(t, df))
            .transpose()?;
        let intercept_p_value = intercept_t_stat
            .map(|t| student_t_p_value(t, df))
            .transpose()?;

        Ok(Self {
            observations: n,
            slope,
            intercept,
            r_squared,
            residual_variance,
            perfect_fit,
            slope_std_error,
            intercept_std_error,
            slope_t_stat,
            intercept_t_stat,
            slope_p_value,
            intercept_p_value,
            residuals,
        })
    }

    /// Residual degrees of freedom.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.observations - 2
    }
}

/// Returns true if a residual sum of squares `sse` is no larger than the
/// accumulated rounding error of `ys`: `sse <= (n·ε)² · Σy²`.
#[must_use]
pub fn is_rounding_noise(sse: f64, ys: &[f64]) -> bool {
    let scale: f64 = ys.iter().map(|y| y * y).sum();
    let tolerance = ys.len() as f64 * f64::EPSILON;
    sse <= tolerance * tolerance * scale
}

/// Two-sided p-value of a t-statistic with `df` degrees of freedom.
///
/// # Errors
///
/// `InvalidInput` if `df` is not positive or `t` is NaN.
pub fn student_t_p_value(t: f64, df: f64) -> MathResult<f64> {
    if t.is_nan() {
        return Err(MathError::invalid_input("t-statistic is NaN"));
    }
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| MathError::invalid_input(format!("Student-t with df={df}: {e}")))?;
    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}
