//! Error types for portfolio evaluation.
//!
//! Three families matter to callers:
//!
//! - [`PortfolioError::DataIntegrity`]: the input data is wrong (non-positive
//!   price, unordered dates, misaligned series). Fatal for the scope it is
//!   detected in.
//! - [`PortfolioError::InsufficientData`]: too few observations for one
//!   statistic. The report records the statistic as undefined and carries on.
//! - [`PortfolioError::WeightValidation`]: weights do not sum to one. Fatal at
//!   portfolio construction.

use tessera_core::{CoreError, DateRange};
use tessera_math::MathError;
use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

fn fmt_range(range: &Option<DateRange>) -> String {
    range.map(|r| format!(" over {r}")).unwrap_or_default()
}

/// Errors that can occur during portfolio evaluation.
#[derive(Error, Debug, Clone)]
pub enum PortfolioError {
    /// Input data violates a structural invariant.
    #[error("Data integrity error in '{series}'{}: {reason}", fmt_range(.range))]
    DataIntegrity {
        /// Ticker or series identifier.
        series: String,
        /// Dates affected, when known.
        range: Option<DateRange>,
        /// What is wrong.
        reason: String,
    },

    /// Too few observations for a statistic.
    #[error("Insufficient data for {statistic} of '{scope}'{}: need at least {required}, got {actual}", fmt_range(.range))]
    InsufficientData {
        /// Name of the statistic.
        statistic: String,
        /// Portfolio, holding ticker or window the statistic was computed for.
        scope: String,
        /// Dates covered by the attempted computation.
        range: Option<DateRange>,
        /// Minimum required observations.
        required: usize,
        /// Observations available.
        actual: usize,
    },

    /// Portfolio weights do not sum to one.
    #[error("Weights sum to {sum:.6}, expected 1.0 within {tolerance:e}")]
    WeightValidation {
        /// Actual sum of weights.
        sum: f64,
        /// Allowed absolute deviation.
        tolerance: f64,
    },

    /// Invalid holding data.
    #[error("Invalid holding '{ticker}': {reason}")]
    InvalidHolding {
        /// The holding ticker.
        ticker: String,
        /// The reason the holding is invalid.
        reason: String,
    },

    /// Empty portfolio.
    #[error("Portfolio has no holdings")]
    EmptyPortfolio,

    /// A series required for evaluation is absent from the store.
    #[error("No series for '{ticker}' in price store")]
    MissingSeries {
        /// The requested identifier.
        ticker: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        /// Offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Calculation failed for a reason other than data volume.
    #[error("Calculation of {statistic} failed: {reason}")]
    CalculationFailed {
        /// Name of the statistic.
        statistic: String,
        /// The reason the calculation failed.
        reason: String,
    },

    /// Error from core types.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the statistics layer.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl PortfolioError {
    /// Create a data integrity error.
    #[must_use]
    pub fn data_integrity(series: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataIntegrity {
            series: series.into(),
            range: None,
            reason: reason.into(),
        }
    }

    /// Create an insufficient data error.
    #[must_use]
    pub fn insufficient_data(
        statistic: impl Into<String>,
        scope: impl Into<String>,
        required: usize,
        actual: usize,
    ) -> Self {
        Self::InsufficientData {
            statistic: statistic.into(),
            scope: scope.into(),
            range: None,
            required,
            actual,
        }
    }

    /// Create an invalid holding error.
    #[must_use]
    pub fn invalid_holding(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHolding {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attaches a date range to data errors that do not carry one yet.
    #[must_use]
    pub fn with_range(mut self, new_range: Option<DateRange>) -> Self {
        match &mut self {
            Self::DataIntegrity { range, .. } | Self::InsufficientData { range, .. } => {
                if range.is_none() {
                    *range = new_range;
                }
            }
            _ => {}
        }
        self
    }

    /// Wraps a structural series error with the identifier of the series.
    #[must_use]
    pub fn from_core(series: impl Into<String>, err: &CoreError) -> Self {
        Self::DataIntegrity {
            series: series.into(),
            range: err.date().map(|d| DateRange::new(d, d)),
            reason: err.to_string(),
        }
    }

    /// Maps a statistics error onto the portfolio taxonomy.
    ///
    /// Too few points becomes `InsufficientData`, mismatched samples become
    /// `DataIntegrity`, anything else is a failed calculation.
    #[must_use]
    pub fn from_math(statistic: impl Into<String>, scope: impl Into<String>, err: &MathError) -> Self {
        let statistic = statistic.into();
        let scope = scope.into();
        match err {
            MathError::InsufficientData { required, actual } => {
                Self::insufficient_data(statistic, scope, *required, *actual)
            }
            MathError::LengthMismatch { .. } => Self::data_integrity(scope, err.to_string()),
            MathError::ZeroVariance { .. } | MathError::InvalidInput { .. } => {
                Self::CalculationFailed {
                    statistic,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// True for errors that only make one statistic undefined.
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
