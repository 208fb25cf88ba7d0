//! Configuration for portfolio evaluation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_core::Periodicity;

use super::ReturnConvention;
use crate::error::{PortfolioError, PortfolioResult};

/// Configuration for a single evaluation.
///
/// Passed explicitly to [`evaluate`](crate::evaluate); nothing is read from
/// the environment. Missing fields in serialized form take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Convention used to turn prices into returns.
    pub return_convention: ReturnConvention,

    /// Sampling frequency prices are resampled to before computing returns.
    pub periodicity: Periodicity,

    /// Return periods per year.
    pub annualization_factor: f64,

    /// p-value below which a positive alpha counts as significant.
    pub significance_threshold: f64,

    /// Number of most recent return periods in the trailing window.
    pub trailing_window_length: usize,

    /// Minimum paired observations for alpha/beta estimation.
    pub min_regression_observations: usize,

    /// Relative difference between the two beta estimates above which the
    /// result is flagged.
    pub beta_agreement_tolerance: f64,

    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum holdings count to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            return_convention: ReturnConvention::Simple,
            periodicity: Periodicity::Daily,
            annualization_factor: 252.0,
            significance_threshold: 0.05,
            trailing_window_length: 30,
            min_regression_observations: 20,
            beta_agreement_tolerance: 0.10,
            parallel: true,
            parallel_threshold: 16,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Month-end sampling, annualized by 12.
    #[must_use]
    pub fn monthly() -> Self {
        Self::default().with_periodicity(Periodicity::Monthly)
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the return convention.
    #[must_use]
    pub fn with_return_convention(mut self, convention: ReturnConvention) -> Self {
        self.return_convention = convention;
        self
    }

    /// Sets the periodicity and the matching annualization factor.
    #[must_use]
    pub fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = periodicity;
        self.annualization_factor = periodicity.periods_per_year();
        self
    }

    /// Overrides the annualization factor.
    #[must_use]
    pub fn with_annualization_factor(mut self, factor: f64) -> Self {
        self.annualization_factor = factor;
        self
    }

    /// Sets the significance threshold for alpha.
    #[must_use]
    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    /// Sets the trailing window length in return periods.
    #[must_use]
    pub fn with_trailing_window(mut self, periods: usize) -> Self {
        self.trailing_window_length = periods;
        self
    }

    /// Sets the minimum observations for alpha/beta estimation.
    #[must_use]
    pub fn with_min_regression_observations(mut self, observations: usize) -> Self {
        self.min_regression_observations = observations;
        self
    }

    /// Sets the relative tolerance for the beta cross-check.
    #[must_use]
    pub fn with_beta_tolerance(mut self, tolerance: f64) -> Self {
        self.beta_agreement_tolerance = tolerance;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !(self.annualization_factor.is_finite() && self.annualization_factor > 0.0) {
            return Err(PortfolioError::invalid_config(
                "annualization_factor",
                format!("must be positive, got {}", self.annualization_factor),
            ));
        }
        if !(self.significance_threshold > 0.0 && self.significance_threshold < 1.0) {
            return Err(PortfolioError::invalid_config(
                "significance_threshold",
                format!("must lie in (0, 1), got {}", self.significance_threshold),
            ));
        }
        if self.trailing_window_length == 0 {
            return Err(PortfolioError::invalid_config(
                "trailing_window_length",
                "must be at least 1",
            ));
        }
        if self.min_regression_observations < tessera_math::regression::MIN_OBSERVATIONS {
            return Err(PortfolioError::invalid_config(
                "min_regression_observations",
                format!(
                    "must be at least {}, got {}",
                    tessera_math::regression::MIN_OBSERVATIONS,
                    self.min_regression_observations
                ),
            ));
        }
        if !(self.beta_agreement_tolerance.is_finite() && self.beta_agreement_tolerance >= 0.0) {
            return Err(PortfolioError::invalid_config(
                "beta_agreement_tolerance",
                format!("must be non-negative, got {}", self.beta_agreement_tolerance),
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the document does not parse or fails [`validate`](Self::validate).
    pub fn from_toml_str(s: &str) -> PortfolioResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| PortfolioError::invalid_config("toml", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the file cannot be read or its content is rejected.
    pub fn from_toml_file(path: impl AsRef<Path>) -> PortfolioResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PortfolioError::invalid_config("path", format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}
