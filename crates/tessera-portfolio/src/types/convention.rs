//! Return convention for period-over-period returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a return is derived from two consecutive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnConvention {
    /// `(p_t - p_{t-1}) / p_{t-1}`.
    #[default]
    Simple,
    /// `ln(p_t / p_{t-1})`.
    Logarithmic,
}

impl ReturnConvention {
    /// Return for one period from the previous and current price.
    ///
    /// Callers guarantee both prices are strictly positive.
    #[must_use]
    pub fn period_return(self, previous: f64, current: f64) -> f64 {
        match self {
            Self::Simple => (current - previous) / previous,
            Self::Logarithmic => (current / previous).ln(),
        }
    }

    /// Compounds a sequence of period returns into one holding-period return.
    ///
    /// Simple returns chain multiplicatively, log returns add. An empty
    /// sequence compounds to zero.
    #[must_use]
    pub fn compound(self, returns: &[f64]) -> f64 {
        match self {
            Self::Simple => returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0,
            Self::Logarithmic => returns.iter().sum::<f64>().exp_m1(),
        }
    }
}

impl fmt::Display for ReturnConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Logarithmic => write!(f, "logarithmic"),
        }
    }
}
