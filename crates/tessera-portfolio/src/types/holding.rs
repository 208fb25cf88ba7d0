//! A single weighted position.

use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// A ticker with its fixed portfolio weight.
///
/// Weights are decimal fractions of the portfolio (0.25 for 25%). Negative
/// weights represent short positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Security identifier, as keyed in the price store.
    pub ticker: String,

    /// Fixed weight, rebalanced every period.
    pub weight: f64,
}

impl Holding {
    /// Creates a holding.
    ///
    /// # Errors
    ///
    /// `InvalidHolding` for a blank ticker or a non-finite weight.
    pub fn new(ticker: impl Into<String>, weight: f64) -> PortfolioResult<Self> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(PortfolioError::invalid_holding(ticker, "ticker is empty"));
        }
        if !weight.is_finite() {
            return Err(PortfolioError::invalid_holding(
                ticker,
                format!("weight {weight} is not finite"),
            ));
        }
        Ok(Self { ticker, weight })
    }

    /// Returns true for a short position.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.weight < 0.0
    }
}
