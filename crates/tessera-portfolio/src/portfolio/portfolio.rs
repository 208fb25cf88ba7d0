//! Portfolio struct and core methods.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::Holding;

/// Allowed absolute deviation of the weight sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// A fixed-weight basket of securities.
///
/// Holdings keep their insertion order, tickers are unique and weights sum to
/// one within [`WEIGHT_TOLERANCE`]. Weights are never normalized: a basket
/// that does not sum to one is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPortfolio")]
pub struct Portfolio {
    name: String,
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Creates a new portfolio builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> super::PortfolioBuilder {
        super::PortfolioBuilder::new().name(name)
    }

    /// Validates and creates a portfolio.
    ///
    /// # Errors
    ///
    /// - `EmptyPortfolio` if there are no holdings
    /// - `InvalidHolding` for a blank or duplicate ticker or a non-finite weight
    /// - `WeightValidation` if the weights do not sum to one
    pub fn new(name: impl Into<String>, holdings: Vec<Holding>) -> PortfolioResult<Self> {
        if holdings.is_empty() {
            return Err(PortfolioError::EmptyPortfolio);
        }

        let mut seen = HashSet::with_capacity(holdings.len());
        for holding in &holdings {
            // Fields are public, so re-check what Holding::new enforces.
            if holding.ticker.trim().is_empty() {
                return Err(PortfolioError::invalid_holding(&holding.ticker, "ticker is empty"));
            }
            if !holding.weight.is_finite() {
                return Err(PortfolioError::invalid_holding(
                    &holding.ticker,
                    format!("weight {} is not finite", holding.weight),
                ));
            }
            if !seen.insert(holding.ticker.as_str()) {
                return Err(PortfolioError::invalid_holding(
                    &holding.ticker,
                    "duplicate ticker",
                ));
            }
        }

        let sum: f64 = holdings.iter().map(|h| h.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PortfolioError::WeightValidation {
                sum,
                tolerance: WEIGHT_TOLERANCE,
            });
        }

        Ok(Self {
            name: name.into(),
            holdings,
        })
    }

    /// Portfolio name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Holdings in insertion order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Returns the number of holdings.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    /// Tickers in holding order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> + '_ {
        self.holdings.iter().map(|h| h.ticker.as_str())
    }

    /// Weights in holding order.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.holdings.iter().map(|h| h.weight).collect()
    }

    /// Weight of `ticker`, if held.
    #[must_use]
    pub fn weight_of(&self, ticker: &str) -> Option<f64> {
        self.holdings
            .iter()
            .find(|h| h.ticker == ticker)
            .map(|h| h.weight)
    }

    /// Sum of weights (one, within tolerance).
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }

    /// Returns true if any holding is short.
    #[must_use]
    pub fn has_short_positions(&self) -> bool {
        self.holdings.iter().any(Holding::is_short)
    }
}

#[derive(Deserialize)]
struct RawPortfolio {
    name: String,
    holdings: Vec<Holding>,
}

impl TryFrom<RawPortfolio> for Portfolio {
    type Error = PortfolioError;

    fn try_from(raw: RawPortfolio) -> Result<Self, Self::Error> {
        Portfolio::new(raw.name, raw.holdings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(ticker: &str, weight: f64) -> Holding {
        Holding::new(ticker, weight).unwrap()
    }

    #[test]
    fn test_new() {
        let p = Portfolio::new(
            "Tech",
            vec![holding("AAPL", 0.5), holding("MSFT", 0.3), holding("NVDA", 0.2)],
        )
        .unwrap();

        assert_eq!(p.name(), "Tech");
        assert_eq!(p.holding_count(), 3);
        assert_eq!(p.tickers().collect::<Vec<_>>(), vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(p.weight_of("MSFT"), Some(0.3));
        assert_eq!(p.weight_of("IBM"), None);
        assert!((p.weight_sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
    }

    #[test]
    fn test_weight_sum_validation() {
        for weights in [[0.35, 0.35], [0.65, 0.65]] {
            let result = Portfolio::new(
                "Bad",
                vec![holding("A", weights[0]), holding("B", weights[1])],
            );
            match result {
                Err(PortfolioError::WeightValidation { sum, tolerance }) => {
                    assert!((sum - weights[0] - weights[1]).abs() < 1e-12);
                    assert_eq!(tolerance, WEIGHT_TOLERANCE);
                }
                other => panic!("expected WeightValidation, got {other:?}"),
            }
        }

        // Within tolerance is accepted, not normalized
        let p = Portfolio::new("Ok", vec![holding("A", 0.5), holding("B", 0.500_000_5)]).unwrap();
        assert_eq!(p.weights(), vec![0.5, 0.500_000_5]);
    }

    #[test]
    fn test_short_positions_allowed() {
        let p = Portfolio::new("LongShort", vec![holding("A", 1.3), holding("B", -0.3)]).unwrap();
        assert!(p.has_short_positions());
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert!(matches!(
            Portfolio::new("Dup", vec![holding("A", 0.5), holding("A", 0.5)]),
            Err(PortfolioError::InvalidHolding { .. })
        ));
        assert!(matches!(
            Portfolio::new("Empty", vec![]),
            Err(PortfolioError::EmptyPortfolio)
        ));

        let raw = Holding {
            ticker: "X".to_string(),
            weight: f64::NAN,
        };
        assert!(Portfolio::new("Nan", vec![raw]).is_err());
    }

    #[test]
    fn test_serde_revalidates() {
        let p = Portfolio::new("Pair", vec![holding("A", 0.6), holding("B", 0.4)]).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Portfolio = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);

        let bad = r#"{"name":"Bad","holdings":[{"ticker":"A","weight":0.7}]}"#;
        assert!(serde_json::from_str::<Portfolio>(bad).is_err());
    }
}
