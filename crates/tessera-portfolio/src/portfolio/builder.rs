//! Portfolio builder for fluent construction.

use crate::error::PortfolioResult;
use crate::portfolio::Portfolio;
use crate::types::Holding;

/// Builder for constructing a [`Portfolio`].
///
/// Validation happens once, in [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use tessera_portfolio::PortfolioBuilder;
///
/// let portfolio = PortfolioBuilder::new()
///     .name("Balanced")
///     .add("SPY", 0.6)
///     .add("AGG", 0.4)
///     .build()
///     .unwrap();
/// assert_eq!(portfolio.holding_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortfolioBuilder {
    name: Option<String>,
    positions: Vec<(String, f64)>,
}

impl PortfolioBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the portfolio name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a position by ticker and weight.
    #[must_use]
    pub fn add(mut self, ticker: impl Into<String>, weight: f64) -> Self {
        self.positions.push((ticker.into(), weight));
        self
    }

    /// Adds a holding to the portfolio.
    #[must_use]
    pub fn add_holding(mut self, holding: Holding) -> Self {
        self.positions.push((holding.ticker, holding.weight));
        self
    }

    /// Adds multiple holdings to the portfolio.
    #[must_use]
    pub fn add_holdings(mut self, holdings: impl IntoIterator<Item = Holding>) -> Self {
        self.positions
            .extend(holdings.into_iter().map(|h| (h.ticker, h.weight)));
        self
    }

    /// Builds the portfolio.
    ///
    /// An unnamed portfolio is called `"portfolio"`.
    ///
    /// # Errors
    ///
    /// Any error from [`Holding::new`] or [`Portfolio::new`].
    pub fn build(self) -> PortfolioResult<Portfolio> {
        let holdings = self
            .positions
            .into_iter()
            .map(|(ticker, weight)| Holding::new(ticker, weight))
            .collect::<PortfolioResult<Vec<_>>>()?;
        let name = self.name.unwrap_or_else(|| "portfolio".to_string());
        Portfolio::new(name, holdings)
    }
}
