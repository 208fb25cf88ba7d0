//! Return construction from prices.
//!
//! ## Formulas
//!
//! ```text
//! simple:       r_t = (p_t - p_{t-1}) / p_{t-1}
//! logarithmic:  r_t = ln(p_t / p_{t-1})
//! portfolio:    R_t = Σ w_i × r_{i,t}
//! ```
//!
//! A price series of N points yields N − 1 returns dated `t = 2..N`.
//! Portfolio returns rebalance to the fixed weights every period.

use std::collections::BTreeMap;

use tessera_core::{DateRange, TimeSeries};

use crate::error::{PortfolioError, PortfolioResult};
use crate::market::PriceSeriesStore;
use crate::portfolio::Portfolio;
use crate::types::ReturnConvention;

/// Period-over-period returns of one price series.
///
/// # Errors
///
/// - `InsufficientData` for fewer than two prices
/// - `DataIntegrity` naming `ticker` and the date of the first zero or
///   negative price
pub fn price_returns(
    ticker: &str,
    prices: &TimeSeries,
    convention: ReturnConvention,
) -> PortfolioResult<TimeSeries> {
    if prices.len() < 2 {
        return Err(
            PortfolioError::insufficient_data("returns", ticker, 2, prices.len())
                .with_range(prices.date_range()),
        );
    }

    if let Some((date, price)) = prices.iter().find(|(_, p)| *p <= 0.0) {
        return Err(PortfolioError::DataIntegrity {
            series: ticker.to_string(),
            range: Some(DateRange::new(date, date)),
            reason: format!("non-positive price {price}"),
        });
    }

    let values = prices.values();
    let returns: Vec<f64> = values
        .windows(2)
        .map(|w| convention.period_return(w[0], w[1]))
        .collect();

    TimeSeries::new(prices.dates()[1..].to_vec(), returns)
        .map_err(|e| PortfolioError::from_core(ticker, &e))
}

/// Returns for each ticker, computed from the store's prices.
///
/// # Errors
///
/// `MissingSeries` for an unknown ticker, otherwise as [`price_returns`].
pub fn returns_by_ticker<'a, I>(
    store: &PriceSeriesStore,
    tickers: I,
    convention: ReturnConvention,
) -> PortfolioResult<BTreeMap<String, TimeSeries>>
where
    I: IntoIterator<Item = &'a str>,
{
    tickers
        .into_iter()
        .map(|t| Ok((t.to_string(), price_returns(t, store.get(t)?, convention)?)))
        .collect()
}

/// Fixed-weight portfolio returns: the weighted sum of holding returns on
/// every date.
///
/// Every holding's return series must share one date index.
///
/// # Errors
///
/// - `MissingSeries` if a holding has no return series
/// - `DataIntegrity` naming the first misaligned holding
pub fn portfolio_returns(
    portfolio: &Portfolio,
    returns: &BTreeMap<String, TimeSeries>,
) -> PortfolioResult<TimeSeries> {
    let components = portfolio
        .holdings()
        .iter()
        .map(|h| {
            returns
                .get(&h.ticker)
                .map(|r| (h.ticker.as_str(), h.weight, r))
                .ok_or_else(|| PortfolioError::MissingSeries {
                    ticker: h.ticker.clone(),
                })
        })
        .collect::<PortfolioResult<Vec<_>>>()?;

    let Some(((first_ticker, first_weight, first), rest)) = components.split_first() else {
        return Err(PortfolioError::EmptyPortfolio);
    };

    let mut total = first
        .map_values(|r| first_weight * r)
        .map_err(|e| PortfolioError::from_core(*first_ticker, &e))?;
    for (ticker, weight, series) in rest {
        total = total
            .zip_with(series, |acc, r| acc + weight * r)
            .map_err(|e| PortfolioError::from_core(*ticker, &e))?;
    }
    Ok(total)
}

/// Compounded return over the whole series.
#[must_use]
pub fn compounded_return(returns: &TimeSeries, convention: ReturnConvention) -> f64 {
    convention.compound(returns.values())
}
