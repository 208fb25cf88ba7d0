//! Orchestration of a full evaluation.

use std::collections::BTreeMap;

use tessera_core::{DateRange, TimeSeries};
use tracing::{debug, info, warn};

use super::result::{AnalysisResult, HoldingBreakdown, TrailingWindowResult, UndefinedStatistic};
use crate::analytics::{
    compounded_return, correlation_matrix, covariance_alpha_beta, cross_check_betas,
    maybe_parallel_map, portfolio_returns, price_returns, regression_alpha_beta,
    returns_by_ticker, risk_metrics, CovarianceEstimate, RegressionEstimate, RiskMetrics,
};
use crate::error::{PortfolioError, PortfolioResult};
use crate::market::{PriceSeriesStore, RiskFreeRateSeries};
use crate::portfolio::Portfolio;
use crate::types::{AnalysisConfig, Holding};

/// Evaluates `portfolio` against `benchmark` over the store's history.
///
/// Prices are resampled to `config.periodicity`, turned into returns under
/// `config.return_convention`, and analyzed over the full range, the trailing
/// window and each holding on its own. Statistics without enough data are
/// reported undefined in the result instead of failing the evaluation.
///
/// # Errors
///
/// - `InvalidConfig` if `config` fails validation
/// - `MissingSeries` if a holding or the benchmark is not in the store
/// - `DataIntegrity` for non-positive prices, misaligned series or risk-free
///   rates missing on a return date
/// - `InsufficientData` if fewer than two aligned prices remain
///
/// # Example
///
/// ```rust
/// use tessera_core::{Date, TimeSeries};
/// use tessera_portfolio::prelude::*;
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let dates: Vec<Date> = (0..40).map(|i| start.add_days(i)).collect();
/// let bench: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
/// let spy = TimeSeries::new(dates.clone(), bench.clone()).unwrap();
///
/// let store = PriceSeriesStore::from_aligned(vec![("FUND", spy.clone()), ("SPY", spy)]).unwrap();
/// let portfolio = Portfolio::builder("Tracker").add("FUND", 1.0).build().unwrap();
/// let rf = RiskFreeRateSeries::zero(&dates).unwrap();
///
/// let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();
/// assert_eq!(result.beta_covariance(), Some(1.0));
/// ```
pub fn evaluate(
    portfolio: &Portfolio,
    store: &PriceSeriesStore,
    risk_free: &RiskFreeRateSeries,
    benchmark: &str,
    config: &AnalysisConfig,
) -> PortfolioResult<AnalysisResult> {
    config.validate()?;
    store.get(benchmark)?;
    for ticker in portfolio.tickers() {
        store.get(ticker)?;
    }

    let store = store.resample(config.periodicity);
    debug!(
        portfolio = portfolio.name(),
        benchmark,
        holdings = portfolio.holding_count(),
        dates = store.len(),
        periodicity = %config.periodicity,
        "starting evaluation"
    );

    let convention = config.return_convention;
    let holding_returns = returns_by_ticker(&store, portfolio.tickers(), convention)?;
    let benchmark_returns = price_returns(benchmark, store.get(benchmark)?, convention)?;
    let returns = portfolio_returns(portfolio, &holding_returns)?;
    returns
        .ensure_aligned(&benchmark_returns)
        .map_err(|e| PortfolioError::from_core(benchmark, &e))?;
    let Some(date_range) = returns.date_range() else {
        return Err(PortfolioError::insufficient_data(
            "returns",
            portfolio.name(),
            1,
            0,
        ));
    };
    debug!(observations = returns.len(), "built return series");

    let mut undefined = Vec::new();
    let scope = portfolio.name();

    let metrics = recover(
        risk_metrics(scope, &returns, risk_free, config.annualization_factor),
        &mut undefined,
    )?;
    if let Some(m) = &metrics {
        note_degenerate_metrics(scope, m, Some(date_range), &mut undefined);
    }
    let benchmark_metrics = recover(
        risk_metrics(benchmark, &benchmark_returns, risk_free, config.annualization_factor),
        &mut undefined,
    )?;
    if let Some(m) = &benchmark_metrics {
        note_degenerate_metrics(benchmark, m, Some(date_range), &mut undefined);
    }

    let (covariance, regression) = alpha_beta(
        scope,
        &returns,
        &benchmark_returns,
        risk_free,
        config,
        &mut undefined,
    )?;
    let beta_check = match (&covariance, &regression) {
        (Some(c), Some(r)) => Some(cross_check_betas(
            scope,
            c,
            r,
            config.beta_agreement_tolerance,
        )),
        _ => None,
    };
    debug!("computed full-range statistics");

    let mut labelled: Vec<(String, TimeSeries)> = portfolio
        .tickers()
        .filter_map(|t| holding_returns.get(t).map(|r| (t.to_string(), r.clone())))
        .collect();
    if !labelled.iter().any(|(label, _)| label == benchmark) {
        labelled.push((benchmark.to_string(), benchmark_returns.clone()));
    }
    let correlation = correlation_matrix(&labelled);

    let holdings = holding_breakdowns(
        portfolio.holdings(),
        &holding_returns,
        &benchmark_returns,
        risk_free,
        config,
        &mut undefined,
    )?;
    debug!(holdings = holdings.len(), "computed per-holding breakdown");

    let trailing = trailing_window(
        scope,
        benchmark,
        &returns,
        &benchmark_returns,
        risk_free,
        config,
        &mut undefined,
    )?;

    for u in &undefined {
        warn!(
            statistic = %u.statistic,
            scope = %u.scope,
            reason = %u.reason,
            "statistic undefined"
        );
    }

    let result = AnalysisResult {
        portfolio: portfolio.name().to_string(),
        benchmark: benchmark.to_string(),
        config: config.clone(),
        date_range,
        observations: returns.len(),
        period_return: compounded_return(&returns, convention),
        benchmark_period_return: compounded_return(&benchmark_returns, convention),
        metrics,
        benchmark_metrics,
        covariance,
        regression,
        beta_check,
        correlation,
        holdings,
        trailing,
        undefined,
    };

    info!(
        portfolio = %result.portfolio,
        benchmark = %result.benchmark,
        observations = result.observations,
        annualized_return = ?result.annualized_return(),
        sharpe = ?result.sharpe_ratio(),
        beta = ?result.beta_regression(),
        undefined = result.undefined.len(),
        "evaluation complete"
    );
    Ok(result)
}

/// Turns `InsufficientData` into an undefined statistic, passes anything else on.
fn recover<T>(
    result: PortfolioResult<T>,
    undefined: &mut Vec<UndefinedStatistic>,
) -> PortfolioResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match UndefinedStatistic::from_error(&err) {
            Some(u) => {
                undefined.push(u);
                Ok(None)
            }
            None => Err(err),
        },
    }
}

fn note_degenerate_metrics(
    scope: &str,
    metrics: &RiskMetrics,
    range: Option<DateRange>,
    undefined: &mut Vec<UndefinedStatistic>,
) {
    if metrics.sharpe_ratio.is_none() {
        undefined.push(UndefinedStatistic::new(
            "sharpe ratio",
            scope,
            range,
            "zero volatility",
        ));
    }
}

fn alpha_beta(
    scope: &str,
    returns: &TimeSeries,
    benchmark: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    config: &AnalysisConfig,
    undefined: &mut Vec<UndefinedStatistic>,
) -> PortfolioResult<(Option<CovarianceEstimate>, Option<RegressionEstimate>)> {
    let covariance = recover(
        covariance_alpha_beta(scope, returns, benchmark, risk_free, config),
        undefined,
    )?;
    let regression = recover(
        regression_alpha_beta(scope, returns, benchmark, risk_free, config),
        undefined,
    )?;

    // Computed but degenerate: the benchmark never moved.
    let range = returns.date_range();
    if matches!(covariance, Some(None)) {
        undefined.push(UndefinedStatistic::new(
            "covariance alpha/beta",
            scope,
            range,
            "zero benchmark variance",
        ));
    }
    if matches!(regression, Some(None)) {
        undefined.push(UndefinedStatistic::new(
            "regression alpha/beta",
            scope,
            range,
            "zero benchmark excess-return variance",
        ));
    }

    Ok((covariance.flatten(), regression.flatten()))
}

fn holding_breakdowns(
    holdings: &[Holding],
    holding_returns: &BTreeMap<String, TimeSeries>,
    benchmark: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    config: &AnalysisConfig,
    undefined: &mut Vec<UndefinedStatistic>,
) -> PortfolioResult<Vec<HoldingBreakdown>> {
    let results = maybe_parallel_map(holdings, config, |holding| {
        let returns = holding_returns
            .get(&holding.ticker)
            .ok_or_else(|| PortfolioError::MissingSeries {
                ticker: holding.ticker.clone(),
            })?;
        analyze_holding(holding, returns, benchmark, risk_free, config)
    });

    let mut breakdowns = Vec::with_capacity(results.len());
    for result in results {
        let (breakdown, notes) = result?;
        undefined.extend(notes);
        breakdowns.push(breakdown);
    }
    Ok(breakdowns)
}

fn analyze_holding(
    holding: &Holding,
    returns: &TimeSeries,
    benchmark: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    config: &AnalysisConfig,
) -> PortfolioResult<(HoldingBreakdown, Vec<UndefinedStatistic>)> {
    let scope = holding.ticker.as_str();
    let mut undefined = Vec::new();

    let metrics = recover(
        risk_metrics(scope, returns, risk_free, config.annualization_factor),
        &mut undefined,
    )?;
    if let Some(m) = &metrics {
        note_degenerate_metrics(scope, m, returns.date_range(), &mut undefined);
    }
    let (covariance, regression) =
        alpha_beta(scope, returns, benchmark, risk_free, config, &mut undefined)?;

    let contribution = metrics
        .as_ref()
        .map(|m| m.annualized_return * holding.weight);

    Ok((
        HoldingBreakdown {
            ticker: holding.ticker.clone(),
            weight: holding.weight,
            period_return: compounded_return(returns, config.return_convention),
            metrics,
            covariance,
            regression,
            contribution,
        },
        undefined,
    ))
}

fn trailing_window(
    scope: &str,
    benchmark_id: &str,
    returns: &TimeSeries,
    benchmark: &TimeSeries,
    risk_free: &RiskFreeRateSeries,
    config: &AnalysisConfig,
    undefined: &mut Vec<UndefinedStatistic>,
) -> PortfolioResult<Option<TrailingWindowResult>> {
    let requested = config.trailing_window_length;
    let window = returns.tail(requested);
    let window_benchmark = benchmark.tail(requested);
    let Some(date_range) = window.date_range() else {
        return Ok(None);
    };
    if window.len() < requested {
        debug!(
            requested,
            available = window.len(),
            "trailing window covers the whole history"
        );
    }

    let window_scope = format!("{scope} (trailing {})", window.len());
    let window_benchmark_scope = format!("{benchmark_id} (trailing {})", window.len());
    let factor = config.annualization_factor;

    let metrics = recover(
        risk_metrics(&window_scope, &window, risk_free, factor),
        undefined,
    )?;
    if let Some(m) = &metrics {
        note_degenerate_metrics(&window_scope, m, Some(date_range), undefined);
    }
    let benchmark_metrics = recover(
        risk_metrics(&window_benchmark_scope, &window_benchmark, risk_free, factor),
        undefined,
    )?;
    if let Some(m) = &benchmark_metrics {
        note_degenerate_metrics(&window_benchmark_scope, m, Some(date_range), undefined);
    }
    let (covariance, regression) = alpha_beta(
        &window_scope,
        &window,
        &window_benchmark,
        risk_free,
        config,
        undefined,
    )?;

    let portfolio_return = compounded_return(&window, config.return_convention);
    let benchmark_return = compounded_return(&window_benchmark, config.return_convention);

    Ok(Some(TrailingWindowResult {
        requested_periods: requested,
        periods: window.len(),
        date_range,
        portfolio_return,
        benchmark_return,
        excess_return: portfolio_return - benchmark_return,
        metrics,
        benchmark_metrics,
        covariance,
        regression,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tessera_core::Date;

    fn dates(n: usize) -> Vec<Date> {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        (0..n).map(|i| start.add_days(i as i64)).collect()
    }

    fn path(n: usize, drift: f64, freq: f64, amp: f64) -> Vec<f64> {
        let mut price = 100.0;
        (0..n)
            .map(|i| {
                if i > 0 {
                    price *= 1.0 + drift + (i as f64 * freq).sin() * amp;
                }
                price
            })
            .collect()
    }

    fn store(n: usize) -> PriceSeriesStore {
        let d = dates(n);
        PriceSeriesStore::from_aligned(vec![
            ("A", TimeSeries::new(d.clone(), path(n, 0.0005, 1.3, 0.012)).unwrap()),
            ("B", TimeSeries::new(d.clone(), path(n, 0.0002, 0.7, 0.008)).unwrap()),
            ("SPY", TimeSeries::new(d, path(n, 0.0003, 1.1, 0.01)).unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn test_evaluate_populates_result() {
        let store = store(120);
        let portfolio = Portfolio::builder("AB").add("A", 0.6).add("B", 0.4).build().unwrap();
        let rf = RiskFreeRateSeries::constant(store.dates(), 0.03).unwrap();
        let config = AnalysisConfig::default();

        let result = evaluate(&portfolio, &store, &rf, "SPY", &config).unwrap();

        assert_eq!(result.observations, 119);
        assert!(result.metrics.is_some());
        assert!(result.benchmark_metrics.is_some());
        assert!(result.covariance.is_some());
        assert!(result.regression.is_some());
        assert!(result.beta_check.is_some());
        assert_eq!(result.correlation.labels, vec!["A", "B", "SPY"]);
        assert_eq!(result.holdings.len(), 2);
        assert!(result.undefined.is_empty());

        let trailing = result.trailing.as_ref().unwrap();
        assert_eq!(trailing.periods, 30);
        assert_relative_eq!(
            trailing.excess_return,
            trailing.portfolio_return - trailing.benchmark_return
        );

        let rec = result.reconciliation().unwrap();
        assert!(rec.difference.abs() < 1e-12);
    }

    #[test]
    fn test_short_history_reports_undefined() {
        let store = store(10);
        let portfolio = Portfolio::builder("AB").add("A", 0.5).add("B", 0.5).build().unwrap();
        let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();

        let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

        assert!(result.metrics.is_some());
        assert!(result.covariance.is_none());
        assert!(result.regression.is_none());
        assert!(result.is_undefined("regression alpha/beta", "AB"));
        assert!(result.is_undefined("covariance alpha/beta", "A"));
        let trailing = result.trailing.unwrap();
        assert_eq!(trailing.periods, 9);
        assert_eq!(trailing.requested_periods, 30);
    }

    #[test]
    fn test_flat_trailing_benchmark_reports_undefined_sharpe() {
        let n = 100;
        let d = dates(n);
        let mut spy = path(n, 0.0003, 1.1, 0.01);
        let level = spy[n - 31];
        for price in &mut spy[n - 31..] {
            *price = level;
        }
        let store = PriceSeriesStore::from_aligned(vec![
            ("A", TimeSeries::new(d.clone(), path(n, 0.0005, 1.3, 0.012)).unwrap()),
            ("SPY", TimeSeries::new(d, spy).unwrap()),
        ])
        .unwrap();
        let portfolio = Portfolio::builder("A").add("A", 1.0).build().unwrap();
        let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();

        let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

        let trailing = result.trailing.as_ref().unwrap();
        assert_eq!(trailing.benchmark_volatility(), Some(0.0));
        assert!(trailing.benchmark_metrics.as_ref().unwrap().sharpe_ratio.is_none());
        assert!(result.is_undefined("sharpe ratio", "SPY (trailing 30)"));
        assert!(!result.is_undefined("sharpe ratio", "SPY"));
    }

    #[test]
    fn test_benchmark_held_in_portfolio_appears_once() {
        let store = store(60);
        let portfolio = Portfolio::builder("Core").add("A", 0.5).add("SPY", 0.5).build().unwrap();
        let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();

        let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

        assert_eq!(result.correlation.labels, vec!["A", "SPY"]);
        assert!(result.correlation.is_symmetric());
        assert_eq!(result.correlation.correlation("SPY", "SPY"), Some(1.0));
    }

    #[test]
    fn test_missing_benchmark() {
        let store = store(30);
        let portfolio = Portfolio::builder("A").add("A", 1.0).build().unwrap();
        let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
        assert!(matches!(
            evaluate(&portfolio, &store, &rf, "QQQ", &AnalysisConfig::default()),
            Err(PortfolioError::MissingSeries { .. })
        ));
    }

    #[test]
    fn test_invalid_config() {
        let store = store(30);
        let portfolio = Portfolio::builder("A").add("A", 1.0).build().unwrap();
        let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
        let config = AnalysisConfig::default().with_trailing_window(0);
        assert!(matches!(
            evaluate(&portfolio, &store, &rf, "SPY", &config),
            Err(PortfolioError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_single_price_is_fatal() {
        let store = store(1);
        let portfolio = Portfolio::builder("A").add("A", 1.0).build().unwrap();
        let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
        let err = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
