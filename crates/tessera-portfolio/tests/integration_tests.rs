//! Integration tests for tessera-portfolio.
//!
//! These tests run full evaluations over synthetic but realistic price
//! histories.

use approx::assert_relative_eq;
use tessera_core::{Date, Periodicity, TimeSeries};
use tessera_portfolio::prelude::*;
use tessera_portfolio::WEIGHT_TOLERANCE;

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tessera_portfolio=debug")
        .with_test_writer()
        .try_init();
}

/// `n` consecutive weekdays starting on the first weekday on or after 2022-01-03.
fn trading_days(n: usize) -> Vec<Date> {
    let mut date = Date::from_ymd(2022, 1, 3).unwrap();
    let mut dates = Vec::with_capacity(n);
    while dates.len() < n {
        if !date.is_weekend() {
            dates.push(date);
        }
        date = date.add_days(1);
    }
    dates
}

/// Deterministic price path: drift plus two incommensurate cycles.
fn price_path(n: usize, start: f64, drift: f64, freq: f64, amp: f64) -> Vec<f64> {
    let mut price = start;
    (0..n)
        .map(|i| {
            if i > 0 {
                let t = i as f64;
                price *= 1.0 + drift + (t * freq).sin() * amp + (t * freq * 0.37).cos() * amp * 0.4;
            }
            price
        })
        .collect()
}

fn series(dates: &[Date], values: Vec<f64>) -> TimeSeries {
    TimeSeries::new(dates.to_vec(), values).unwrap()
}

/// A store with three equities, a benchmark and a T-bill yield in percent.
fn market(n: usize) -> PriceSeriesStore {
    let dates = trading_days(n);
    PriceSeriesStore::from_aligned(vec![
        ("AAPL", series(&dates, price_path(n, 150.0, 0.0007, 1.31, 0.015))),
        ("MSFT", series(&dates, price_path(n, 300.0, 0.0005, 0.83, 0.012))),
        ("XOM", series(&dates, price_path(n, 80.0, 0.0002, 2.17, 0.018))),
        ("SPY", series(&dates, price_path(n, 450.0, 0.0004, 1.07, 0.009))),
        ("^IRX", series(&dates, vec![4.5; n])),
    ])
    .unwrap()
}

fn tech_portfolio() -> Portfolio {
    Portfolio::builder("Tech Tilt")
        .add("AAPL", 0.5)
        .add("MSFT", 0.3)
        .add("XOM", 0.2)
        .build()
        .unwrap()
}

// =============================================================================
// PORTFOLIO CONSTRUCTION
// =============================================================================

#[test]
fn test_weights_must_sum_to_one() {
    for total in [0.7, 1.3] {
        let result = Portfolio::builder("Bad")
            .add("AAPL", total / 2.0)
            .add("MSFT", total / 2.0)
            .build();
        match result {
            Err(PortfolioError::WeightValidation { sum, .. }) => {
                assert_relative_eq!(sum, total, epsilon = 1e-12);
            }
            other => panic!("expected WeightValidation for {total}, got {other:?}"),
        }
    }

    let ok = Portfolio::builder("Ok").add("AAPL", 0.5).add("MSFT", 0.5).build().unwrap();
    assert!((ok.weight_sum() - 1.0).abs() <= WEIGHT_TOLERANCE);
}

// =============================================================================
// END-TO-END EVALUATION
// =============================================================================

#[test]
fn test_full_evaluation() {
    init_tracing();
    let store = market(260);
    let rf = RiskFreeRateSeries::from_percent(store.get("^IRX").unwrap()).unwrap();
    let config = AnalysisConfig::default();

    let result = evaluate(&tech_portfolio(), &store, &rf, "SPY", &config).unwrap();

    assert_eq!(result.observations, 259);
    assert_eq!(result.portfolio, "Tech Tilt");
    assert_eq!(result.benchmark, "SPY");
    assert!(result.undefined.is_empty(), "{:?}", result.undefined);

    let metrics = result.metrics.as_ref().unwrap();
    assert!(metrics.annualized_volatility > 0.0);
    assert!(metrics.sharpe_ratio.is_some());
    let annual_rf = rf.annualized_over(store.dates().get(1..).unwrap(), 252.0).unwrap();
    assert_relative_eq!(metrics.annualized_risk_free, annual_rf, epsilon = 1e-12);

    assert!(result.alpha_covariance().is_some());
    assert!(result.alpha_regression().is_some());
    assert!(result.r_squared().is_some());
    assert!(result.beta_p_value().is_some());
    assert!(result.beta_check.is_some());

    // Correlation matrix: holdings in portfolio order, benchmark last
    let corr = &result.correlation;
    assert_eq!(corr.labels, vec!["AAPL", "MSFT", "XOM", "SPY"]);
    assert!(corr.is_symmetric());
    for label in &corr.labels {
        assert_eq!(corr.correlation(label, label), Some(1.0));
    }

    // Breakdown per holding
    assert_eq!(result.holdings.len(), 3);
    let aapl = result.holding("AAPL").unwrap();
    assert_eq!(aapl.weight, 0.5);
    assert!(aapl.beta().is_some());
    assert_relative_eq!(
        aapl.contribution.unwrap(),
        aapl.annualized_return().unwrap() * 0.5,
        epsilon = 1e-15
    );

    // Trailing window
    let trailing = result.trailing.as_ref().unwrap();
    assert_eq!(trailing.periods, 30);
    assert_eq!(trailing.requested_periods, 30);
    assert_eq!(trailing.date_range.end, *store.dates().last().unwrap());
    assert!(trailing.benchmark_volatility().is_some());
    assert!(trailing.regression.is_some());
}

#[test]
fn test_contributions_reconcile() {
    let store = market(200);
    let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
    let result = evaluate(&tech_portfolio(), &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

    let rec = result.reconciliation().unwrap();
    assert_relative_eq!(rec.contribution_total, rec.portfolio_return, epsilon = 1e-12);
    assert!(rec.difference.abs() < 1e-12);
}

// =============================================================================
// SCENARIOS
// =============================================================================

/// Two holdings, each identical to the benchmark, 50/50.
#[test]
fn test_scenario_tracker_portfolio() {
    let n = 120;
    let dates = trading_days(n);
    let spy = series(&dates, price_path(n, 450.0, 0.0004, 1.07, 0.009));
    let store = PriceSeriesStore::from_aligned(vec![
        ("IVV", spy.clone()),
        ("VOO", spy.clone()),
        ("SPY", spy),
    ])
    .unwrap();
    let portfolio = Portfolio::builder("Tracker").add("IVV", 0.5).add("VOO", 0.5).build().unwrap();

    for rf in [
        RiskFreeRateSeries::zero(&dates).unwrap(),
        RiskFreeRateSeries::constant(&dates, 0.045).unwrap(),
    ] {
        let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

        assert_eq!(result.beta_covariance(), Some(1.0));
        assert_eq!(result.beta_regression(), Some(1.0));
        assert_relative_eq!(result.alpha_covariance().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.alpha_regression().unwrap(), 0.0, epsilon = 1e-12);
        assert!(!result.alpha_is_significant());
        assert_relative_eq!(
            result.correlation.correlation("IVV", "SPY").unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert!(result.beta_check.as_ref().unwrap().agrees);

        // Perfect fit: inference undefined
        let regression = result.regression.as_ref().unwrap();
        assert!(regression.alpha_std_error.is_none());
        assert!(regression.alpha_p_value.is_none());
    }
}

/// Two holdings identical to the benchmark at uneven weights.
#[test]
fn test_scenario_uneven_tracker_has_no_alpha() {
    let n = 120;
    let dates = trading_days(n);
    let spy = series(&dates, price_path(n, 450.0, 0.0004, 1.07, 0.009));
    let store = PriceSeriesStore::from_aligned(vec![
        ("IVV", spy.clone()),
        ("VOO", spy.clone()),
        ("SPY", spy),
    ])
    .unwrap();

    for weight in [0.01, 0.03, 0.1, 0.27, 0.6, 0.83, 0.97] {
        let portfolio = Portfolio::builder("Tracker")
            .add("IVV", weight)
            .add("VOO", 1.0 - weight)
            .build()
            .unwrap();
        for rate in [0.0, 0.01, 0.03, 0.045] {
            let rf = RiskFreeRateSeries::constant(&dates, rate).unwrap();
            let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

            let regression = result.regression.as_ref().unwrap();
            assert_relative_eq!(regression.beta, 1.0, epsilon = 1e-12);
            assert_relative_eq!(regression.alpha, 0.0, epsilon = 1e-12);
            assert!(regression.alpha_p_value.is_none(), "weight {weight}, rate {rate}");
            assert!(regression.information_ratio.is_none());
            assert!(!result.alpha_is_significant(), "weight {weight}, rate {rate}");
        }
    }
}

/// A holding whose price never moves.
#[test]
fn test_scenario_constant_price_holding() {
    let n = 60;
    let dates = trading_days(n);
    let store = PriceSeriesStore::from_aligned(vec![
        ("CASH", series(&dates, vec![1.0; n])),
        ("SPY", series(&dates, price_path(n, 450.0, 0.0004, 1.07, 0.009))),
    ])
    .unwrap();
    let portfolio = Portfolio::builder("Cash").add("CASH", 1.0).build().unwrap();
    let rf = RiskFreeRateSeries::zero(&dates).unwrap();

    let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

    let cash = result.holding("CASH").unwrap();
    assert_eq!(cash.annualized_volatility(), Some(0.0));
    assert!(cash.metrics.as_ref().unwrap().sharpe_ratio.is_none());
    assert!(result.sharpe_ratio().is_none());
    assert!(result.is_undefined("sharpe ratio", "CASH"));
    assert!(result.is_undefined("sharpe ratio", "Cash"));

    // Correlation with a flat series is undefined, not zero
    assert_eq!(result.correlation.correlation("CASH", "SPY"), None);
    assert_eq!(result.correlation.correlation("CASH", "CASH"), Some(1.0));

    // Beta of a flat series against a moving benchmark is exactly zero
    assert_eq!(result.beta_covariance(), Some(0.0));
}

/// Fewer aligned observations than the regression minimum.
#[test]
fn test_scenario_short_history() {
    let n = 15;
    let store = market(n);
    let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
    let config = AnalysisConfig::default();

    let prices = store.get("AAPL").unwrap();
    let returns = price_returns("AAPL", prices, config.return_convention).unwrap();
    let benchmark = price_returns("SPY", store.get("SPY").unwrap(), config.return_convention).unwrap();

    // Risk metrics succeed
    let metrics = risk_metrics("AAPL", &returns, &rf, config.annualization_factor).unwrap();
    assert_eq!(metrics.observations, 14);

    // Both alpha/beta methods refuse
    let err = regression_alpha_beta("AAPL", &returns, &benchmark, &rf, &config).unwrap_err();
    match err {
        PortfolioError::InsufficientData {
            required, actual, ..
        } => {
            assert_eq!(required, 20);
            assert_eq!(actual, 14);
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
    assert!(covariance_alpha_beta("AAPL", &returns, &benchmark, &rf, &config)
        .unwrap_err()
        .is_insufficient_data());

    // Evaluation continues and reports the gap
    let result = evaluate(&tech_portfolio(), &store, &rf, "SPY", &config).unwrap();
    assert!(result.metrics.is_some());
    assert!(result.regression.is_none());
    assert!(result.is_undefined("regression alpha/beta", "Tech Tilt"));
    assert!(result.is_undefined("covariance alpha/beta", "MSFT"));
    let trailing = result.trailing.unwrap();
    assert_eq!(trailing.periods, 14);
}

// =============================================================================
// DATA HANDLING
// =============================================================================

#[test]
fn test_inner_join_uses_common_history() {
    let dates = trading_days(100);
    let late = &dates[40..];
    let store = PriceSeriesStore::inner_join(vec![
        ("AAPL", series(&dates, price_path(100, 150.0, 0.0007, 1.31, 0.015))),
        ("IPO", series(late, price_path(60, 20.0, 0.001, 0.9, 0.02))),
        ("SPY", series(&dates, price_path(100, 450.0, 0.0004, 1.07, 0.009))),
    ])
    .unwrap();
    assert_eq!(store.len(), 60);
    assert_eq!(store.dates()[0], dates[40]);

    let portfolio = Portfolio::builder("Mix").add("AAPL", 0.8).add("IPO", 0.2).build().unwrap();
    let rf = RiskFreeRateSeries::zero(&dates).unwrap();
    let result = evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();
    assert_eq!(result.observations, 59);
    assert_eq!(result.date_range.start, dates[41]);
}

#[test]
fn test_non_positive_price_is_fatal() {
    let n = 40;
    let dates = trading_days(n);
    let mut broken = price_path(n, 50.0, 0.0, 1.0, 0.01);
    broken[17] = 0.0;
    let store = PriceSeriesStore::from_aligned(vec![
        ("BRK", series(&dates, broken)),
        ("SPY", series(&dates, price_path(n, 450.0, 0.0004, 1.07, 0.009))),
    ])
    .unwrap();
    let portfolio = Portfolio::builder("Broken").add("BRK", 1.0).build().unwrap();
    let rf = RiskFreeRateSeries::zero(&dates).unwrap();

    match evaluate(&portfolio, &store, &rf, "SPY", &AnalysisConfig::default()) {
        Err(PortfolioError::DataIntegrity { series, range, .. }) => {
            assert_eq!(series, "BRK");
            assert_eq!(range.unwrap().start, dates[17]);
        }
        other => panic!("expected DataIntegrity, got {other:?}"),
    }
}

#[test]
fn test_risk_free_gap_is_fatal() {
    let store = market(60);
    let rf = RiskFreeRateSeries::zero(&store.dates()[..50]).unwrap();
    assert!(matches!(
        evaluate(&tech_portfolio(), &store, &rf, "SPY", &AnalysisConfig::default()),
        Err(PortfolioError::DataIntegrity { .. })
    ));
}

// =============================================================================
// CONFIGURATION VARIANTS
// =============================================================================

#[test]
fn test_monthly_evaluation() {
    // Three years of trading days
    let store = market(756);
    let rf = RiskFreeRateSeries::from_percent(store.get("^IRX").unwrap()).unwrap();
    let config = AnalysisConfig::monthly().with_trailing_window(12);

    let result = evaluate(&tech_portfolio(), &store, &rf, "SPY", &config).unwrap();

    let months = store.resample(Periodicity::Monthly).len();
    assert_eq!(result.observations, months - 1);
    assert!(result.observations >= 34);
    assert!(result.regression.is_some());
    assert_eq!(result.trailing.as_ref().unwrap().periods, 12);
    // The 12-month window is below the regression minimum
    assert!(result.trailing.as_ref().unwrap().regression.is_none());
}

#[test]
fn test_log_convention_period_returns() {
    let store = market(100);
    let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
    let simple = evaluate(&tech_portfolio(), &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();
    let log = evaluate(
        &tech_portfolio(),
        &store,
        &rf,
        "SPY",
        &AnalysisConfig::default().with_return_convention(ReturnConvention::Logarithmic),
    )
    .unwrap();

    // A single holding compounds to its price ratio under both conventions
    let prices = store.get("AAPL").unwrap().values();
    let ratio = prices[prices.len() - 1] / prices[0] - 1.0;
    assert_relative_eq!(simple.holding("AAPL").unwrap().period_return, ratio, epsilon = 1e-10);
    assert_relative_eq!(log.holding("AAPL").unwrap().period_return, ratio, epsilon = 1e-10);
    assert_relative_eq!(simple.benchmark_period_return, log.benchmark_period_return, epsilon = 1e-10);
}

#[test]
fn test_config_from_toml_drives_evaluation() {
    let config = AnalysisConfig::from_toml_str(
        r#"
        trailing_window_length = 60
        significance_threshold = 0.01
        parallel = false
        "#,
    )
    .unwrap();
    let store = market(150);
    let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();

    let result = evaluate(&tech_portfolio(), &store, &rf, "SPY", &config).unwrap();
    assert_eq!(result.trailing.unwrap().periods, 60);
    assert_eq!(result.config.significance_threshold, 0.01);
}

#[test]
fn test_parallel_breakdown_matches_sequential() {
    let store = market(120);
    let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
    let parallel = AnalysisConfig::default().with_threshold(1);
    let sequential = AnalysisConfig::sequential();

    let a = evaluate(&tech_portfolio(), &store, &rf, "SPY", &parallel).unwrap();
    let b = evaluate(&tech_portfolio(), &store, &rf, "SPY", &sequential).unwrap();
    assert_eq!(a.holdings, b.holdings);
}

#[test]
fn test_result_serializes() {
    let store = market(80);
    let rf = RiskFreeRateSeries::zero(store.dates()).unwrap();
    let result = evaluate(&tech_portfolio(), &store, &rf, "SPY", &AnalysisConfig::default()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["benchmark"], "SPY");
    assert_eq!(json["observations"], 79);
    assert_eq!(json["holdings"].as_array().unwrap().len(), 3);
    assert!(json["regression"]["beta"].is_number());
    assert_eq!(json["config"]["return_convention"], "simple");
}
