//! Risk-free rate series and periodic conversion.

use serde::{Deserialize, Serialize};
use tessera_core::{Date, DateRange, TimeSeries};

use crate::error::{PortfolioError, PortfolioResult};

const SERIES_NAME: &str = "risk-free";

/// Annualized risk-free rates as decimals (0.05 for 5%).
///
/// Rates are stored annualized and converted geometrically to the return
/// periodicity on use: `(1 + r)^(1 / factor) - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeSeries", into = "TimeSeries")]
pub struct RiskFreeRateSeries(TimeSeries);

impl TryFrom<TimeSeries> for RiskFreeRateSeries {
    type Error = PortfolioError;

    fn try_from(rates: TimeSeries) -> Result<Self, Self::Error> {
        Self::new(rates)
    }
}

impl From<RiskFreeRateSeries> for TimeSeries {
    fn from(rf: RiskFreeRateSeries) -> Self {
        rf.0
    }
}

impl RiskFreeRateSeries {
    /// Wraps a series of decimal annual rates.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` if any rate is at or below -100%.
    pub fn new(rates: TimeSeries) -> PortfolioResult<Self> {
        if let Some((date, rate)) = rates.iter().find(|(_, r)| *r <= -1.0) {
            return Err(PortfolioError::DataIntegrity {
                series: SERIES_NAME.to_string(),
                range: Some(DateRange::new(date, date)),
                reason: format!("annual rate {rate} is at or below -100%"),
            });
        }
        Ok(Self(rates))
    }

    /// Wraps a series quoted in percent (5.0 for 5%), as T-bill yields are.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_percent(quotes: &TimeSeries) -> PortfolioResult<Self> {
        let rates = quotes
            .map_values(|q| q / 100.0)
            .map_err(|e| PortfolioError::from_core(SERIES_NAME, &e))?;
        Self::new(rates)
    }

    /// A flat annual rate on every date.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` if the dates are not strictly increasing or the rate is
    /// not usable.
    pub fn constant(dates: &[Date], rate: f64) -> PortfolioResult<Self> {
        let series =
            TimeSeries::constant(dates, rate).map_err(|e| PortfolioError::from_core(SERIES_NAME, &e))?;
        Self::new(series)
    }

    /// A zero rate on every date.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` if the dates are not strictly increasing.
    pub fn zero(dates: &[Date]) -> PortfolioResult<Self> {
        Self::constant(dates, 0.0)
    }

    /// The annual rates.
    #[must_use]
    pub fn rates(&self) -> &TimeSeries {
        &self.0
    }

    /// Per-period rates on exactly `dates`.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` naming the first date the series does not cover.
    pub fn periodic_over(&self, dates: &[Date], factor: f64) -> PortfolioResult<Vec<f64>> {
        dates
            .iter()
            .map(|d| {
                self.0
                    .get(*d)
                    .map(|r| to_periodic(r, factor))
                    .ok_or_else(|| PortfolioError::DataIntegrity {
                        series: SERIES_NAME.to_string(),
                        range: Some(DateRange::new(*d, *d)),
                        reason: "no rate for return date".to_string(),
                    })
            })
            .collect()
    }

    /// Annualized rate over `dates`: mean periodic rate times `factor`.
    ///
    /// An empty date set annualizes to zero.
    ///
    /// # Errors
    ///
    /// Same as [`periodic_over`](Self::periodic_over).
    pub fn annualized_over(&self, dates: &[Date], factor: f64) -> PortfolioResult<f64> {
        if dates.is_empty() {
            return Ok(0.0);
        }
        let periodic = self.periodic_over(dates, factor)?;
        Ok(periodic.iter().sum::<f64>() / periodic.len() as f64 * factor)
    }
}

/// Geometric de-annualization of one rate.
#[must_use]
pub fn to_periodic(annual_rate: f64, factor: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / factor) - 1.0
}
