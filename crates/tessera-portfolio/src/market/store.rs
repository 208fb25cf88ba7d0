//! Aligned price history for every series an evaluation needs.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tessera_core::{Date, DateRange, Periodicity, TimeSeries};
use tracing::{debug, warn};

use super::RiskFreeRateSeries;
use crate::error::{PortfolioError, PortfolioResult};

/// Share of a series' history that, once dropped by alignment, is worth a warning.
const LARGE_DROP_FRACTION: f64 = 0.25;

const STORE_NAME: &str = "price store";

/// Price series keyed by identifier, all on one common date index.
///
/// Holds holding prices, the benchmark and optionally a risk-free rate
/// series. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeriesStore {
    dates: Vec<Date>,
    series: BTreeMap<String, TimeSeries>,
}

impl PriceSeriesStore {
    /// Builds a store from series that already share one date index.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` if no series is given, an identifier repeats, a series
    /// is empty, or any series is not aligned with the first.
    pub fn from_aligned<I, K>(series: I) -> PortfolioResult<Self>
    where
        I: IntoIterator<Item = (K, TimeSeries)>,
        K: Into<String>,
    {
        let map = collect_unique(series)?;
        let Some((first_id, reference)) = map.iter().next() else {
            return Err(PortfolioError::data_integrity(STORE_NAME, "no series supplied"));
        };
        if reference.is_empty() {
            return Err(PortfolioError::data_integrity(first_id.as_str(), "series is empty"));
        }

        for (id, s) in &map {
            s.ensure_aligned(reference)
                .map_err(|e| PortfolioError::from_core(id.as_str(), &e))?;
        }

        debug!(
            series = map.len(),
            dates = reference.len(),
            "built price store from aligned series"
        );
        Ok(Self {
            dates: reference.dates().to_vec(),
            series: map,
        })
    }

    /// Builds a store by keeping only the dates every series has.
    ///
    /// A series with a shorter history truncates the whole store to the
    /// common window. Missing observations are never filled.
    ///
    /// # Errors
    ///
    /// `DataIntegrity` if no series is given, an identifier repeats, or the
    /// series share no date.
    pub fn inner_join<I, K>(series: I) -> PortfolioResult<Self>
    where
        I: IntoIterator<Item = (K, TimeSeries)>,
        K: Into<String>,
    {
        let map = collect_unique(series)?;
        if map.is_empty() {
            return Err(PortfolioError::data_integrity(STORE_NAME, "no series supplied"));
        }

        let mut common: Option<BTreeSet<Date>> = None;
        for s in map.values() {
            let dates: BTreeSet<Date> = s.dates().iter().copied().collect();
            common = Some(match common {
                None => dates,
                Some(acc) => acc.intersection(&dates).copied().collect(),
            });
        }
        let common: Vec<Date> = common.unwrap_or_default().into_iter().collect();
        if common.is_empty() {
            return Err(PortfolioError::data_integrity(
                STORE_NAME,
                format!("{} series share no common date", map.len()),
            ));
        }

        let mut aligned = BTreeMap::new();
        for (id, s) in map {
            let dropped = s.len() - common.len();
            if dropped > 0 {
                let fraction = dropped as f64 / s.len() as f64;
                if fraction > LARGE_DROP_FRACTION {
                    warn!(
                        series = %id,
                        dropped,
                        available = s.len(),
                        "alignment dropped a large share of the series"
                    );
                } else {
                    debug!(series = %id, dropped, "alignment dropped dates");
                }
            }
            let selected = s
                .select(&common)
                .map_err(|e| PortfolioError::from_core(id.as_str(), &e))?;
            aligned.insert(id, selected);
        }

        debug!(
            series = aligned.len(),
            dates = common.len(),
            "built price store by inner join"
        );
        Ok(Self {
            dates: common,
            series: aligned,
        })
    }

    /// Common date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates in the common index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the store holds no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First and last common date.
    #[must_use]
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.dates.first(), self.dates.last()) {
            (Some(start), Some(end)) => Some(DateRange::new(*start, *end)),
            _ => None,
        }
    }

    /// Identifiers in sorted order.
    pub fn tickers(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    /// Returns true if `ticker` is held.
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.series.contains_key(ticker)
    }

    /// Series for `ticker`.
    ///
    /// # Errors
    ///
    /// `MissingSeries` if the identifier is unknown.
    pub fn get(&self, ticker: &str) -> PortfolioResult<&TimeSeries> {
        self.series
            .get(ticker)
            .ok_or_else(|| PortfolioError::MissingSeries {
                ticker: ticker.to_string(),
            })
    }

    /// Interprets the series `id` as annual decimal risk-free rates.
    ///
    /// # Errors
    ///
    /// `MissingSeries` if absent, `DataIntegrity` if a rate is unusable.
    pub fn risk_free(&self, id: &str) -> PortfolioResult<RiskFreeRateSeries> {
        RiskFreeRateSeries::new(self.get(id)?.clone())
    }

    /// Down-samples every series to `periodicity`, keeping the last
    /// observation of each period.
    ///
    /// Series share one index, so the result is aligned as well.
    #[must_use]
    pub fn resample(&self, periodicity: Periodicity) -> Self {
        if periodicity == Periodicity::Daily {
            return self.clone();
        }
        let series: BTreeMap<String, TimeSeries> = self
            .series
            .iter()
            .map(|(id, s)| (id.clone(), s.resample_last(periodicity)))
            .collect();
        let dates = series
            .values()
            .next()
            .map(|s| s.dates().to_vec())
            .unwrap_or_default();
        debug!(
            %periodicity,
            from = self.dates.len(),
            to = dates.len(),
            "resampled price store"
        );
        Self { dates, series }
    }
}

fn collect_unique<I, K>(series: I) -> PortfolioResult<BTreeMap<String, TimeSeries>>
where
    I: IntoIterator<Item = (K, TimeSeries)>,
    K: Into<String>,
{
    let mut map = BTreeMap::new();
    for (id, s) in series {
        let id: String = id.into();
        if map.contains_key(&id) {
            return Err(PortfolioError::data_integrity(id, "duplicate series identifier"));
        }
        map.insert(id, s);
    }
    Ok(map)
}
