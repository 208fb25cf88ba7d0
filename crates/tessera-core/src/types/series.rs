//! Ordered `(date, value)` series.

use serde::{Deserialize, Serialize};

use super::{Date, DateRange, Periodicity};
use crate::error::{CoreError, CoreResult};

/// An ordered sequence of `(date, value)` observations.
///
/// Dates are strictly increasing (no duplicates) and every value is finite.
/// Both invariants are checked on construction, so any `TimeSeries` in hand
/// can be used as an index without re-validation.
///
/// Arithmetic between two series never reindexes implicitly: callers align
/// first and [`TimeSeries::zip_with`] fails on any mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries", into = "RawSeries")]
pub struct TimeSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a series from parallel date and value vectors.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` if the vectors differ in length
    /// - `NonMonotonicDates` if dates are not strictly increasing
    /// - `NonFiniteValue` if any value is NaN or infinite
    pub fn new(dates: Vec<Date>, values: Vec<f64>) -> CoreResult<Self> {
        if dates.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }

        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CoreError::NonMonotonicDates {
                    date: pair[1],
                    previous: pair[0],
                });
            }
        }

        if let Some((date, value)) = dates
            .iter()
            .zip(&values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(CoreError::NonFiniteValue {
                date: *date,
                value: *value,
            });
        }

        Ok(Self { dates, values })
    }

    /// Creates a series holding the same value on every date of `dates`.
    pub fn constant(dates: &[Date], value: f64) -> CoreResult<Self> {
        Self::new(dates.to_vec(), vec![value; dates.len()])
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The observed values, in date order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First observation, if any.
    #[must_use]
    pub fn first(&self) -> Option<(Date, f64)> {
        Some((*self.dates.first()?, *self.values.first()?))
    }

    /// Last observation, if any.
    #[must_use]
    pub fn last(&self) -> Option<(Date, f64)> {
        Some((*self.dates.last()?, *self.values.last()?))
    }

    /// Span from the first to the last date, or `None` when empty.
    #[must_use]
    pub fn date_range(&self) -> Option<DateRange> {
        Some(DateRange::new(*self.dates.first()?, *self.dates.last()?))
    }

    /// Looks up the value on `date`.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Iterates over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Returns the most recent `n` observations (the whole series if shorter).
    #[must_use]
    pub fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        Self {
            dates: self.dates[start..].to_vec(),
            values: self.values[start..].to_vec(),
        }
    }

    /// Selects the observations on `dates`.
    ///
    /// `dates` must be strictly increasing.
    ///
    /// # Errors
    ///
    /// `MissingDate` if any requested date is absent, `NonMonotonicDates` if
    /// the request itself is out of order.
    pub fn select(&self, dates: &[Date]) -> CoreResult<Self> {
        let values = dates
            .iter()
            .map(|d| self.get(*d).ok_or(CoreError::MissingDate { date: *d }))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(dates.to_vec(), values)
    }

    /// Returns true if both series share exactly the same date index.
    #[must_use]
    pub fn is_aligned_with(&self, other: &TimeSeries) -> bool {
        self.dates == other.dates
    }

    /// Fails with `Misaligned` unless both series share the same date index.
    pub fn ensure_aligned(&self, other: &TimeSeries) -> CoreResult<()> {
        if self.is_aligned_with(other) {
            return Ok(());
        }
        let first_mismatch = self
            .dates
            .iter()
            .zip(&other.dates)
            .find(|(a, b)| a != b)
            .map(|(a, _)| *a)
            .or_else(|| {
                // One index is a prefix of the other.
                let shorter = self.len().min(other.len());
                self.dates
                    .get(shorter)
                    .or_else(|| other.dates.get(shorter))
                    .copied()
            });
        Err(CoreError::misaligned(self.len(), other.len(), first_mismatch))
    }

    /// Applies `f` to every value, keeping the date index.
    ///
    /// # Errors
    ///
    /// `NonFiniteValue` if `f` produces NaN or infinity.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> CoreResult<Self> {
        Self::new(self.dates.clone(), self.values.iter().map(|v| f(*v)).collect())
    }

    /// Combines two aligned series point by point.
    ///
    /// # Errors
    ///
    /// `Misaligned` if the date indexes differ, `NonFiniteValue` if `f`
    /// produces NaN or infinity.
    pub fn zip_with(&self, other: &TimeSeries, f: impl Fn(f64, f64) -> f64) -> CoreResult<Self> {
        self.ensure_aligned(other)?;
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| f(*a, *b))
            .collect();
        Self::new(self.dates.clone(), values)
    }

    /// Down-samples to `periodicity`, keeping the last observation of each period.
    ///
    /// `Daily` returns an unchanged copy.
    #[must_use]
    pub fn resample_last(&self, periodicity: Periodicity) -> Self {
        if periodicity == Periodicity::Daily {
            return self.clone();
        }

        let mut dates: Vec<Date> = Vec::new();
        let mut values: Vec<f64> = Vec::new();
        for (date, value) in self.iter() {
            let same_bucket = dates
                .last()
                .is_some_and(|prev| periodicity.bucket(*prev) == periodicity.bucket(date));
            if same_bucket {
                // Later observation in the same period replaces the earlier one.
                if let (Some(d), Some(v)) = (dates.last_mut(), values.last_mut()) {
                    *d = date;
                    *v = value;
                }
            } else {
                dates.push(date);
                values.push(value);
            }
        }

        Self { dates, values }
    }
}

/// Serialized form: validated again on the way in.
#[derive(Serialize, Deserialize)]
struct RawSeries {
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl TryFrom<RawSeries> for TimeSeries {
    type Error = CoreError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        TimeSeries::new(raw.dates, raw.values)
    }
}

impl From<TimeSeries> for RawSeries {
    fn from(series: TimeSeries) -> Self {
        RawSeries {
            dates: series.dates,
            values: series.values,
        }
    }
}
