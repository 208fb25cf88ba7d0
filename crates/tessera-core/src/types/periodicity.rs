//! Sampling frequency of a time series.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// Sampling frequency of a price or return series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// One observation per trading day.
    #[default]
    Daily,
    /// Last observation of each ISO week.
    Weekly,
    /// Last observation of each calendar month.
    Monthly,
    /// Last observation of each calendar quarter.
    Quarterly,
    /// Last observation of each calendar year.
    Annual,
}

impl Periodicity {
    /// Returns the conventional number of periods per year.
    ///
    /// Daily data assumes 252 trading days.
    #[must_use]
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Periodicity::Daily => 252.0,
            Periodicity::Weekly => 52.0,
            Periodicity::Monthly => 12.0,
            Periodicity::Quarterly => 4.0,
            Periodicity::Annual => 1.0,
        }
    }

    /// Returns the bucket a date falls in at this periodicity.
    ///
    /// Two dates share a bucket exactly when they belong to the same period.
    /// For `Daily` every date is its own bucket.
    #[must_use]
    pub fn bucket(&self, date: Date) -> (i32, u32) {
        match self {
            Periodicity::Daily => (date.year(), date.day_of_year()),
            Periodicity::Weekly => date.iso_week(),
            Periodicity::Monthly => (date.year(), date.month()),
            Periodicity::Quarterly => (date.year(), date.quarter()),
            Periodicity::Annual => (date.year(), 0),
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Periodicity::Daily => "Daily",
            Periodicity::Weekly => "Weekly",
            Periodicity::Monthly => "Monthly",
            Periodicity::Quarterly => "Quarterly",
            Periodicity::Annual => "Annual",
        };
        write!(f, "{name}")
    }
}
