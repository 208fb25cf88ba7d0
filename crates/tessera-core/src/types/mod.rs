//! Domain types for time-indexed analytics.
//!
//! - [`Date`]: Calendar date
//! - [`DateRange`]: Inclusive span of dates, used for error and report context
//! - [`Periodicity`]: Sampling frequency of a series
//! - [`TimeSeries`]: Ordered `(date, value)` sequence

mod date;
mod periodicity;
mod series;

pub use date::{Date, DateRange};
pub use periodicity::Periodicity;
pub use series::TimeSeries;
