//! Error types for core Tessera types.
//!
//! These errors describe structural problems with dates and time series.
//! Higher layers attach the series identifier (ticker) when they surface them.

use thiserror::Error;

use crate::types::Date;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing or combining core types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date construction or parsing.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Dates are not strictly increasing (includes duplicates).
    #[error("Dates must be strictly increasing: {date} follows {previous}")]
    NonMonotonicDates {
        /// The offending date.
        date: Date,
        /// The date immediately before it.
        previous: Date,
    },

    /// Date and value vectors differ in length.
    #[error("Length mismatch: {dates} dates but {values} values")]
    LengthMismatch {
        /// Number of dates supplied.
        dates: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Two series that must share a date index do not.
    #[error("Series are not aligned: {left_len} vs {right_len} points{}", .first_mismatch.map(|d| format!(", first difference at {d}")).unwrap_or_default())]
    Misaligned {
        /// Length of the left-hand series.
        left_len: usize,
        /// Length of the right-hand series.
        right_len: usize,
        /// First date at which the two indexes differ, if any.
        first_mismatch: Option<Date>,
    },

    /// A requested date is absent from the series.
    #[error("Date {date} not present in series")]
    MissingDate {
        /// The missing date.
        date: Date,
    },

    /// A value is NaN or infinite.
    #[error("Non-finite value {value} at {date}")]
    NonFiniteValue {
        /// Date of the value.
        date: Date,
        /// The offending value.
        value: f64,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a misalignment error.
    #[must_use]
    pub fn misaligned(left_len: usize, right_len: usize, first_mismatch: Option<Date>) -> Self {
        Self::Misaligned {
            left_len,
            right_len,
            first_mismatch,
        }
    }

    /// Returns the date the error refers to, if there is one.
    #[must_use]
    pub fn date(&self) -> Option<Date> {
        match self {
            Self::NonMonotonicDates { date, .. }
            | Self::MissingDate { date }
            | Self::NonFiniteValue { date, .. } => Some(*date),
            Self::Misaligned { first_mismatch, .. } => *first_mismatch,
            Self::InvalidDate { .. } | Self::LengthMismatch { .. } => None,
        }
    }
}
