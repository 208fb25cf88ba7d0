//! # Tessera Core
//!
//! Core types for the Tessera portfolio analytics library.
//!
//! This crate provides the foundational building blocks used throughout Tessera:
//!
//! - **Dates**: [`Date`] and [`DateRange`] newtypes over `chrono::NaiveDate`
//! - **Time series**: [`TimeSeries`], an ordered `(date, value)` sequence with
//!   strictly increasing dates
//! - **Periodicity**: [`Periodicity`] for sampling frequency and resampling
//!
//! ## Design Philosophy
//!
//! - **Fail fast**: series are validated on construction and arithmetic between
//!   series requires an identical date index
//! - **Immutable values**: every transformation returns a fresh series
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::prelude::*;
//!
//! let d1 = Date::from_ymd(2025, 1, 2).unwrap();
//! let d2 = Date::from_ymd(2025, 1, 3).unwrap();
//! let prices = TimeSeries::new(vec![d1, d2], vec![100.0, 101.0]).unwrap();
//! assert_eq!(prices.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, DateRange, Periodicity, TimeSeries};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, DateRange, Periodicity, TimeSeries};
