//! # Tessera Math
//!
//! Statistical utilities for the Tessera portfolio analytics library.
//!
//! This crate provides:
//!
//! - **Descriptive statistics**: mean, sample variance and standard deviation
//! - **Co-movement**: sample covariance and Pearson correlation
//! - **Regression**: simple ordinary least squares with Student-t inference
//!   on both coefficients
//!
//! ## Design Philosophy
//!
//! - **One primitive per quantity**: variance is covariance of a series with
//!   itself, and the OLS slope is built from the same covariance and variance
//!   functions, so independent estimators that are algebraically equal also
//!   agree bit-for-bit
//! - **Undefined is not zero**: degenerate inputs produce errors or `None`,
//!   never a silently substituted number

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod regression;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::regression::{student_t_p_value, LinearRegression};
    pub use crate::statistics::{
        correlation, covariance, mean, sample_std_dev, sample_variance,
    };
}

pub use error::{MathError, MathResult};
