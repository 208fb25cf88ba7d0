//! Return, risk, alpha/beta and correlation analytics.
//!
//! All functions are pure: they take return series and configuration as
//! input and return computed results. No caching, no I/O.

mod correlation;
mod parallel;
mod regression;
mod returns;
mod risk;

pub use correlation::*;
pub use parallel::*;
pub use regression::*;
pub use returns::*;
pub use risk::*;
