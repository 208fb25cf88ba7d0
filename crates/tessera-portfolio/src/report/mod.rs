//! Report generation: one call runs every analysis and assembles the result.

mod evaluate;
mod result;

pub use evaluate::evaluate;
pub use result::{
    AnalysisResult, HoldingBreakdown, Reconciliation, TrailingWindowResult, UndefinedStatistic,
};
