//! Stats module - descriptive statistics

mod summary;

pub use summary::{MetricSummary, StatsCalculator};
