//! Statistics Summary Module
//! Descriptive statistics of one metric across reporting libraries.

use statrs::statistics::{Data, Distribution, Max, Median, Min, OrderStatistics};

/// Summary of a set of metric values.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for MetricSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            p95: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Handles descriptive statistics for metric values.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics; NaN values are ignored.
    pub fn summarize(values: &[f64]) -> MetricSummary {
        let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = clean.len();
        if count == 0 {
            return MetricSummary::default();
        }

        let mut data = Data::new(clean);
        let mean = data.mean().unwrap_or(f64::NAN);
        let std = if count > 1 {
            data.std_dev().unwrap_or(f64::NAN)
        } else {
            0.0
        };

        MetricSummary {
            count,
            mean,
            median: data.median(),
            std,
            p95: data.percentile(95),
            min: data.min(),
            max: data.max(),
        }
    }
}
