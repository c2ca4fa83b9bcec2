//! Rank: statewide top-N leaderboard for one metric in one year.

use super::{metric_columns, ViewResult};
use crate::data::formatter::format_cell;
use crate::data::UnifiedTable;
use crate::stats::{MetricSummary, StatsCalculator};
use std::cmp::Ordering;

/// Default leaderboard length.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub library: String,
    pub value: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankView {
    pub year: String,
    pub metric: String,
    pub entries: Vec<RankEntry>,
    /// Statistics over every library with a positive value, not just the top N.
    pub summary: MetricSummary,
}

/// Metrics worth ranking in `year`: those whose values, with blanks as 0,
/// sum to more than zero. Union column order is kept.
pub fn rankable_metrics(table: &UnifiedTable, year: &str) -> Vec<String> {
    let rows = table.rows_where(|i| table.year_at(i) == year);
    metric_columns(table, false)
        .into_iter()
        .filter(|metric| {
            let total: f64 = rows
                .iter()
                .map(|&i| table.cell(i, metric).to_numeric().unwrap_or(0.0))
                .sum();
            total > 0.0
        })
        .collect()
}

/// Positive values of `metric` in `year`, in table order.
fn positive_values(table: &UnifiedTable, year: &str, metric: &str) -> Vec<(usize, f64)> {
    table
        .rows_where(|i| table.year_at(i) == year)
        .into_iter()
        .filter_map(|i| {
            let v = table.cell(i, metric).to_numeric()?;
            (v > 0.0).then_some((i, v))
        })
        .collect()
}

/// Top `limit` libraries by `metric` in `year`, highest first. Ties keep
/// table order. Blank, non-numeric and non-positive values are excluded.
pub fn leaderboard(table: &UnifiedTable, year: &str, metric: &str, limit: usize) -> Vec<RankEntry> {
    let mut values = positive_values(table, year, metric);
    values.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    values.truncate(limit);

    values
        .into_iter()
        .map(|(i, value)| RankEntry {
            library: table.key_at(i).to_string(),
            value,
            display: format_cell(metric, &value.into()),
        })
        .collect()
}

pub fn rank(
    table: &UnifiedTable,
    year: &str,
    metric: Option<&str>,
    limit: usize,
) -> ViewResult<RankView> {
    let Some(metric) = metric else {
        return ViewResult::NeedsSelection(
            "Select a metric to see the leaderboard for the chosen year.",
        );
    };

    let entries = leaderboard(table, year, metric, limit);
    if entries.is_empty() {
        return ViewResult::NoData(format!(
            "No libraries have reported valid data for '{metric}' in {year}."
        ));
    }

    let all: Vec<f64> = positive_values(table, year, metric)
        .into_iter()
        .map(|(_, v)| v)
        .collect();

    ViewResult::Ready(RankView {
        year: year.to_string(),
        metric: metric.to_string(),
        entries,
        summary: StatsCalculator::summarize(&all),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::fixtures::sample_table;

    #[test]
    fn test_rankable_metrics_hide_zero_sum_columns() {
        let table = sample_table();
        assert_eq!(
            rankable_metrics(&table, "2023"),
            vec!["Zip Code", "Circulation", "Ebook Percentage"]
        );
        // Ebook Percentage did not exist yet in 2019.
        assert_eq!(rankable_metrics(&table, "2019"), vec!["Zip Code", "Circulation"]);
    }

    #[test]
    fn test_leaderboard_shorter_than_cap() {
        let table = sample_table();
        let board = leaderboard(&table, "2023", "Circulation", 20);

        // Newark reported 0 and is excluded.
        assert_eq!(board.len(), 3);
        let names: Vec<&str> = board.iter().map(|e| e.library.as_str()).collect();
        // Princeton and Camden tie; table order decides.
        assert_eq!(names, vec!["Princeton", "Camden", "Trenton"]);
        assert_eq!(board[0].display, "3,500");
    }

    #[test]
    fn test_leaderboard_truncates_to_limit() {
        let table = sample_table();
        let board = leaderboard(&table, "2023", "Circulation", 2);
        assert_eq!(board.len(), 2);
        assert_eq!(board[1].library, "Camden");
    }

    #[test]
    fn test_rank_view_and_states() {
        let table = sample_table();
        let view = rank(&table, "2023", Some("Circulation"), 20).ready().unwrap();
        assert_eq!(view.summary.count, 3);
        assert_eq!(view.summary.max, 3500.0);

        assert!(matches!(
            rank(&table, "2023", None, 20),
            ViewResult::NeedsSelection(_)
        ));
        assert!(matches!(
            rank(&table, "2023", Some("Program Count"), 20),
            ViewResult::NoData(_)
        ));
    }
}
