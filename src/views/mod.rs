//! Views module - per-tab projections of the unified table
//!
//! Every function here is pure: it takes the table and the user's
//! selections and returns formatted rows ready for display.

mod compare;
mod discovery;
mod history;
mod rank;
mod snapshot;

pub use compare::{compare, counties, libraries_in_county, CompareRow, CompareView};
pub use discovery::{discover, export_file_name, file_name_component, DiscoveryView};
pub use history::{history, trend_window, HistoryView, TrendSeries, DEFAULT_TREND_WINDOW};
pub use rank::{
    leaderboard, rank, rankable_metrics, RankEntry, RankView, DEFAULT_LEADERBOARD_SIZE,
};
pub use snapshot::{snapshot, SnapshotView};

use crate::data::{UnifiedTable, YEAR_COLUMN};

/// Outcome of a view request. Only `Ready` carries data; the other two are
/// informational states, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResult<T> {
    Ready(T),
    /// The user has not made enough selections yet.
    NeedsSelection(&'static str),
    /// The selection matched nothing.
    NoData(String),
}

impl<T> ViewResult<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            ViewResult::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// Columns offered as metrics: everything except the year, key and county.
pub fn metric_columns(table: &UnifiedTable, include_county: bool) -> Vec<String> {
    table
        .column_names()
        .into_iter()
        .filter(|c| c != YEAR_COLUMN && c != table.key_column())
        .filter(|c| include_county || Some(c.as_str()) != table.county_column())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::fixtures::sample_table;

    #[test]
    fn test_metric_columns_exclude_roles() {
        let table = sample_table();
        assert_eq!(
            metric_columns(&table, true),
            vec!["County", "Zip Code", "Circulation", "Ebook Percentage", "Program Count"]
        );
        assert_eq!(
            metric_columns(&table, false),
            vec!["Zip Code", "Circulation", "Ebook Percentage", "Program Count"]
        );
    }
}
