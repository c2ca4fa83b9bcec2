//! History: a library's trailing window of reported years for chosen metrics.

use super::ViewResult;
use crate::data::formatter::format_cell;
use crate::data::UnifiedTable;

/// Default number of years in a trend window.
pub const DEFAULT_TREND_WINDOW: usize = 5;

/// One chart line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    /// Short legend label (`Metric_1`, `Metric_2`, ...).
    pub label: String,
    pub metric: String,
    /// (year, value) pairs, oldest first; missing values are skipped.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub library: String,
    /// Window years, oldest first (table column order).
    pub years: Vec<String>,
    /// One row per metric: (metric, formatted value per year).
    pub rows: Vec<(String, Vec<String>)>,
    pub series: Vec<TrendSeries>,
}

/// Trailing window ending at `end_year` over a library's own years.
///
/// `available` must be sorted newest first. The window is `end_year` plus
/// up to `size - 1` entries that follow it in that list, newest first.
/// Returns `None` when `end_year` is not one of the available years.
pub fn trend_window(available: &[String], end_year: &str, size: usize) -> Option<Vec<String>> {
    let start = available.iter().position(|y| y == end_year)?;
    Some(available.iter().skip(start).take(size).cloned().collect())
}

pub fn history(
    table: &UnifiedTable,
    library: Option<&str>,
    end_year: &str,
    metrics: &[String],
    window: usize,
) -> ViewResult<HistoryView> {
    let Some(library) = library else {
        return ViewResult::NeedsSelection("Select a library to view historical data.");
    };

    let available = table.years_for_library(library);
    let Some(mut years) = trend_window(&available, end_year, window) else {
        return ViewResult::NoData(format!("{library} has no data for {end_year}."));
    };
    years.reverse();

    if metrics.is_empty() {
        return ViewResult::NeedsSelection("Choose a metric.");
    }

    let year_rows: Vec<(String, Option<usize>)> = years
        .iter()
        .map(|y| (y.clone(), table.rows_for(library, y).first().copied()))
        .collect();

    let rows = metrics
        .iter()
        .map(|metric| {
            let values = year_rows
                .iter()
                .map(|(_, row)| match row {
                    Some(row) => format_cell(metric, &table.cell(*row, metric)),
                    None => String::new(),
                })
                .collect();
            (metric.clone(), values)
        })
        .collect();

    let series = metrics
        .iter()
        .enumerate()
        .map(|(i, metric)| TrendSeries {
            label: format!("Metric_{}", i + 1),
            metric: metric.clone(),
            points: year_rows
                .iter()
                .filter_map(|(year, row)| {
                    let x = year.trim().parse::<f64>().ok()?;
                    let y = table.cell((*row)?, metric).to_numeric()?;
                    Some((x, y))
                })
                .collect(),
        })
        .collect();

    ViewResult::Ready(HistoryView {
        library: library.to_string(),
        years,
        rows,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::fixtures::sample_table;

    fn years(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_window_shorter_than_history() {
        let available = years(&["2023", "2021", "2019", "2018"]);
        assert_eq!(
            trend_window(&available, "2023", 5),
            Some(years(&["2023", "2021", "2019", "2018"]))
        );
    }

    #[test]
    fn test_window_is_trailing_and_capped() {
        let available = years(&["2024", "2023", "2022", "2021", "2020", "2019", "2018"]);
        assert_eq!(
            trend_window(&available, "2023", 5),
            Some(years(&["2023", "2022", "2021", "2020", "2019"]))
        );
        assert_eq!(trend_window(&available, "2018", 5), Some(years(&["2018"])));
        assert_eq!(trend_window(&available, "2010", 5), None);
    }

    #[test]
    fn test_history_table_and_series() {
        let table = sample_table();
        let metrics = vec!["Circulation".to_string(), "Ebook Percentage".to_string()];
        let view = history(&table, Some("Trenton"), "2023", &metrics, 5)
            .ready()
            .unwrap();

        assert_eq!(view.years, years(&["2018", "2019", "2021", "2023"]));
        assert_eq!(
            view.rows[0],
            (
                "Circulation".to_string(),
                years(&["1,000", "1,100", "900", "1,300"])
            )
        );
        assert_eq!(
            view.rows[1],
            (
                "Ebook Percentage".to_string(),
                years(&["N/A", "N/A", "5%", "10%"])
            )
        );

        assert_eq!(view.series[0].label, "Metric_1");
        assert_eq!(view.series[0].points.len(), 4);
        assert_eq!(view.series[0].points[3], (2023.0, 1300.0));
        assert_eq!(view.series[1].metric, "Ebook Percentage");
        assert_eq!(view.series[1].points.len(), 2);
    }

    #[test]
    fn test_history_states() {
        let table = sample_table();
        let metrics = vec!["Circulation".to_string()];
        assert!(matches!(
            history(&table, None, "2023", &metrics, 5),
            ViewResult::NeedsSelection(_)
        ));
        assert!(matches!(
            history(&table, Some("Camden"), "2019", &metrics, 5),
            ViewResult::NoData(_)
        ));
        assert!(matches!(
            history(&table, Some("Camden"), "2023", &[], 5),
            ViewResult::NeedsSelection(_)
        ));
    }
}
