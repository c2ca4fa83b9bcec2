//! Compare: several libraries side by side on one metric for one year.

use super::ViewResult;
use crate::data::formatter::format_cell;
use crate::data::UnifiedTable;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// County cell values that are filler, not county names.
const COUNTY_PLACEHOLDERS: [&str; 3] = ["0", "0.0", "nan"];

#[derive(Debug, Clone, PartialEq)]
pub struct CompareRow {
    pub library: String,
    pub value: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareView {
    pub year: String,
    pub metric: String,
    /// Highest value first.
    pub rows: Vec<CompareRow>,
}

/// Distinct county names, sorted. Empty when no county column was detected.
pub fn counties(table: &UnifiedTable) -> Vec<String> {
    let Some(county) = table.county_column() else {
        return Vec::new();
    };
    (0..table.height())
        .map(|i| table.cell(i, county).raw_string())
        .filter(|c| !c.is_empty() && !COUNTY_PLACEHOLDERS.contains(&c.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Libraries to offer for comparison, narrowed to one county when given.
pub fn libraries_in_county(table: &UnifiedTable, county: Option<&str>) -> Vec<String> {
    match (county, table.county_column()) {
        (Some(county), Some(column)) => table
            .rows_where(|i| table.cell(i, column).raw_string() == county)
            .into_iter()
            .map(|i| table.key_at(i).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        _ => table.libraries(),
    }
}

/// Values of `metric` for the selected libraries in `year`, sorted
/// descending. Non-numeric values count as 0.
pub fn compare(
    table: &UnifiedTable,
    libraries: &[String],
    year: &str,
    metric: Option<&str>,
) -> ViewResult<CompareView> {
    if libraries.is_empty() {
        return ViewResult::NeedsSelection("Select at least one library to begin the comparison.");
    }
    let Some(metric) = metric else {
        return ViewResult::NeedsSelection("Select a data point to compare.");
    };

    let mut rows: Vec<CompareRow> = table
        .rows_where(|i| table.year_at(i) == year && libraries.iter().any(|l| l == table.key_at(i)))
        .into_iter()
        .map(|i| {
            let value = table.cell(i, metric).to_numeric().unwrap_or(0.0);
            CompareRow {
                library: table.key_at(i).to_string(),
                value,
                display: format_cell(metric, &value.into()),
            }
        })
        .collect();

    if rows.is_empty() {
        return ViewResult::NoData(format!("None of the selected libraries reported for {year}."));
    }

    rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    ViewResult::Ready(CompareView {
        year: year.to_string(),
        metric: metric.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::fixtures::sample_table;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_county_lists() {
        let table = sample_table();
        assert_eq!(counties(&table), names(&["Camden", "Essex", "Mercer"]));
        assert_eq!(
            libraries_in_county(&table, Some("Mercer")),
            names(&["Princeton", "Trenton"])
        );
        assert_eq!(libraries_in_county(&table, None).len(), 4);
    }

    #[test]
    fn test_compare_sorts_descending() {
        let table = sample_table();
        let selected = names(&["Trenton", "Newark", "Princeton"]);
        let view = compare(&table, &selected, "2023", Some("Circulation"))
            .ready()
            .unwrap();

        let order: Vec<&str> = view.rows.iter().map(|r| r.library.as_str()).collect();
        assert_eq!(order, vec!["Princeton", "Trenton", "Newark"]);
        assert_eq!(view.rows[0].display, "3,500");
        assert_eq!(view.rows[2].value, 0.0);
    }

    #[test]
    fn test_compare_missing_metric_counts_as_zero() {
        let table = sample_table();
        let selected = names(&["Trenton"]);
        let view = compare(&table, &selected, "2018", Some("Ebook Percentage"))
            .ready()
            .unwrap();
        assert_eq!(view.rows[0].value, 0.0);
        assert_eq!(view.rows[0].display, "0%");
    }

    #[test]
    fn test_compare_states() {
        let table = sample_table();
        assert!(matches!(
            compare(&table, &[], "2023", Some("Circulation")),
            ViewResult::NeedsSelection(_)
        ));
        assert!(matches!(
            compare(&table, &names(&["Camden"]), "2023", None),
            ViewResult::NeedsSelection(_)
        ));
        assert!(matches!(
            compare(&table, &names(&["Camden"]), "2018", Some("Circulation")),
            ViewResult::NoData(_)
        ));
    }
}
