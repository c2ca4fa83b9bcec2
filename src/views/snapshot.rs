//! Snapshot: one library, one year, shown as a vertical field/value list.

use super::ViewResult;
use crate::data::formatter::{format_cell, is_uninformative};
use crate::data::UnifiedTable;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotView {
    pub library: String,
    pub year: String,
    /// (field, formatted value) in the source file's column order.
    pub rows: Vec<(String, String)>,
}

impl SnapshotView {
    pub fn title(&self) -> String {
        format!("{} ({})", self.library, self.year)
    }
}

/// Format the first record for `library` in `year`.
///
/// Fields follow that year's source header order; fields whose formatted
/// value is uninformative (`N/A`, `nan`, `None`, empty) are left out.
pub fn snapshot(
    table: &UnifiedTable,
    library: Option<&str>,
    year: &str,
) -> ViewResult<SnapshotView> {
    let Some(library) = library else {
        return ViewResult::NeedsSelection("Select a library to view its snapshot.");
    };

    let Some(&row) = table.rows_for(library, year).first() else {
        return ViewResult::NoData("No data found for this selection.".to_string());
    };

    let order: Vec<String> = match table.source_headers(year) {
        Some(headers) => headers.to_vec(),
        None => table.column_names(),
    };

    let rows = order
        .iter()
        .filter(|name| table.has_column(name))
        .filter_map(|name| {
            let value = format_cell(name, &table.cell(row, name));
            (!is_uninformative(&value)).then(|| (name.clone(), value))
        })
        .collect();

    ViewResult::Ready(SnapshotView {
        library: library.to_string(),
        year: year.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::fixtures::sample_table;

    #[test]
    fn test_snapshot_follows_source_order_and_drops_empty() {
        let table = sample_table();
        let view = snapshot(&table, Some("Trenton"), "2019").ready().unwrap();

        assert_eq!(view.title(), "Trenton (2019)");
        assert_eq!(
            view.rows,
            vec![
                ("Municipality/County".to_string(), "Trenton".to_string()),
                ("County".to_string(), "Mercer".to_string()),
                ("Zip Code".to_string(), "08608".to_string()),
                ("Circulation".to_string(), "1,100".to_string()),
            ]
        );
    }

    #[test]
    fn test_snapshot_formats_percentages() {
        let table = sample_table();
        let view = snapshot(&table, Some("Princeton"), "2021").ready().unwrap();
        assert!(view
            .rows
            .contains(&("Ebook Percentage".to_string(), "12.50%".to_string())));
    }

    #[test]
    fn test_snapshot_states() {
        let table = sample_table();
        assert!(matches!(
            snapshot(&table, None, "2023"),
            ViewResult::NeedsSelection(_)
        ));
        assert!(matches!(
            snapshot(&table, Some("Camden"), "2018"),
            ViewResult::NoData(_)
        ));
    }
}
