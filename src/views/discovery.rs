//! Discovery: free-text search over the whole table, plus CSV export.

use crate::data::formatter::format_for_export;
use crate::data::loader::compare_year_tags;
use crate::data::UnifiedTable;
use crate::error::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Search results, formatted for display and export.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryView {
    pub search: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DiscoveryView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// String frame of the results; empty cells are null so they export blank.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let values: Vec<Option<&str>> = self
                    .rows
                    .iter()
                    .map(|row| row.get(c).map(String::as_str).filter(|s| !s.is_empty()))
                    .collect();
                Column::new(name.as_str().into(), values)
            })
            .collect::<Vec<_>>();
        Ok(DataFrame::new(columns)?)
    }

    /// UTF-8 CSV with a header row and no index column.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut df = self.to_dataframe()?;
        let mut buf: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut df)?;
        Ok(buf)
    }

    /// Write the CSV into `dir` under [`export_file_name`].
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(export_file_name(&self.search));
        self.write_csv_to(&path)?;
        Ok(path)
    }

    pub fn write_csv_to(&self, path: &Path) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        info!(path = %path.display(), rows = self.len(), "exported search results");
        Ok(())
    }
}

/// `text` trimmed, with anything other than ASCII letters, digits and `-`
/// replaced by `_`.
pub fn file_name_component(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// `nj_library_export_<search>.csv`, or `..._all.csv` without a search.
pub fn export_file_name(search: &str) -> String {
    let term = search.trim();
    let term = if term.is_empty() {
        "all".to_string()
    } else {
        file_name_component(term)
    };
    format!("nj_library_export_{term}.csv")
}

/// Rows whose library name contains `search` (case-insensitive), newest
/// year first. ZIP and percentage columns are formatted; the rest stay raw.
pub fn discover(table: &UnifiedTable, search: &str) -> DiscoveryView {
    let needle = search.trim().to_lowercase();
    let mut rows = table.rows_where(|i| {
        needle.is_empty() || table.key_at(i).to_lowercase().contains(&needle)
    });
    rows.sort_by(|&a, &b| compare_year_tags(table.year_at(b), table.year_at(a)));

    let columns = table.column_names();
    let formatted = rows
        .into_iter()
        .map(|i| {
            columns
                .iter()
                .map(|c| format_for_export(c, &table.cell(i, c)))
                .collect()
        })
        .collect();

    DiscoveryView {
        search: search.trim().to_string(),
        columns,
        rows: formatted,
    }
}
