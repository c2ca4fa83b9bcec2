//! The unified, read-only table every view reads from.

use crate::data::cell::CellValue;
use crate::data::columns::YEAR_COLUMN;
use crate::data::loader::compare_year_tags;
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// All years of report data in one frame, plus the detected column roles.
///
/// Built once by the processor and never mutated; views borrow it.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    frame: DataFrame,
    key_column: String,
    county_column: Option<String>,
    /// Header order of each year's source file.
    source_headers: HashMap<String, Vec<String>>,
    keys: Vec<String>,
    years: Vec<String>,
}

impl UnifiedTable {
    pub fn new(
        frame: DataFrame,
        key_column: String,
        county_column: Option<String>,
        source_headers: HashMap<String, Vec<String>>,
    ) -> Result<Self> {
        let key = frame.column(&key_column)?;
        let keys = (0..frame.height())
            .map(|i| CellValue::from_column(key, i).raw_string())
            .collect();

        let year = frame.column(YEAR_COLUMN)?;
        let years = (0..frame.height())
            .map(|i| CellValue::from_column(year, i).raw_string())
            .collect();

        Ok(Self {
            frame,
            key_column,
            county_column,
            source_headers,
            keys,
            years,
        })
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn county_column(&self) -> Option<&str> {
        self.county_column.as_deref()
    }

    /// Column names in union order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn key_at(&self, row: usize) -> &str {
        self.keys.get(row).map(String::as_str).unwrap_or_default()
    }

    pub fn year_at(&self, row: usize) -> &str {
        self.years.get(row).map(String::as_str).unwrap_or_default()
    }

    /// Cell at `row` of `column`; unknown columns read as empty.
    pub fn cell(&self, row: usize, column: &str) -> CellValue {
        self.frame
            .column(column)
            .map(|c| CellValue::from_column(c, row))
            .unwrap_or(CellValue::Empty)
    }

    /// Header order of the source file for `year`.
    pub fn source_headers(&self, year: &str) -> Option<&[String]> {
        self.source_headers.get(year).map(Vec::as_slice)
    }

    /// Row indices satisfying `pred`, in table order.
    pub fn rows_where(&self, pred: impl Fn(usize) -> bool) -> Vec<usize> {
        (0..self.height()).filter(|&i| pred(i)).collect()
    }

    pub fn rows_for(&self, library: &str, year: &str) -> Vec<usize> {
        self.rows_where(|i| self.key_at(i) == library && self.year_at(i) == year)
    }

    /// Distinct library names, sorted.
    pub fn libraries(&self) -> Vec<String> {
        self.keys
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct year tags, newest first.
    pub fn years(&self) -> Vec<String> {
        sorted_years_desc(self.years.iter().map(String::as_str))
    }

    /// Years a library reported, newest first.
    pub fn years_for_library(&self, library: &str) -> Vec<String> {
        sorted_years_desc(
            self.keys
                .iter()
                .zip(self.years.iter())
                .filter(|(k, _)| k.as_str() == library)
                .map(|(_, y)| y.as_str()),
        )
    }
}

fn sorted_years_desc<'a>(years: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = years
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    distinct.sort_by(|a, b| compare_year_tags(b, a));
    distinct
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::data::loader::SourceSheet;
    use crate::data::processor::unify;

    fn sheet(year: &str, frame: DataFrame) -> SourceSheet {
        let mut frame = frame;
        let headers = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let height = frame.height();
        frame
            .insert_column(0, Column::new(YEAR_COLUMN.into(), vec![year.to_string(); height]))
            .expect("year column");
        SourceSheet {
            year: year.to_string(),
            headers,
            frame,
        }
    }

    /// Four libraries across 2018-2023 with uneven reporting histories.
    pub fn sample_table() -> UnifiedTable {
        let y2018 = df!(
            "Municipality/County" => &["Trenton", "Newark"],
            "County" => &["Mercer", "Essex"],
            "Zip Code" => &[8608.0, 7102.0],
            "Circulation" => &[1000.0, 5000.0]
        )
        .expect("2018 frame");
        let y2019 = df!(
            "Municipality/County" => &["Trenton", "Newark", "Princeton"],
            "County" => &["Mercer", "Essex", "Mercer"],
            "Zip Code" => &[8608.0, 7102.0, 8542.0],
            "Circulation" => &[1100.0, 5200.0, 3000.0]
        )
        .expect("2019 frame");
        let y2021 = df!(
            "Municipality/County" => &["Trenton", "Princeton"],
            "County" => &["Mercer", "Mercer"],
            "Zip Code" => &[8608.0, 8542.0],
            "Circulation" => &[900.0, 3100.0],
            "Ebook Percentage" => &[0.05, 0.125]
        )
        .expect("2021 frame");
        let y2023 = df!(
            "Municipality/County" => &["Trenton", "Newark", "Princeton", "Camden"],
            "County" => &["Mercer", "Essex", "Mercer", "Camden"],
            "Zip Code" => &[8608.0, 7102.0, 8542.0, 8101.0],
            "Circulation" => &[1300.0, 0.0, 3500.0, 3500.0],
            "Ebook Percentage" => &[0.1, 0.0, 0.2, 0.15],
            "Program Count" => &[0.0, 0.0, 0.0, 0.0]
        )
        .expect("2023 frame");

        unify(vec![
            sheet("2018", y2018),
            sheet("2019", y2019),
            sheet("2021", y2021),
            sheet("2023", y2023),
        ])
        .expect("sample table")
    }
}
