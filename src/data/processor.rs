//! Data Processor Module
//! Unifies per-year source frames into one table: column union, dtype
//! harmonization, key coercion and placeholder filtering.

use crate::data::cell::CellValue;
use crate::data::columns::{detect_county_column, detect_key_column};
use crate::data::loader::SourceSheet;
use crate::data::table::UnifiedTable;
use crate::error::{ExplorerError, Result};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::info;

/// Key values that mark spreadsheet filler rows rather than libraries.
pub const PLACEHOLDER_KEYS: [&str; 4] = ["0", "0.0", "nan", "None"];

/// Placeholder or blank key (exact, case-sensitive match).
pub fn is_placeholder_key(key: &str) -> bool {
    key.is_empty() || PLACEHOLDER_KEYS.contains(&key)
}

/// Build a column from cells: all-numeric cells give a Float64 column,
/// anything with text gives a String column.
pub fn build_column(name: &str, cells: &[CellValue]) -> Column {
    let numeric = cells
        .iter()
        .all(|c| matches!(c, CellValue::Empty | CellValue::Number(_)));

    if numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Number(v) => Some(*v),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                CellValue::Empty => None,
                other => Some(other.raw_string()),
            })
            .collect();
        Column::new(name.into(), values)
    }
}

fn as_text_column(column: &Column) -> Column {
    let values: Vec<Option<String>> = (0..column.len())
        .map(|i| match CellValue::from_column(column, i) {
            cell if cell.is_missing() => None,
            cell => Some(cell.raw_string()),
        })
        .collect();
    Column::new(column.name().clone(), values)
}

/// Concatenate yearly frames row-wise over the union of their columns.
///
/// Columns missing from a year are null for that year's rows. A column that
/// is numeric in every year stays Float64; otherwise it becomes String.
/// Row order follows `sheets` order.
pub fn unify(sheets: Vec<SourceSheet>) -> Result<UnifiedTable> {
    if sheets.is_empty() {
        return Err(ExplorerError::MissingDataSource {
            path: PathBuf::new(),
        });
    }

    let mut union: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut text_columns: HashSet<String> = HashSet::new();

    for sheet in &sheets {
        for column in sheet.frame.get_columns() {
            let name = column.name().to_string();
            if column.dtype() != &DataType::Float64 {
                text_columns.insert(name.clone());
            }
            if seen.insert(name.clone()) {
                union.push(name);
            }
        }
    }

    let mut stacked: Option<DataFrame> = None;
    let mut source_headers: HashMap<String, Vec<String>> = HashMap::new();

    for sheet in sheets {
        let height = sheet.frame.height();
        let mut columns = Vec::with_capacity(union.len());

        for name in &union {
            let target = if text_columns.contains(name) {
                DataType::String
            } else {
                DataType::Float64
            };
            let column = match sheet.frame.column(name) {
                Ok(c) if c.dtype() == &target => c.clone(),
                Ok(c) => as_text_column(c),
                Err(_) => Column::full_null(name.as_str().into(), height, &target),
            };
            columns.push(column);
        }

        let frame = DataFrame::new(columns)?;
        source_headers
            .entry(sheet.year.clone())
            .or_insert(sheet.headers);

        match stacked.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&frame)?;
            }
            None => stacked = Some(frame),
        }
    }

    let frame = stacked.ok_or_else(|| ExplorerError::MissingDataSource {
        path: PathBuf::new(),
    })?;

    let key_column = detect_key_column(&union)
        .map(str::to_string)
        .ok_or_else(|| ExplorerError::MissingDataSource {
            path: PathBuf::new(),
        })?;
    let county_column = detect_county_column(&union).map(str::to_string);

    let frame = clean_keys(frame, &key_column)?;
    UnifiedTable::new(frame, key_column, county_column, source_headers)
}

/// Coerce the key column to trimmed text and drop placeholder rows.
fn clean_keys(frame: DataFrame, key_column: &str) -> Result<DataFrame> {
    let key = frame.column(key_column)?;
    let keys: Vec<String> = (0..frame.height())
        .map(|i| {
            CellValue::from_column(key, i)
                .coerced_string()
                .trim()
                .to_string()
        })
        .collect();

    let keep: Vec<bool> = keys.iter().map(|k| !is_placeholder_key(k)).collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    let kept_keys: Vec<String> = keys
        .into_iter()
        .zip(keep.iter())
        .filter(|(_, keep)| **keep)
        .map(|(k, _)| k)
        .collect();

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let mut frame = frame.filter(&mask)?;
    frame.with_column(Column::new(key_column.into(), kept_keys))?;

    if dropped > 0 {
        info!(column = key_column, dropped, "removed placeholder rows");
    }
    Ok(frame)
}
