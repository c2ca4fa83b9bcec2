//! Source File Loader Module
//! Reads every yearly spreadsheet in a directory and hands the per-year
//! frames to the processor for unification.

use crate::data::cell::CellValue;
use crate::data::columns::YEAR_COLUMN;
use crate::data::processor::{self, build_column};
use crate::data::table::UnifiedTable;
use crate::error::{ExplorerError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Extensions read through calamine.
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Extension read through the polars CSV reader.
const CSV_EXTENSION: &str = "csv";

/// Cell text read as missing, matching common spreadsheet NA markers.
const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One yearly source file after header cleanup and year tagging.
#[derive(Debug, Clone)]
pub struct SourceSheet {
    pub year: String,
    /// Cleaned headers in the file's own column order (without an inserted year column).
    pub headers: Vec<String>,
    pub frame: DataFrame,
}

/// Loads a directory of yearly report files into a [`UnifiedTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DataLoader {
    validate_year_tags: bool,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip files whose name does not start with a plausible year.
    pub fn with_year_validation(mut self, validate: bool) -> Self {
        self.validate_year_tags = validate;
        self
    }

    /// Load and unify every spreadsheet in `dir`.
    pub fn load_dir(&self, dir: &Path) -> Result<UnifiedTable> {
        let files = list_source_files(dir)?;

        let files: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| {
                let tag = year_tag(path);
                if is_plausible_year(&tag) {
                    return true;
                }
                warn!(file = %path.display(), tag = %tag, "year tag is not a calendar year");
                !self.validate_year_tags
            })
            .collect();

        if files.is_empty() {
            return Err(ExplorerError::MissingDataSource {
                path: dir.to_path_buf(),
            });
        }

        // Files are independent; collect keeps enumeration order.
        let sheets = files
            .par_iter()
            .map(|path| read_source(path))
            .collect::<Result<Vec<_>>>()?;

        let table = processor::unify(sheets)?;
        info!(
            dir = %dir.display(),
            rows = table.height(),
            columns = table.column_names().len(),
            key = table.key_column(),
            "unified table ready"
        );
        Ok(table)
    }
}

/// Spreadsheet files in `dir`, sorted by file name.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExplorerError::MissingDataSource {
                path: dir.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_spreadsheet(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ExplorerError::MissingDataSource {
            path: dir.to_path_buf(),
        });
    }
    Ok(files)
}

fn is_spreadsheet(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    // Office lock files and hidden files
    if name.starts_with("~$") || name.starts_with('.') {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_ascii_lowercase();
            ext == CSV_EXTENSION || WORKBOOK_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Year tag of a source file: its name up to the first `.`.
pub fn year_tag(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

/// Four ASCII digits between 1900 and 2100.
pub fn is_plausible_year(tag: &str) -> bool {
    tag.len() == 4
        && tag.bytes().all(|b| b.is_ascii_digit())
        && tag
            .parse::<u16>()
            .map(|y| (1900..=2100).contains(&y))
            .unwrap_or(false)
}

/// Year tags that parse as integers order numerically and before any others.
pub fn compare_year_tags(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Read one file, clean its headers and tag its rows with the year.
pub fn read_source(path: &Path) -> Result<SourceSheet> {
    let year = year_tag(path);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (raw_headers, rows) = if ext == CSV_EXTENSION {
        read_csv_rows(path)?
    } else {
        read_workbook_rows(path)?
    };

    let headers = clean_headers(&raw_headers);
    let columns = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells: Vec<CellValue> = rows
                .iter()
                .map(|row| row.get(i).cloned().unwrap_or(CellValue::Empty))
                .collect();
            build_column(name, &cells)
        })
        .collect::<Vec<_>>();

    let mut frame = DataFrame::new(columns)?;
    tag_year(&mut frame, &year)?;

    debug!(
        file = %path.display(),
        year = %year,
        rows = frame.height(),
        columns = headers.len(),
        "read source file"
    );

    Ok(SourceSheet {
        year,
        headers,
        frame,
    })
}

/// Trim headers; blank headers become `Unnamed: <index>` and repeats get
/// `.1`, `.2`, ... suffixes.
pub fn clean_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 0usize;
        while seen.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

/// Add the year column at position 0. A file that already carries one keeps
/// its values, normalized to text, with blanks filled from the file name.
fn tag_year(frame: &mut DataFrame, year: &str) -> Result<()> {
    let height = frame.height();

    let existing: Option<Vec<String>> = frame.column(YEAR_COLUMN).ok().map(|column| {
        (0..height)
            .map(|i| match CellValue::from_column(column, i) {
                cell if cell.is_missing() => year.to_string(),
                cell => cell.raw_string().trim().to_string(),
            })
            .collect()
    });

    match existing {
        Some(values) => {
            frame.with_column(Column::new(YEAR_COLUMN.into(), values))?;
        }
        None => {
            let values = vec![year.to_string(); height];
            frame.insert_column(0, Column::new(YEAR_COLUMN.into(), values))?;
        }
    }
    Ok(())
}

fn read_workbook_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<CellValue>>)> {
    let spreadsheet_err = |message: String| ExplorerError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| spreadsheet_err(e.to_string()))?,
        None => return Err(spreadsheet_err("workbook has no sheets".to_string())),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();
    let body: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok((headers, body))
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::Float(v) if v.fract() == 0.0 => format!("{}", *v as i64),
        other => other.to_string(),
    }
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(s) => text_cell(s),
        Data::Bool(b) => CellValue::Text(if *b { "True" } else { "False" }.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

fn text_cell(s: &str) -> CellValue {
    if NA_MARKERS.contains(&s) {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}

fn read_csv_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<CellValue>>)> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows: Vec<Vec<CellValue>> = (0..df.height())
        .map(|i| {
            df.get_columns()
                .iter()
                .map(|col| match CellValue::from_column(col, i) {
                    CellValue::Text(s) => text_cell(&s),
                    cell => cell,
                })
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

/// Identity of a source directory's contents: every spreadsheet's name,
/// size and modification time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSignature {
    dir: PathBuf,
    files: Vec<(String, u64, Option<SystemTime>)>,
}

impl SourceSignature {
    pub fn of(dir: &Path) -> Result<Self> {
        let files = list_source_files(dir)?
            .into_iter()
            .map(|path| {
                let meta = fs::metadata(&path)?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                Ok((name, meta.len(), meta.modified().ok()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            dir: fs::canonicalize(dir)?,
            files,
        })
    }

    /// Canonical path of the source directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Memoized unified tables, one per source directory. A directory whose
/// files changed is reloaded and its previous table dropped.
#[derive(Default)]
pub struct DatasetCache {
    loader: DataLoader,
    entries: HashMap<PathBuf, (SourceSignature, Arc<UnifiedTable>)>,
}

impl DatasetCache {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Return the cached table for `dir`, loading it if the directory is new
    /// or any of its files changed.
    pub fn get_or_load(&mut self, dir: &Path) -> Result<Arc<UnifiedTable>> {
        let signature = SourceSignature::of(dir)?;
        if let Some((cached, table)) = self.entries.get(signature.dir()) {
            if *cached == signature {
                debug!(dir = %dir.display(), "unified table served from cache");
                return Ok(Arc::clone(table));
            }
            info!(dir = %dir.display(), "source files changed, reloading");
        }

        let table = Arc::new(self.loader.load_dir(dir)?);
        self.entries.insert(
            signature.dir().to_path_buf(),
            (signature, Arc::clone(&table)),
        );
        Ok(table)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
