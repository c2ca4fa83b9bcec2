//! Scalar cell values read out of the unified table.

use polars::prelude::*;

/// One cell of the unified table, independent of the column dtype it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Null, or a column missing for this row's year.
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Read row `idx` of a column. Out-of-range rows read as `Empty`.
    pub fn from_column(column: &Column, idx: usize) -> Self {
        match column.get(idx) {
            Ok(value) => Self::from_any(&value),
            Err(_) => CellValue::Empty,
        }
    }

    pub fn from_any(value: &AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => CellValue::Empty,
            AnyValue::Float64(v) => CellValue::Number(*v),
            AnyValue::Float32(v) => CellValue::Number(f64::from(*v)),
            AnyValue::Int64(v) => CellValue::Number(*v as f64),
            AnyValue::Int32(v) => CellValue::Number(f64::from(*v)),
            AnyValue::Int16(v) => CellValue::Number(f64::from(*v)),
            AnyValue::Int8(v) => CellValue::Number(f64::from(*v)),
            AnyValue::UInt64(v) => CellValue::Number(*v as f64),
            AnyValue::UInt32(v) => CellValue::Number(f64::from(*v)),
            AnyValue::UInt16(v) => CellValue::Number(f64::from(*v)),
            AnyValue::UInt8(v) => CellValue::Number(f64::from(*v)),
            AnyValue::String(s) => CellValue::Text((*s).to_string()),
            AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
            AnyValue::Boolean(b) => CellValue::Text(if *b { "True" } else { "False" }.to_string()),
            other => CellValue::Text(other.to_string().trim_matches('"').to_string()),
        }
    }

    /// A missing value: null, or a floating-point NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(v) => v.is_nan(),
            CellValue::Text(_) => false,
        }
    }

    /// Parse as a float the way a lenient `float(x)` would: numbers as-is,
    /// text trimmed then parsed. NaN text parses to NaN.
    pub fn parse_f64(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Numeric coercion: unparseable and NaN values become `None`.
    pub fn to_numeric(&self) -> Option<f64> {
        self.parse_f64().filter(|v| !v.is_nan())
    }

    /// Plain string rendering used where no display rule applies.
    /// Whole numbers drop their fractional part; empty cells render empty.
    pub fn raw_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(v) if v.is_nan() => String::new(),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", *v as i64)
            }
            CellValue::Number(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// String coercion of an object column: nulls read `nan`, floats keep
    /// their decimal point (`1.0`), text is taken verbatim.
    pub fn coerced_string(&self) -> String {
        match self {
            CellValue::Empty => "nan".to_string(),
            CellValue::Number(v) if v.is_nan() => "nan".to_string(),
            CellValue::Number(v) => format!("{v:?}"),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}
