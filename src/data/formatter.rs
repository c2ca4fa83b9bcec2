//! Display formatting of single cells, dispatched on the column header.
//!
//! Formatting never fails: anything that does not fit a rule is rendered
//! as its raw string.

use crate::data::cell::CellValue;

/// Text rendered for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formatted values treated as "nothing to show" in the vertical snapshot.
pub const UNINFORMATIVE: [&str; 4] = [NOT_AVAILABLE, "nan", "None", ""];

/// ZIP text that means "no ZIP" (compared trimmed and lowercased).
const ZIP_SENTINELS: [&str; 4] = ["0", "0.0", "nan", "none"];

/// Percentage text that means "no value" (compared lowercased).
const PERCENT_MISSING: [&str; 3] = ["nan", "none", "n/a"];

/// Formatting rule selected by header text. First match wins, in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Zip,
    CountyCode,
    Percentage,
    General,
}

impl ColumnKind {
    pub fn classify(header: &str) -> Self {
        let upper = header.to_uppercase();
        if upper.contains("ZIP") {
            ColumnKind::Zip
        } else if upper.contains("COUNTY CODE") {
            ColumnKind::CountyCode
        } else if upper.contains("PERCENTAGE") {
            ColumnKind::Percentage
        } else {
            ColumnKind::General
        }
    }
}

/// Format one cell for display according to its column.
pub fn format_cell(header: &str, value: &CellValue) -> String {
    match ColumnKind::classify(header) {
        ColumnKind::Zip => format_zip(value),
        ColumnKind::CountyCode => format_county_code(value),
        ColumnKind::Percentage => format_percentage(value),
        ColumnKind::General => format_number(value),
    }
}

/// Search/export formatting: ZIP and percentage columns are cleaned up,
/// every other column keeps its raw value.
pub fn format_for_export(header: &str, value: &CellValue) -> String {
    match ColumnKind::classify(header) {
        ColumnKind::Zip => format_zip(value),
        ColumnKind::Percentage => format_percentage(value),
        ColumnKind::CountyCode | ColumnKind::General => value.raw_string(),
    }
}

/// Five-digit, zero-padded ZIP. Zero, blank and sentinel values render empty.
pub fn format_zip(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(v) if v.is_nan() || *v == 0.0 => String::new(),
        CellValue::Number(v) if v.is_finite() => format!("{:05}", v.trunc() as i64),
        CellValue::Number(v) => v.to_string(),
        CellValue::Text(s) => {
            let lowered = s.trim().to_lowercase();
            if lowered.is_empty() || ZIP_SENTINELS.contains(&lowered.as_str()) {
                return String::new();
            }
            match s.trim().parse::<f64>() {
                Ok(v) if v == 0.0 => String::new(),
                Ok(v) if v.is_finite() => format!("{:05}", v.trunc() as i64),
                _ => s.clone(),
            }
        }
    }
}

/// County code as a plain integer.
pub fn format_county_code(value: &CellValue) -> String {
    match value.parse_f64() {
        Some(v) if v.is_finite() => format!("{}", v.trunc() as i64),
        _ => match value {
            CellValue::Number(v) if v.is_nan() => String::new(),
            other => other.raw_string(),
        },
    }
}

/// Percentage normalization.
///
/// Values strictly between -1 and 1 (excluding 0) are read as fractions and
/// scaled by 100; anything else is taken as already being a percentage. So
/// `0.5` always means 50%, never 0.5%: the two are indistinguishable in the
/// source data.
pub fn format_percentage(value: &CellValue) -> String {
    if value.is_missing() {
        return NOT_AVAILABLE.to_string();
    }
    if let CellValue::Text(s) = value {
        if PERCENT_MISSING.contains(&s.to_lowercase().as_str()) {
            return NOT_AVAILABLE.to_string();
        }
        if s.contains('%') {
            return s.clone();
        }
    }

    let Some(num) = value.parse_f64() else {
        return value.raw_string();
    };
    if num.is_nan() {
        return NOT_AVAILABLE.to_string();
    }
    if num == 0.0 {
        return "0%".to_string();
    }

    let pct = if num.abs() > 0.0 && num.abs() < 1.0 {
        num * 100.0
    } else {
        num
    };

    // Rounding to 4 places absorbs float noise such as 5.000000000000001.
    let rounded = (pct * 10_000.0).round() / 10_000.0;
    if rounded.is_finite() && rounded.fract() == 0.0 {
        format!("{}%", pct.round() as i64)
    } else {
        format!("{pct:.2}%")
    }
}

/// Thousands-separated number with no decimals; `N/A` for missing values.
pub fn format_number(value: &CellValue) -> String {
    match value {
        CellValue::Empty => NOT_AVAILABLE.to_string(),
        CellValue::Number(v) => format_grouped(*v),
        CellValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) => format_grouped(v),
            Err(_) => s.clone(),
        },
    }
}

/// `12345.6` -> `12,346`.
pub fn format_grouped(v: f64) -> String {
    if v.is_nan() {
        return NOT_AVAILABLE.to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let plain = format!("{v:.0}");
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

/// True when a formatted value carries no information.
pub fn is_uninformative(formatted: &str) -> bool {
    UNINFORMATIVE.contains(&formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(ColumnKind::classify("Zip Code"), ColumnKind::Zip);
        assert_eq!(ColumnKind::classify("county code"), ColumnKind::CountyCode);
        assert_eq!(ColumnKind::classify("ZIP County Code"), ColumnKind::Zip);
        assert_eq!(
            ColumnKind::classify("Ebook Circulation Percentage"),
            ColumnKind::Percentage
        );
        assert_eq!(ColumnKind::classify("Circulation"), ColumnKind::General);
    }

    #[test]
    fn test_zip_pads_to_five_digits() {
        for v in [8608.0, 7102.9, 12345.0, 501.0] {
            let expected = format!("{:0>5}", (v as i64).to_string());
            assert_eq!(format_zip(&num(v)), expected);
            assert_eq!(format_cell("Mailing ZIP", &num(v)), expected);
        }
        assert_eq!(format_zip(&text("07001")), "07001");
        assert_eq!(format_zip(&text("8608.0")), "08608");
    }

    #[test]
    fn test_zip_blank_for_zero_and_sentinels() {
        assert_eq!(format_zip(&num(0.0)), "");
        assert_eq!(format_zip(&CellValue::Empty), "");
        assert_eq!(format_zip(&num(f64::NAN)), "");
        for s in ["0", "0.0", "nan", "None", " NaN "] {
            assert_eq!(format_zip(&text(s)), "", "sentinel {s:?}");
        }
        assert_eq!(format_zip(&text("Unavailable")), "Unavailable");
    }

    #[test]
    fn test_county_code_is_unpadded_integer() {
        assert_eq!(format_county_code(&num(7.0)), "7");
        assert_eq!(format_county_code(&text("11.0")), "11");
        assert_eq!(format_county_code(&text("Various")), "Various");
        assert_eq!(format_county_code(&CellValue::Empty), "");
    }

    #[test]
    fn test_percentage_examples() {
        assert_eq!(format_percentage(&num(0.05)), "5%");
        assert_eq!(format_percentage(&num(5.0)), "5%");
        assert_eq!(format_percentage(&num(0.0567)), "5.67%");
        assert_eq!(format_percentage(&num(0.0)), "0%");
        assert_eq!(format_percentage(&CellValue::Empty), "N/A");
        assert_eq!(format_percentage(&text("Unavailable")), "Unavailable");
        assert_eq!(format_percentage(&num(12.5)), "12.50%");
        assert_eq!(format_percentage(&num(-0.25)), "-25%");
    }

    #[test]
    fn test_percentage_passes_through_formatted_text() {
        assert_eq!(format_percentage(&text("42%")), "42%");
        assert_eq!(format_percentage(&text("4.2 %")), "4.2 %");
        assert_eq!(format_percentage(&text("0.25")), "25%");
    }

    #[test]
    fn test_percentage_missing_markers() {
        for s in ["nan", "None", "N/A", "n/a"] {
            assert_eq!(format_percentage(&text(s)), "N/A", "marker {s:?}");
        }
        assert_eq!(format_percentage(&num(f64::NAN)), "N/A");
    }

    #[test]
    fn test_percentage_boundary_is_ambiguous() {
        // A true 0.5% stored as 0.5 reads as a fraction: known limitation.
        assert_eq!(format_percentage(&num(0.5)), "50%");
        // 1 is not strictly below 1, so it is already a percentage.
        assert_eq!(format_percentage(&num(1.0)), "1%");
    }

    #[test]
    fn test_number_grouping() {
        assert_eq!(format_number(&num(12345.0)), "12,345");
        assert_eq!(format_number(&num(1234567.0)), "1,234,567");
        assert_eq!(format_number(&num(999.0)), "999");
        assert_eq!(format_number(&num(-45210.0)), "-45,210");
        assert_eq!(format_number(&num(12.7)), "13");
        assert_eq!(format_number(&text("12345")), "12,345");
        assert_eq!(format_number(&CellValue::Empty), "N/A");
        assert_eq!(format_number(&num(f64::NAN)), "N/A");
        assert_eq!(format_number(&text("Trenton")), "Trenton");
    }

    #[test]
    fn test_export_formatting_keeps_other_columns_raw() {
        assert_eq!(format_for_export("Zip Code", &num(7102.0)), "07102");
        assert_eq!(format_for_export("Ebook Percentage", &num(0.1)), "10%");
        assert_eq!(format_for_export("Circulation", &num(12345.0)), "12345");
        assert_eq!(format_for_export("County Code", &num(7.0)), "7");
    }

    #[test]
    fn test_uninformative_values() {
        for v in ["N/A", "nan", "None", ""] {
            assert!(is_uninformative(v));
        }
        assert!(!is_uninformative("0"));
    }
}
