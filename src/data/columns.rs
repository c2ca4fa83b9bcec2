//! Column role detection.
//!
//! Headers differ from year to year, so the library-name column and the
//! county column are found by header text. Each role is an ordered list of
//! rules; the first rule with a matching header wins.

/// Year tag column added to every source file.
pub const YEAR_COLUMN: &str = "Data_Year";

/// Literal header used by the state reports for the library name.
pub const KEY_COLUMN_LITERAL: &str = "Municipality/County";

/// One header-matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// Uppercased header contains the token.
    Contains(&'static str),
    /// Header equals the literal exactly.
    Exact(&'static str),
    /// Uppercased header contains `token` and none of `excluded`.
    ContainsExcluding {
        token: &'static str,
        excluded: &'static [&'static str],
    },
}

impl HeaderRule {
    pub fn matches(&self, header: &str) -> bool {
        let upper = header.to_uppercase();
        match self {
            HeaderRule::Contains(token) => upper.contains(token),
            HeaderRule::Exact(literal) => header == *literal,
            HeaderRule::ContainsExcluding { token, excluded } => {
                upper.contains(token) && !excluded.iter().any(|e| upper.contains(e))
            }
        }
    }
}

/// Library / municipality name column, in priority order.
pub const KEY_COLUMN_RULES: &[HeaderRule] = &[
    HeaderRule::Contains("MUNICIPALITY"),
    HeaderRule::Exact(KEY_COLUMN_LITERAL),
    HeaderRule::Contains("LIBRARY"),
];

/// County name column (never the county code or the municipality column).
pub const COUNTY_COLUMN_RULES: &[HeaderRule] = &[HeaderRule::ContainsExcluding {
    token: "COUNTY",
    excluded: &["CODE", "MUNICIPAL"],
}];

/// First header matched by the earliest rule, scanning headers in order.
pub fn first_match<'a>(headers: &'a [String], rules: &[HeaderRule]) -> Option<&'a str> {
    rules.iter().find_map(|rule| {
        headers
            .iter()
            .find(|h| h.as_str() != YEAR_COLUMN && rule.matches(h))
            .map(String::as_str)
    })
}

/// Key column; falls back to the first non-year column, then to the year
/// column itself for a table with nothing else in it.
pub fn detect_key_column(headers: &[String]) -> Option<&str> {
    first_match(headers, KEY_COLUMN_RULES).or_else(|| {
        headers
            .iter()
            .find(|h| h.as_str() != YEAR_COLUMN)
            .or_else(|| headers.first())
            .map(String::as_str)
    })
}

pub fn detect_county_column(headers: &[String]) -> Option<&str> {
    first_match(headers, COUNTY_COLUMN_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_key_prefers_municipality_token() {
        let h = headers(&["Data_Year", "Library Name", "MUNICIPALITY/COUNTY", "County"]);
        assert_eq!(detect_key_column(&h), Some("MUNICIPALITY/COUNTY"));
    }

    #[test]
    fn test_key_falls_back_to_library_token() {
        let h = headers(&["Data_Year", "ID", "Public Library", "County"]);
        assert_eq!(detect_key_column(&h), Some("Public Library"));
    }

    #[test]
    fn test_key_falls_back_to_first_non_year_column() {
        let h = headers(&["Data_Year", "Registered Users", "Circulation"]);
        assert_eq!(detect_key_column(&h), Some("Registered Users"));
        assert_eq!(detect_key_column(&headers(&["Data_Year"])), Some("Data_Year"));
        assert_eq!(detect_key_column(&[]), None);
    }

    #[test]
    fn test_county_skips_code_and_municipality() {
        let h = headers(&["Municipality/County", "County Code", "County"]);
        assert_eq!(detect_county_column(&h), Some("County"));
        assert_eq!(detect_county_column(&headers(&["County Code"])), None);
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        let h = headers(&["municipality", "county name"]);
        assert_eq!(detect_key_column(&h), Some("municipality"));
        assert_eq!(detect_county_column(&h), Some("county name"));
    }
}
