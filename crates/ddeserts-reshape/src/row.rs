//! Raw input rows

use std::collections::HashMap;

/// Census marker for a controlled value: the estimate is exact, so its
/// margin of error is zero
const CONTROLLED: &str = "*****";

/// One row as read from the source: field name to string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a census count or margin.
///
/// `*****` (controlled, exact) reads as 0; `null`, empty and non-numeric
/// values are absent. Thousands separators are accepted.
pub fn parse_count(value: &str) -> Option<f64> {
    let value = value.trim();
    match value {
        "" | "null" => None,
        CONTROLLED => Some(0.0),
        _ => value
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1234"), Some(1234.0));
        assert_eq!(parse_count(" 1,234 "), Some(1234.0));
        assert_eq!(parse_count("12.5"), Some(12.5));
        assert_eq!(parse_count("*****"), Some(0.0));
        assert_eq!(parse_count("null"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("Total"), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("inf"), None);
    }

    #[test]
    fn test_row_from_pairs() {
        let row: RawRow = [("geoid", "A"), ("tot_est", "100")].into_iter().collect();
        assert_eq!(row.get("geoid"), Some("A"));
        assert_eq!(row.get("tot_moe"), None);
        assert_eq!(row.len(), 2);
    }
}
