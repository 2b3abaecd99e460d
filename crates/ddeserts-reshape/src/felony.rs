//! Felony disenfranchisement estimates
//!
//! The Sentencing Project publishes, per state, the voting-eligible
//! population and how many people a felony conviction keeps from voting, in
//! prison and in total. Each row converts into one state record with the
//! columns [`VEP_COLUMN`], [`PRISON_COLUMN`] and [`DISENFRANCHISED_COLUMN`].
//!
//! The spreadsheets behind these files wrap long headers, so a header can
//! arrive as `"VOTING\r\nELIGIBLE POPULATION"`; headers are matched with their
//! whitespace collapsed. A blank cell means zero.

use crate::error::{Error, Result};
use crate::row::{parse_count, RawRow};
use ddeserts_core::{GeoType, Geography, Record};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Voting-eligible population (citizens of voting age, from the ACS)
pub const VEP_COLUMN: &str = "vep_est";
/// People disenfranchised while in prison
pub const PRISON_COLUMN: &str = "felon_prison_est";
/// People disenfranchised by a felony conviction, in prison or not
pub const DISENFRANCHISED_COLUMN: &str = "felon_disf_est";

/// Header names of a felony disenfranchisement table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FelonyLayout {
    pub state_field: String,
    pub vep_field: String,
    pub prison_field: String,
    pub total_field: String,
}

impl Default for FelonyLayout {
    fn default() -> Self {
        Self {
            state_field: "STATE".to_string(),
            vep_field: "VOTING ELIGIBLE POPULATION".to_string(),
            prison_field: "PRISON".to_string(),
            total_field: "TOTAL".to_string(),
        }
    }
}

/// Parse a count cell: blank is zero, otherwise as [`parse_count`]
pub fn parse_felony_count(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        Some(0.0)
    } else {
        parse_count(value)
    }
}

fn normalize_header(field: &str) -> String {
    field.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts felony disenfranchisement rows into state records
#[derive(Debug, Clone, Default)]
pub struct FelonyConverter {
    layout: FelonyLayout,
}

impl FelonyConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: FelonyLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Convert one row; a missing header is structural, an unreadable count
    /// is left absent
    pub fn convert(&self, row: &RawRow, index: usize) -> Result<Record> {
        let fields: HashMap<String, &str> = row
            .iter()
            .map(|(field, value)| (normalize_header(field), value))
            .collect();
        let field = |name: &str| {
            fields
                .get(name)
                .copied()
                .ok_or_else(|| Error::missing_field(name, index))
        };

        let state = field(self.layout.state_field.as_str())?.trim();
        let mut record = Record::new(state, state).with_geography(Geography {
            name: state.to_string(),
            state: state.to_string(),
            kind: GeoType::State,
        });

        for (name, column) in [
            (&self.layout.vep_field, VEP_COLUMN),
            (&self.layout.prison_field, PRISON_COLUMN),
            (&self.layout.total_field, DISENFRANCHISED_COLUMN),
        ] {
            let value = field(name.as_str())?;
            match parse_felony_count(value) {
                Some(count) => record.insert(column, count),
                None => warn!(state, field = %name, value, row = index, "unreadable count"),
            }
        }
        Ok(record)
    }

    /// Convert every row, in order
    pub fn convert_all<I>(&self, rows: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| self.convert(&row, index))
            .collect::<Result<Vec<_>>>()?;
        debug!(records = records.len(), "converted felony disenfranchisement rows");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alabama() -> RawRow {
        [
            ("STATE", "Alabama "),
            ("VOTING\r\nELIGIBLE POPULATION", "3,706,000"),
            ("PRISON", ""),
            ("TOTAL", "328198.5"),
            ("% DISF.", "8.94"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_felony_count() {
        assert_eq!(parse_felony_count(""), Some(0.0));
        assert_eq!(parse_felony_count("  "), Some(0.0));
        assert_eq!(parse_felony_count("1,234"), Some(1234.0));
        assert_eq!(parse_felony_count("12.5"), Some(12.5));
        assert_eq!(parse_felony_count("n/a"), None);
    }

    #[test]
    fn test_convert_row() {
        let record = FelonyConverter::new().convert(&alabama(), 0).unwrap();
        assert_eq!(record.geo_id, "Alabama");
        assert_eq!(record.geography.kind, GeoType::State);
        assert_eq!(record.geography.state, "Alabama");
        assert_eq!(record.value(VEP_COLUMN), Some(3_706_000.0));
        assert_eq!(record.value(PRISON_COLUMN), Some(0.0));
        assert_eq!(record.value(DISENFRANCHISED_COLUMN), Some(328_198.5));
        // the published percentage is not carried over
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_unreadable_count_is_absent() {
        let mut row = alabama();
        row.insert("PRISON", "--");
        let record = FelonyConverter::new().convert(&row, 0).unwrap();
        assert_eq!(record.value(PRISON_COLUMN), None);
        assert_eq!(record.value(DISENFRANCHISED_COLUMN), Some(328_198.5));
    }

    #[test]
    fn test_missing_header_is_structural() {
        let row: RawRow = [("STATE", "Alabama"), ("PRISON", "1")].into_iter().collect();
        let err = FelonyConverter::new().convert(&row, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(ddeserts_core::Error::MissingField { ref field, row: 3 })
                if field == "VOTING ELIGIBLE POPULATION"
        ));
    }
}
