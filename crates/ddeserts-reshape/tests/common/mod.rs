//! Common test utilities for ddeserts-reshape tests

use ddeserts_core::{BreakdownTable, CensusConfig};
use ddeserts_reshape::RawRow;

/// Build a raw row from `(field, value)` pairs
pub fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs.iter().copied().collect()
}

/// Row in the default CVAP layout
pub fn cvap_row(geoid: &str, label: &str, tot_est: &str) -> RawRow {
    row(&[
        ("geoid", geoid),
        ("geoname", "Somewhere city, California"),
        ("lntitle", label),
        ("lnnumber", "1"),
        ("tot_est", tot_est),
    ])
}

/// Default config with the breakdown table narrowed to Total and Black Alone
pub fn total_and_black_config() -> CensusConfig {
    let breakdowns = BreakdownTable::new()
        .with("Total", "")
        .unwrap()
        .with("Black Alone", "blk")
        .unwrap();
    CensusConfig {
        breakdowns,
        ..CensusConfig::default()
    }
}
