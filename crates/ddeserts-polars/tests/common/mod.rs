//! Common test utilities for ddeserts-polars tests

use ddeserts_core::{Estimate, GeoType, Geography, Population, Record, Stat, Table};
use polars::prelude::*;

pub fn city(geo_id: &str, name: &str, cvap: f64) -> Record {
    let mut record = Record::new(geo_id, format!("{name} city, California")).with_geography(
        Geography {
            name: name.to_string(),
            state: "California".to_string(),
            kind: GeoType::City,
        },
    );
    record.set(&Stat::total(Population::Cvap), Estimate::new(cvap, cvap.sqrt()));
    record.set(&Stat::dvap_proportion(None), Estimate::new(0.25, 0.02));
    record
}

pub fn sample_table() -> Table {
    Table::from_records(vec![
        city("1600000US0653000", "Oakland", 300_000.0),
        city("1600000US0668000", "San Jose", 600_000.0),
        city("1600000US0664000", "Sacramento", 350_000.0),
    ])
}

/// Helper function to extract a single value from a DataFrame
pub fn extract_value(df: &DataFrame, col_name: &str, row: usize) -> Option<f64> {
    df.column(col_name).unwrap().f64().unwrap().get(row)
}
