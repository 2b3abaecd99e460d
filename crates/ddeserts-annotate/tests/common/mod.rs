//! Common test utilities for ddeserts-annotate tests

#![allow(dead_code)]

use ddeserts_core::{CensusConfig, Estimate, Population, Race, Record, Stat, Table};

/// Margin given to every synthetic race count
pub const RACE_MOE: f64 = 5.0;
/// Margin given to every synthetic subgroup total
pub const TOTAL_MOE: f64 = 10.0;

pub fn race(code: &str) -> Race {
    Race::new(code).unwrap()
}

/// Set `[tot, adu, cit, cvap]` counts for one race (or all races)
pub fn set_counts(record: &mut Record, race: Option<&Race>, counts: [f64; 4], moe: f64) {
    for (pop, est) in Population::BASE.into_iter().zip(counts) {
        record.set(&Stat::count_for(race, pop), Estimate::new(est, moe));
    }
}

/// A geography with the given totals where every breakdown race of the
/// config has the same counts
pub fn even_geography(
    geo_id: &str,
    config: &CensusConfig,
    totals: [f64; 4],
    per_race: [f64; 4],
) -> Record {
    let mut record = Record::new(geo_id, format!("{geo_id} city, California"));
    set_counts(&mut record, None, totals, TOTAL_MOE);
    for race in config.breakdowns.races() {
        set_counts(&mut record, Some(race), per_race, RACE_MOE);
    }
    record
}

/// A geography with the given totals and no members of any breakdown race
pub fn empty_geography(geo_id: &str, config: &CensusConfig, totals: [f64; 4]) -> Record {
    even_geography(geo_id, config, totals, [0.0; 4])
}

/// Small table of plausible geographies
pub fn sample_table(config: &CensusConfig) -> Table {
    Table::from_records(vec![
        even_geography("A", config, [1000.0, 800.0, 700.0, 600.0], [40.0, 30.0, 25.0, 20.0]),
        even_geography("B", config, [500.0, 400.0, 300.0, 250.0], [30.0, 25.0, 15.0, 12.0]),
        even_geography("C", config, [200.0, 150.0, 140.0, 120.0], [10.0, 8.0, 8.0, 8.0]),
    ])
}
