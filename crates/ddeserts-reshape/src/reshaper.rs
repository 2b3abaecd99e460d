//! Row reshaping: narrow per-breakdown rows into wide per-geography records
//!
//! Source tables carry one row per (geography, race/ethnicity breakdown).
//! The reshaper walks the rows in order and merges each run of rows sharing a
//! geography identifier into one [`Record`], prefixing every numeric field
//! with the breakdown's race code (`tot_est` on the "Black or African American
//! Alone" row becomes `blk_tot_est`; on the "Total" row it stays `tot_est`).
//!
//! Grouping is a scan, not a partition: rows for one geography must be
//! contiguous, as they are in census files. A geography that shows up again
//! after another one started produces a second record.

use crate::error::{Error, Result};
use crate::geoname::{CensusGeoNames, GeoNameParser};
use crate::row::{parse_count, RawRow};
use ddeserts_core::{BreakdownTable, CensusConfig, Record, RowLayout, Table};
use std::collections::HashSet;
use tracing::{debug, instrument, trace, warn};

static CENSUS_GEONAMES: CensusGeoNames = CensusGeoNames;

/// Merges contiguous raw rows into one record per geography
pub struct Reshaper<'a> {
    breakdowns: &'a BreakdownTable,
    layout: &'a RowLayout,
    geonames: &'a dyn GeoNameParser,
}

impl<'a> Reshaper<'a> {
    /// Reshaper using the config's breakdown labels and row layout, and the
    /// census display-name rules
    pub fn new(config: &'a CensusConfig) -> Self {
        Self {
            breakdowns: &config.breakdowns,
            layout: &config.layout,
            geonames: &CENSUS_GEONAMES,
        }
    }

    /// Use a different display-name parser
    pub fn with_geonames(mut self, parser: &'a dyn GeoNameParser) -> Self {
        self.geonames = parser;
        self
    }

    /// Merge rows into records, one per contiguous run of a geography id.
    ///
    /// Rows whose breakdown label is not in the lookup table contribute
    /// nothing. A breakdown repeated within one geography overwrites the
    /// earlier values.
    #[instrument(skip_all)]
    pub fn reshape<I>(&self, rows: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut records = Vec::new();
        let mut current: Option<Record> = None;
        let mut closed: HashSet<String> = HashSet::new();
        let mut n_rows = 0usize;

        for (index, row) in rows.into_iter().enumerate() {
            n_rows += 1;
            let geo_id = row
                .get(&self.layout.id_field)
                .ok_or_else(|| Error::missing_field(&self.layout.id_field, index))?;

            let starts_group = current.as_ref().map_or(true, |r| r.geo_id != geo_id);
            if starts_group {
                if let Some(done) = current.take() {
                    closed.insert(done.geo_id.clone());
                    records.push(done);
                }
                if closed.contains(geo_id) {
                    warn!(
                        geo_id,
                        row = index,
                        "rows for a geography are not contiguous; emitting a second record"
                    );
                }
                current = Some(self.start_record(geo_id, &row, index)?);
            }

            if let Some(record) = current.as_mut() {
                self.merge_row(record, &row, index)?;
            }
        }

        if let Some(done) = current.take() {
            records.push(done);
        }

        debug!(rows = n_rows, records = records.len(), "reshaped rows");
        Ok(records)
    }

    /// Reshape straight into a [`Table`]
    pub fn reshape_table<I>(&self, rows: I) -> Result<Table>
    where
        I: IntoIterator<Item = RawRow>,
    {
        Ok(Table::from_records(self.reshape(rows)?))
    }

    fn start_record(&self, geo_id: &str, row: &RawRow, index: usize) -> Result<Record> {
        let geoname = row
            .get(&self.layout.name_field)
            .ok_or_else(|| Error::missing_field(&self.layout.name_field, index))?;
        let geography = self.geonames.parse(geoname);
        Ok(Record::new(geo_id, geoname).with_geography(geography))
    }

    fn merge_row(&self, record: &mut Record, row: &RawRow, index: usize) -> Result<()> {
        let label = row
            .get(&self.layout.breakdown_field)
            .ok_or_else(|| Error::missing_field(&self.layout.breakdown_field, index))?;

        let Some(breakdown) = self.breakdowns.get(label) else {
            trace!(label, row = index, "skipping breakdown not in lookup table");
            return Ok(());
        };

        let prefix = breakdown.prefix();
        for (field, value) in row.iter() {
            if self.layout.is_identifying(field) {
                continue;
            }
            if let Some(value) = parse_count(value) {
                record.insert(format!("{prefix}{field}"), value);
            }
        }
        Ok(())
    }
}
