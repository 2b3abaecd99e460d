//! ACS table B05003 (Sex by Age by Nativity and Citizenship Status)
//!
//! B05003 reports one row per geography with wide `!!`-separated headers such
//! as `Estimate!!Total:!!Male:!!18 years and over:!!Foreign born:!!Naturalized U.S. citizen`.
//! It has no race breakdowns, so instead of reshaping, each row converts into
//! one all-races record with `tot`, `adu`, `cit` and `cvap` pairs. Adults,
//! citizens and CVAP are split by sex (and citizens by nativity) in the
//! source, so their estimates are summed and their margins combined with
//! [`moe_of_sum`].

use crate::error::{Error, Result};
use crate::geoname::GeoNameParser;
use crate::row::{parse_count, RawRow};
use ddeserts_core::{moe_of_sum, Estimate, Population, Record, Stat};
use tracing::debug;

const ADULT: &str = "18 years and over";
const NATIVE: &str = "Native";
const NATURALIZED: &str = "Naturalized U.S. citizen";

/// Field names of a B05003 download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B05003Layout {
    pub id_field: String,
    pub name_field: String,
}

impl Default for B05003Layout {
    fn default() -> Self {
        Self {
            id_field: "Geography".to_string(),
            name_field: "Geographic Area Name".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataType {
    Estimate,
    Margin,
}

/// Estimates and margins collected for one population
#[derive(Debug, Default)]
struct Components {
    ests: Vec<f64>,
    moes: Vec<f64>,
}

impl Components {
    fn push(&mut self, data_type: DataType, value: f64) {
        match data_type {
            DataType::Estimate => self.ests.push(value),
            DataType::Margin => self.moes.push(value),
        }
    }

    fn combine(&self) -> Estimate {
        Estimate::new(self.ests.iter().sum(), moe_of_sum(self.moes.iter().copied()))
    }
}

/// Converts B05003 rows into all-races records
pub struct B05003Converter<'a> {
    layout: B05003Layout,
    geonames: &'a dyn GeoNameParser,
}

impl<'a> B05003Converter<'a> {
    pub fn new(geonames: &'a dyn GeoNameParser) -> Self {
        Self {
            layout: B05003Layout::default(),
            geonames,
        }
    }

    pub fn with_layout(mut self, layout: B05003Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Convert one row; the geography id falls back to the display name
    pub fn convert(&self, row: &RawRow, index: usize) -> Result<Record> {
        let geoname = row
            .get(&self.layout.name_field)
            .ok_or_else(|| Error::missing_field(&self.layout.name_field, index))?;
        let geo_id = row.get(&self.layout.id_field).unwrap_or(geoname);

        let mut tot = Components::default();
        let mut adu = Components::default();
        let mut cit = Components::default();
        let mut cvap = Components::default();

        for (field, value) in row.iter() {
            let Some(value) = parse_count(value) else {
                continue;
            };

            let mut parts: Vec<&str> = field.split("!!").map(|p| p.trim_end_matches(':')).collect();
            if parts.len() < 2 || parts.len() > 6 {
                continue;
            }
            parts.resize(6, "");

            let data_type = match parts[0] {
                "Estimate" => DataType::Estimate,
                "Margin of Error" => DataType::Margin,
                _ => continue,
            };
            let (sex, age, born, citizenship) = (parts[2], parts[3], parts[4], parts[5]);

            if sex.is_empty() {
                tot.push(data_type, value);
            } else if age == ADULT && born.is_empty() {
                adu.push(data_type, value);
            } else if born == NATIVE || citizenship == NATURALIZED {
                cit.push(data_type, value);
                if age == ADULT {
                    cvap.push(data_type, value);
                }
            }
        }

        let mut record = Record::new(geo_id, geoname).with_geography(self.geonames.parse(geoname));
        record.set(&Stat::total(Population::Tot), tot.combine());
        record.set(&Stat::total(Population::Adu), adu.combine());
        record.set(&Stat::total(Population::Cit), cit.combine());
        record.set(&Stat::total(Population::Cvap), cvap.combine());
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
        debug!(records = records.len(), "converted B05003 rows");
        Ok(records)
    }
}
