//! Geography records and the table they form
//!
//! A [`Record`] is one geography with an open-ended set of numeric columns; a
//! [`Table`] owns the records plus the ordered registry of columns that have
//! been added. Columns are added to every record at once, so a column present
//! in the registry is present for the whole table, even if individual
//! records hold no value for it (read back as NaN).

use crate::error::{Error, Result};
use crate::key::{ColumnKey, Stat, StatColumns};
use crate::moe::Estimate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Geography classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoType {
    State,
    County,
    City,
    Town,
    Village,
    Borough,
    Cdp,
    /// Not stated in the display name
    Unknown,
    /// Any other census geography type, lowercased
    Other(String),
}

impl GeoType {
    /// Classify a census type word ("County", "city", "CDP", ...)
    pub fn from_census(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "" => GeoType::Unknown,
            "state" => GeoType::State,
            "county" => GeoType::County,
            "city" => GeoType::City,
            "town" => GeoType::Town,
            "village" => GeoType::Village,
            "borough" => GeoType::Borough,
            "cdp" => GeoType::Cdp,
            other => GeoType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GeoType::State => "state",
            GeoType::County => "county",
            GeoType::City => "city",
            GeoType::Town => "town",
            GeoType::Village => "village",
            GeoType::Borough => "borough",
            GeoType::Cdp => "cdp",
            GeoType::Unknown => "",
            GeoType::Other(other) => other,
        }
    }
}

impl fmt::Display for GeoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed geography display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geography {
    /// Plain name, e.g. "Ventura" for "San Buenaventura (Ventura) city, California"
    pub name: String,
    /// Containing state
    pub state: String,
    pub kind: GeoType,
}

impl Geography {
    /// Geography known only by its display name
    pub fn unparsed(display_name: &str) -> Self {
        Self {
            name: display_name.to_string(),
            state: String::new(),
            kind: GeoType::Unknown,
        }
    }
}

/// One row of the table: one geography
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Opaque identifier used for grouping raw rows
    pub geo_id: String,
    /// Display name as given by the source
    pub geoname: String,
    pub geography: Geography,
    values: HashMap<String, f64>,
}

impl Record {
    pub fn new(geo_id: impl Into<String>, geoname: impl Into<String>) -> Self {
        let geoname = geoname.into();
        Self {
            geo_id: geo_id.into(),
            geography: Geography::unparsed(&geoname),
            geoname,
            values: HashMap::new(),
        }
    }

    pub fn with_geography(mut self, geography: Geography) -> Self {
        self.geography = geography;
        self
    }

    /// Value of a raw column, if this record has one
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn get(&self, key: &ColumnKey) -> Option<f64> {
        self.value(&key.name())
    }

    /// Set a raw column, replacing any earlier value
    pub fn insert(&mut self, column: impl Into<String>, value: f64) {
        self.values.insert(column.into(), value);
    }

    /// Read an estimate/margin pair; absent halves come back as NaN
    pub fn pair(&self, columns: &StatColumns) -> Estimate {
        Estimate {
            est: self.value(&columns.est).unwrap_or(f64::NAN),
            moe: self.value(&columns.moe).unwrap_or(f64::NAN),
        }
    }

    /// Read a statistic; absent halves come back as NaN
    pub fn estimate(&self, stat: &Stat) -> Estimate {
        self.pair(&stat.columns())
    }

    /// Store an estimate/margin pair under a statistic
    pub fn set(&mut self, stat: &Stat, value: Estimate) {
        self.set_pair(&stat.columns(), value);
    }

    pub fn set_pair(&mut self, columns: &StatColumns, value: Estimate) {
        self.values.insert(columns.est.clone(), value.est);
        self.values.insert(columns.moe.clone(), value.moe);
    }

    fn remove_pair(&mut self, columns: &StatColumns) {
        self.values.remove(&columns.est);
        self.values.remove(&columns.moe);
    }

    /// Raw column names held by this record (unordered)
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered collection of records with a registry of table-wide columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
    columns: Vec<String>,
}

impl Table {
    /// Build a table; the column registry is the union of the records'
    /// columns, in first-seen order (sorted within each record, since record
    /// storage is unordered)
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in &records {
            let mut names: Vec<&str> = record.column_names().collect();
            names.sort_unstable();
            for name in names {
                if seen.insert(name.to_string()) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { records, columns }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Registered column names, in the order they were added
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// True if both halves of the statistic's pair are registered
    pub fn has_stat(&self, stat: &Stat) -> bool {
        let cols = stat.columns();
        self.has_column(&cols.est) && self.has_column(&cols.moe)
    }

    /// Fail with [`Error::MissingColumn`] unless the statistic is present
    pub fn require(&self, stage: &'static str, stat: &Stat) -> Result<()> {
        let cols = stat.columns();
        for name in [cols.est, cols.moe] {
            if !self.has_column(&name) {
                return Err(Error::missing_column(stage, name));
            }
        }
        Ok(())
    }

    /// Compute a statistic for every record and register its columns.
    ///
    /// Overwrites values if the statistic already exists, so re-running a
    /// computation over unchanged inputs reproduces the same table.
    pub fn add_stat<F>(&mut self, stat: &Stat, compute: F)
    where
        F: Fn(&Record) -> Estimate + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        let values: Vec<Estimate> = self.records.par_iter().map(&compute).collect();
        #[cfg(not(feature = "parallel"))]
        let values: Vec<Estimate> = self.records.iter().map(&compute).collect();

        let cols = stat.columns();
        for (record, value) in self.records.iter_mut().zip(values) {
            record.set_pair(&cols, value);
        }
        self.register(cols.est);
        self.register(cols.moe);
    }

    /// Remove a statistic from every record and from the registry
    pub fn drop_stat(&mut self, stat: &Stat) {
        let cols = stat.columns();
        trace!(column = %cols.est, records = self.records.len(), "dropping statistic");
        for record in &mut self.records {
            record.remove_pair(&cols);
        }
        self.columns.retain(|c| *c != cols.est && *c != cols.moe);
    }

    fn register(&mut self, name: String) {
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
