//! Table to DataFrame conversion and reporting helpers

use crate::{Error, Result};
use ddeserts_core::{Record, Stat, Table};
use polars::prelude::*;
use std::collections::HashSet;

/// Geography columns leading every exported frame, in order
pub const GEO_COLUMNS: [&str; 5] = ["geoid", "geoname", "name", "state", "geotype"];

fn text_column<F>(name: &str, records: &[Record], f: F) -> Column
where
    F: Fn(&Record) -> String,
{
    let values: Vec<String> = records.iter().map(f).collect();
    Series::new(name.into(), values).into()
}

/// Export of a [`Table`] to Polars
pub trait TableFrameExt {
    /// One row per record: the [`GEO_COLUMNS`], then every statistic column
    /// in the order it was added. Values a record lacks become nulls.
    fn to_dataframe(&self) -> Result<DataFrame>;
}

impl TableFrameExt for Table {
    fn to_dataframe(&self) -> Result<DataFrame> {
        let records = self.records();
        let mut columns: Vec<Column> = vec![
            text_column("geoid", records, |r| r.geo_id.clone()),
            text_column("geoname", records, |r| r.geoname.clone()),
            text_column("name", records, |r| r.geography.name.clone()),
            text_column("state", records, |r| r.geography.state.clone()),
            text_column("geotype", records, |r| r.geography.kind.to_string()),
        ];

        for name in self.columns() {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.value(name)).collect();
            columns.push(Series::new(name.as_str().into(), values).into());
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Reporting operations on an exported frame
pub trait StatFrameExt {
    /// Geography columns plus the estimate/margin pair of each statistic
    fn select_stats(&self, stats: &[Stat]) -> Result<DataFrame>;

    /// Add a boolean column that is true where the geography's plain name is
    /// one of `names`
    fn with_name_flag(&self, flag_column: &str, names: &[&str]) -> Result<DataFrame>;
}

impl StatFrameExt for DataFrame {
    fn select_stats(&self, stats: &[Stat]) -> Result<DataFrame> {
        let mut selection: Vec<String> = GEO_COLUMNS.iter().map(|c| c.to_string()).collect();
        for stat in stats {
            let cols = stat.columns();
            for name in [cols.est, cols.moe] {
                self.column(&name)
                    .map_err(|_| Error::InvalidColumn(name.clone()))?;
                selection.push(name);
            }
        }
        Ok(self.select(selection)?)
    }

    fn with_name_flag(&self, flag_column: &str, names: &[&str]) -> Result<DataFrame> {
        let column = self
            .column("name")
            .map_err(|_| Error::InvalidColumn("name".to_string()))?;
        let plain = column.str().map_err(|_| Error::TypeMismatch {
            expected: "string".to_string(),
            got: format!("{:?}", column.dtype()),
        })?;

        let wanted: HashSet<&str> = names.iter().copied().collect();
        let flags: Vec<bool> = plain
            .into_iter()
            .map(|name| name.is_some_and(|n| wanted.contains(n)))
            .collect();

        let mut df = self.clone();
        df.with_column(Series::new(flag_column.into(), flags))?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddeserts_core::{Estimate, GeoType, Geography, Population};

    fn table() -> Table {
        let mut a = Record::new("A", "Oakland city, California").with_geography(Geography {
            name: "Oakland".to_string(),
            state: "California".to_string(),
            kind: GeoType::City,
        });
        a.set(&Stat::total(Population::Tot), Estimate::new(100.0, 2.0));
        let b = Record::new("B", "Nowhere");
        Table::from_records(vec![a, b])
    }

    #[test]
    fn test_geography_columns_lead() {
        let df = table().to_dataframe().unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names[..5], GEO_COLUMNS);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("geotype").unwrap().str().unwrap().get(0), Some("city"));
    }

    #[test]
    fn test_absent_value_is_null() {
        let df = table().to_dataframe().unwrap();
        let tot = df.column("tot_est").unwrap().f64().unwrap();
        assert_eq!(tot.get(0), Some(100.0));
        assert_eq!(tot.get(1), None);
    }
}
