//! Disenfranchisement statistics for census survey tables
//!
//! Reads census CSV tables broken down by geography and race, merges them into
//! one record per geography, and derives DVAP counts, proportions, race shares
//! and representation disparities with margins of error propagated through
//! every step.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`ddeserts_core`]: MoE arithmetic, typed column keys, records and tables,
//!   configuration
//! - [`reshape`]: CSV row source, the row reshaper and the B05003 and
//!   felony-disenfranchisement converters
//! - [`annotate`]: the ordered annotation pipeline
//! - `frame` (feature `polars`): DataFrame export
//!
//! # Example
//!
//! ```rust,no_run
//! use ddeserts::prelude::*;
//!
//! let config = CensusConfig::default();
//! let (table, ctx) = ddeserts::annotate_csv("Place.csv", &config, &CsvOptions::new())?;
//! println!("{} places, {} columns added", table.len(), ctx.columns_added().len());
//! # Ok::<(), ddeserts::Error>(())
//! ```

use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

pub use ddeserts_annotate as annotate;
pub use ddeserts_reshape as reshape;
#[cfg(feature = "polars")]
pub use ddeserts_polars as frame;

pub use ddeserts_annotate::{AnnotationContext, AnnotationPipeline};
pub use ddeserts_core::{
    floor_at_zero, moe_of_nested_ratio, moe_of_ratio, moe_of_sum, ratio_of, CensusConfig,
    Estimate, Population, Race, Record, Stat, Table, DEFAULT_CONFIG,
};
pub use ddeserts_reshape::{CsvOptions, RawRow, Reshaper};

use ddeserts_reshape::{B05003Converter, CensusGeoNames};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Core error: {0}")]
    Core(#[from] ddeserts_core::Error),

    #[error("Reshape error: {0}")]
    Reshape(#[from] ddeserts_reshape::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reshape raw rows and run the standard annotation pipeline over them
#[instrument(skip_all)]
pub fn annotate_rows<I>(rows: I, config: &CensusConfig) -> Result<(Table, AnnotationContext)>
where
    I: IntoIterator<Item = RawRow>,
{
    let pipeline = AnnotationPipeline::standard(config)?;
    let mut table = Reshaper::new(config).reshape_table(rows)?;
    let ctx = pipeline.run(&mut table)?;
    debug!(records = table.len(), columns = table.columns().len(), "annotated table");
    Ok((table, ctx))
}

/// Read a census CSV file, reshape it and annotate it
pub fn annotate_csv<P: AsRef<Path>>(
    path: P,
    config: &CensusConfig,
    options: &CsvOptions,
) -> Result<(Table, AnnotationContext)> {
    let rows = ddeserts_reshape::read_rows_from_path(path, options)?;
    annotate_rows(rows, config)
}

/// Convert B05003 rows to all-races records and derive their DVAP figures
#[instrument(skip_all)]
pub fn annotate_b05003_rows<I>(rows: I) -> Result<(Table, AnnotationContext)>
where
    I: IntoIterator<Item = RawRow>,
{
    let config = CensusConfig::all_races();
    let pipeline = AnnotationPipeline::standard(&config)?;
    let records = B05003Converter::new(&CensusGeoNames).convert_all(rows)?;
    let mut table = Table::from_records(records);
    let ctx = pipeline.run(&mut table)?;
    debug!(records = table.len(), "annotated B05003 table");
    Ok((table, ctx))
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{annotate_b05003_rows, annotate_csv, annotate_rows, Error, Result};
    pub use ddeserts_annotate::{AnnotationContext, AnnotationPipeline, StageKind};
    pub use ddeserts_core::moe::{moe_of_ratio, moe_of_sum, ratio_of};
    pub use ddeserts_core::{
        CensusConfig, Estimate, Metric, Population, Race, Record, Stat, Table,
    };
    pub use ddeserts_reshape::{CsvOptions, RawRow, Reshaper};
}
