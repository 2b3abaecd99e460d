//! Census row reshaping
//!
//! This crate turns census CSV downloads into [`ddeserts_core::Record`]s:
//!
//! - **Row source** ([`source`]): Latin-1 CSV reading with preamble skipping
//!   and line filtering
//! - **Reshaper** ([`reshaper`]): merges the per-breakdown rows of a geography
//!   into one wide record, keyed by race prefix
//! - **Display names** ([`geoname`]): parses `"Oakland city, California"` into
//!   name, state and geography type
//! - **B05003** ([`b05003`]): converts the sex/age/citizenship table into
//!   all-races records
//! - **Felony disenfranchisement** ([`felony`]): converts state-level felony
//!   disenfranchisement counts into state records
//!
//! # Example
//!
//! ```rust
//! use ddeserts_core::{CensusConfig, Population, Race, Stat};
//! use ddeserts_reshape::{read_rows, CsvOptions, Reshaper};
//!
//! let csv = "geoname,lntitle,geoid,lnnumber,tot_est,tot_moe\n\
//!            Oregon,Total,04000US41,1,4129803,*****\n\
//!            Oregon,Asian Alone,04000US41,4,196451,1234\n";
//!
//! let config = CensusConfig::default();
//! let rows = read_rows(csv.as_bytes(), &CsvOptions::new()).unwrap();
//! let table = Reshaper::new(&config).reshape_table(rows).unwrap();
//!
//! let record = &table.records()[0];
//! let asn = Race::new("asn").unwrap();
//! assert_eq!(record.estimate(&Stat::total(Population::Tot)).est, 4129803.0);
//! assert_eq!(record.estimate(&Stat::count(&asn, Population::Tot)).moe, 1234.0);
//! ```

pub mod b05003;
pub mod error;
pub mod felony;
pub mod geoname;
pub mod reshaper;
pub mod row;
pub mod source;

pub use b05003::{B05003Converter, B05003Layout};
pub use error::{Error, Result};
pub use felony::{
    parse_felony_count, FelonyConverter, FelonyLayout, DISENFRANCHISED_COLUMN, PRISON_COLUMN,
    VEP_COLUMN,
};
pub use geoname::{CensusGeoNames, GeoNameParser};
pub use reshaper::Reshaper;
pub use row::{parse_count, RawRow};
pub use source::{read_rows, read_rows_from_path, CsvOptions, LineFilter};
