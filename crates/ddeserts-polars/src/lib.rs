//! Polars export for annotated census tables
//!
//! Hands a [`ddeserts_core::Table`] to reporting code as a Polars
//! [`DataFrame`](polars::prelude::DataFrame), through two extension traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use ddeserts_polars::{StatFrameExt, TableFrameExt};
//! use ddeserts_core::{Population, Stat};
//!
//! let df = table.to_dataframe()?;
//! let report = df
//!     .select_stats(&[Stat::total(Population::Cvap), Stat::dvap_proportion(None)])?
//!     .with_name_flag("has_charter", &["Oakland", "San Jose"])?;
//! ```

mod error;
mod frame;

pub use error::{Error, Result};
pub use frame::{StatFrameExt, TableFrameExt, GEO_COLUMNS};
