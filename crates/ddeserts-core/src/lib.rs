//! Core types for census margin-of-error analysis
//!
//! This crate provides the pieces every other ddeserts crate builds on:
//!
//! 1. **MoE arithmetic** ([`moe`]) - clamping, never-failing functions for sums,
//!    differences and ratios of survey estimates
//! 2. **Typed keys** ([`key`]) - `(statistic, metric)` column addressing
//! 3. **Records and tables** ([`record`]) - one record per geography, columns
//!    added table-wide
//! 4. **Configuration** ([`config`]) - breakdown labels, tracked races and
//!    consolidation groups
//!
//! # Example
//!
//! ```rust
//! use ddeserts_core::{moe_of_sum, ratio_of, moe_of_ratio, Estimate};
//!
//! let adu = Estimate::new(1000.0, 50.0);
//! let cvap = Estimate::new(700.0, 30.0);
//!
//! let dvap = adu.clamped_difference(&cvap);
//! assert_eq!(dvap.est, 300.0);
//! assert!((dvap.moe - moe_of_sum([50.0, 30.0])).abs() < 1e-12);
//!
//! let share = ratio_of(dvap.est, adu.est);
//! let share_moe = moe_of_ratio(cvap.est, cvap.moe, adu.est, adu.moe);
//! assert!((share - 0.3).abs() < 1e-12);
//! assert!(share_moe <= share.max(1.0 - share));
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod moe;
pub mod record;

// Re-export core types
pub use config::{
    Breakdown, BreakdownTable, CensusConfig, Consolidation, RowLayout, DEFAULT_CONFIG,
};
pub use error::{Error, Result};
pub use key::{ColumnKey, Metric, Population, Race, Stat, StatColumns};
pub use moe::{
    floor_at_zero, moe_of_nested_ratio, moe_of_ratio, moe_of_sum, ratio_of, Estimate,
};
pub use record::{GeoType, Geography, Record, Table};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CensusConfig, Error, Estimate, Metric, Population, Race, Record, Result, Stat, Table,
    };
    pub use crate::moe::{moe_of_ratio, moe_of_sum, ratio_of};
}
