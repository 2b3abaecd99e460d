//! Annotation pipeline for census tables
//!
//! Derives disenfranchisement statistics from the base counts of a
//! [`ddeserts_core::Table`], propagating margins of error at every step.
//! The steps run in a fixed order, each one reading columns the previous
//! ones wrote:
//!
//! 1. race consolidation (`tmr` from the two-or-more-races breakdowns)
//! 2. the residual "other" race per subgroup
//! 3. DVAP counts, overall and per race
//! 4. DVAP proportions
//! 5. race shares of each subgroup
//! 6. representation disparity per race
//! 7. disparity score (optional)
//!
//! # Example
//!
//! ```rust
//! use ddeserts_annotate::AnnotationPipeline;
//! use ddeserts_core::{CensusConfig, Estimate, Population, Record, Stat, Table};
//!
//! let config = CensusConfig::default();
//! let mut record = Record::new("04000US41", "Oregon");
//! for pop in Population::BASE {
//!     record.set(&Stat::total(pop), Estimate::new(1000.0, 20.0));
//!     for race in config.breakdowns.races() {
//!         record.set(&Stat::count(race, pop), Estimate::new(50.0, 5.0));
//!     }
//! }
//! let mut table = Table::from_records(vec![record]);
//!
//! let pipeline = AnnotationPipeline::standard(&config).unwrap();
//! let ctx = pipeline.run(&mut table).unwrap();
//!
//! assert_eq!(ctx.stages_run().len(), 7);
//! assert!(table.has_stat(&Stat::DisparityScore));
//! ```

pub mod context;
pub mod pipeline;
pub mod stage;
pub mod stages;

pub use context::AnnotationContext;
pub use pipeline::{
    add_disparity_columns, add_disparity_score_columns, add_dvap_columns,
    add_dvap_proportion_columns, add_other_columns, add_race_consolidation, add_share_columns,
    AnnotationPipeline, AnnotationPipelineBuilder,
};
pub use stage::{Stage, StageKind};
pub use stages::{
    ConsolidateRaces, Disparities, DisparityScore, DvapCounts, DvapProportions, OtherRace,
    RaceShares, SHARED_POPULATIONS,
};
