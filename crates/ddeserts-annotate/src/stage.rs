//! The stage contract
//!
//! Every derived statistic family is produced by one [`Stage`]. A stage
//! declares the statistics it reads and writes for a given configuration, is
//! checked against the table before it runs, and then computes its columns for
//! every record. Stages have a fixed position ([`StageKind`]) in the
//! dependency order; the pipeline refuses to assemble them any other way.

use ddeserts_core::{CensusConfig, Result, Stat, Table};
use std::fmt;

/// The annotation steps, in the only order they may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    /// Fold fine-grained races into catch-all targets
    Consolidation,
    /// Residual "other" race per population subgroup
    Other,
    /// Adults who are not citizens, overall and per race
    Dvap,
    /// Share of adults who are disenfranchised
    DvapProportion,
    /// Share of each subgroup belonging to each race
    Share,
    /// Share of CVAP minus share of adults, per race
    Disparity,
    /// Aggregate under-representation
    DisparityScore,
}

impl StageKind {
    pub const ALL: [StageKind; 7] = [
        StageKind::Consolidation,
        StageKind::Other,
        StageKind::Dvap,
        StageKind::DvapProportion,
        StageKind::Share,
        StageKind::Disparity,
        StageKind::DisparityScore,
    ];

    /// Position in the dependency order, starting at 1
    pub fn ordinal(&self) -> usize {
        *self as usize + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Consolidation => "consolidation",
            StageKind::Other => "other",
            StageKind::Dvap => "dvap",
            StageKind::DvapProportion => "dvap_proportion",
            StageKind::Share => "share",
            StageKind::Disparity => "disparity",
            StageKind::DisparityScore => "disparity_score",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One annotation step with declared input and output statistics
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Statistics that must be present before the stage runs
    fn requires(&self, config: &CensusConfig) -> Vec<Stat>;

    /// Statistics the stage adds (or overwrites)
    fn produces(&self, config: &CensusConfig) -> Vec<Stat>;

    /// Fail with `MissingColumn` unless every required statistic is present
    fn check(&self, table: &Table, config: &CensusConfig) -> Result<()> {
        let name = self.kind().name();
        for stat in self.requires(config) {
            table.require(name, &stat)?;
        }
        Ok(())
    }

    /// Compute the stage's columns for every record; assumes `check` passed
    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()>;
}
