//! The annotation stages, one module per statistic family

mod consolidate;
mod disparity;
mod dvap;
mod other;
mod share;

pub use consolidate::ConsolidateRaces;
pub use disparity::{Disparities, DisparityScore};
pub use dvap::{DvapCounts, DvapProportions};
pub use other::OtherRace;
pub use share::{RaceShares, SHARED_POPULATIONS};

use ddeserts_core::{CensusConfig, Race};
use std::iter;

/// All races combined, then every tracked race, then "other"
pub(crate) fn race_scopes(config: &CensusConfig) -> impl Iterator<Item = Option<&Race>> {
    iter::once(None).chain(config.races_with_other().map(Some))
}
