//! Step 2: the residual "other" race
//!
//! Whatever part of a subgroup no tracked race accounts for. Independent
//! sampling error can make the tracked races add up to more than the stated
//! total, so the residual is floored at zero. With no tracked race there is
//! no residual to report.

use crate::stage::{Stage, StageKind};
use ddeserts_core::{CensusConfig, Estimate, Population, Result, Stat, StatColumns, Table};
use tracing::debug;

/// Adds `oth_{pop}` for each base subgroup
#[derive(Debug, Clone, Copy, Default)]
pub struct OtherRace;

impl Stage for OtherRace {
    fn kind(&self) -> StageKind {
        StageKind::Other
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        if !config.tracks_races() {
            return Vec::new();
        }
        Population::BASE
            .into_iter()
            .flat_map(move |pop| {
                std::iter::once(Stat::total(pop))
                    .chain(config.races.iter().map(move |r| Stat::count(r, pop)))
            })
            .collect()
    }

    fn produces(&self, config: &CensusConfig) -> Vec<Stat> {
        if !config.tracks_races() {
            return Vec::new();
        }
        Population::BASE
            .into_iter()
            .map(|pop| Stat::count(&config.other_race, pop))
            .collect()
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        if !config.tracks_races() {
            debug!("no tracked races");
            return Ok(());
        }
        for pop in Population::BASE {
            let total = Stat::total(pop).columns();
            let races: Vec<StatColumns> = config
                .races
                .iter()
                .map(|r| Stat::count(r, pop).columns())
                .collect();

            table.add_stat(&Stat::count(&config.other_race, pop), |record| {
                let parts: Vec<Estimate> = races.iter().map(|c| record.pair(c)).collect();
                record.pair(&total).clamped_difference(&Estimate::sum(&parts))
            });
        }
        Ok(())
    }
}
