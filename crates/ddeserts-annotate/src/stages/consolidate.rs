//! Step 1: fold fine-grained races into catch-all targets
//!
//! For every consolidation group and base subgroup, the target count is the
//! sum of the sources, and the source columns are dropped afterwards. Once the
//! sources are gone the stage has nothing left to do, so running it again is a
//! no-op; a group with only some of its sources present is a structural error.

use crate::stage::{Stage, StageKind};
use ddeserts_core::{
    CensusConfig, Consolidation, Error, Estimate, Population, Result, Stat, StatColumns, Table,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Pending,
    Done,
}

/// Sums consolidation sources into their target race
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolidateRaces;

impl ConsolidateRaces {
    fn progress(table: &Table, group: &Consolidation, pop: Population) -> Result<Progress> {
        let sources: Vec<Stat> = group.sources.iter().map(|r| Stat::count(r, pop)).collect();
        let present = sources.iter().filter(|s| table.has_stat(s)).count();

        if present == sources.len() {
            return Ok(Progress::Pending);
        }
        if present == 0 && table.has_stat(&Stat::count(&group.target, pop)) {
            return Ok(Progress::Done);
        }

        let name = StageKind::Consolidation.name();
        for source in &sources {
            table.require(name, source)?;
        }
        Err(Error::missing_column(name, Stat::count(&group.target, pop).columns().est))
    }
}

impl Stage for ConsolidateRaces {
    fn kind(&self) -> StageKind {
        StageKind::Consolidation
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        config
            .consolidations
            .iter()
            .flat_map(|c| {
                Population::BASE
                    .into_iter()
                    .flat_map(move |pop| c.sources.iter().map(move |r| Stat::count(r, pop)))
            })
            .collect()
    }

    fn produces(&self, config: &CensusConfig) -> Vec<Stat> {
        config
            .consolidations
            .iter()
            .flat_map(|c| {
                Population::BASE
                    .into_iter()
                    .map(move |pop| Stat::count(&c.target, pop))
            })
            .collect()
    }

    fn check(&self, table: &Table, config: &CensusConfig) -> Result<()> {
        for group in &config.consolidations {
            for pop in Population::BASE {
                Self::progress(table, group, pop)?;
            }
        }
        Ok(())
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        for group in &config.consolidations {
            for pop in Population::BASE {
                if Self::progress(table, group, pop)? == Progress::Done {
                    debug!(target_race = %group.target, %pop, "already consolidated");
                    continue;
                }

                let sources: Vec<StatColumns> = group
                    .sources
                    .iter()
                    .map(|r| Stat::count(r, pop).columns())
                    .collect();
                table.add_stat(&Stat::count(&group.target, pop), |record| {
                    let parts: Vec<Estimate> = sources.iter().map(|c| record.pair(c)).collect();
                    Estimate::sum(&parts)
                });
                for race in &group.sources {
                    table.drop_stat(&Stat::count(race, pop));
                }
            }
        }
        Ok(())
    }
}
