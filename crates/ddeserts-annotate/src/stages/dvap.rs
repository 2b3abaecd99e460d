//! Steps 3 and 4: disenfranchised voting-age population
//!
//! DVAP is the adults who are not citizens, `adu - cvap` floored at zero.
//! Its proportion of adults is reported with the margin of the complementary
//! CVAP proportion. The two proportions sum to one, and CVAP's own margin is
//! always smaller than the DVAP margin derived from it.

use super::race_scopes;
use crate::stage::{Stage, StageKind};
use ddeserts_core::{
    moe_of_ratio, ratio_of, CensusConfig, Estimate, Population, Result, Stat, Table,
};

/// Adds `dvap` and `{race}_dvap` for all races, each tracked race and "other"
#[derive(Debug, Clone, Copy, Default)]
pub struct DvapCounts;

impl Stage for DvapCounts {
    fn kind(&self) -> StageKind {
        StageKind::Dvap
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        race_scopes(config)
            .flat_map(|race| {
                [
                    Stat::count_for(race, Population::Adu),
                    Stat::count_for(race, Population::Cvap),
                ]
            })
            .collect()
    }

    fn produces(&self, config: &CensusConfig) -> Vec<Stat> {
        race_scopes(config)
            .map(|race| Stat::count_for(race, Population::Dvap))
            .collect()
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        for race in race_scopes(config) {
            let adu = Stat::count_for(race, Population::Adu).columns();
            let cvap = Stat::count_for(race, Population::Cvap).columns();
            table.add_stat(&Stat::count_for(race, Population::Dvap), |record| {
                record.pair(&adu).clamped_difference(&record.pair(&cvap))
            });
        }
        Ok(())
    }
}

/// Adds `p_dvap` and `p_{race}_dvap`
#[derive(Debug, Clone, Copy, Default)]
pub struct DvapProportions;

/// DVAP share of adults; NaN for geographies without adults
pub fn dvap_proportion(dvap: &Estimate, adu: &Estimate, cvap: &Estimate) -> Estimate {
    if !(adu.est > 0.0) {
        return Estimate::NAN;
    }
    Estimate::new(
        ratio_of(dvap.est, adu.est),
        moe_of_ratio(cvap.est, cvap.moe, adu.est, adu.moe),
    )
}

impl Stage for DvapProportions {
    fn kind(&self) -> StageKind {
        StageKind::DvapProportion
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        race_scopes(config)
            .flat_map(|race| {
                [
                    Stat::count_for(race, Population::Dvap),
                    Stat::count_for(race, Population::Adu),
                    Stat::count_for(race, Population::Cvap),
                ]
            })
            .collect()
    }

    fn produces(&self, config: &CensusConfig) -> Vec<Stat> {
        race_scopes(config).map(Stat::dvap_proportion).collect()
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        for race in race_scopes(config) {
            let dvap = Stat::count_for(race, Population::Dvap).columns();
            let adu = Stat::count_for(race, Population::Adu).columns();
            let cvap = Stat::count_for(race, Population::Cvap).columns();
            table.add_stat(&Stat::dvap_proportion(race), |record| {
                dvap_proportion(&record.pair(&dvap), &record.pair(&adu), &record.pair(&cvap))
            });
        }
        Ok(())
    }
}
