//! Step 5: race shares of each subgroup
//!
//! `prop_{pop}_{race}` for every tracked race and "other", over the base
//! subgroups and DVAP. The denominator is the sum of the race estimates
//! (including "other") carrying the stated total's margin. For the base
//! subgroups "other" makes the race sum at least the stated total, and equal to
//! it for consistent data. DVAP is floored at zero race by race, so its race
//! sum can fall short of the stated DVAP; dividing by the race sum keeps every
//! subgroup's shares adding up to one. A subgroup whose stated total is not
//! positive has no shares.

use crate::stage::{Stage, StageKind};
use ddeserts_core::{CensusConfig, Estimate, Population, Race, Result, Stat, StatColumns, Table};

/// Subgroups split into race shares
pub const SHARED_POPULATIONS: [Population; 5] = [
    Population::Tot,
    Population::Adu,
    Population::Cit,
    Population::Cvap,
    Population::Dvap,
];

/// Adds `prop_{pop}_{race}` for every subgroup in [`SHARED_POPULATIONS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RaceShares;

/// Race sum with the stated total's margin; NaN when the stated total is
/// not positive, however many members the race estimates claim
pub fn share_denominator(total: &Estimate, race_sum: f64) -> Estimate {
    if !(total.est > 0.0) {
        return Estimate::NAN;
    }
    Estimate::new(race_sum, total.moe)
}

impl Stage for RaceShares {
    fn kind(&self) -> StageKind {
        StageKind::Share
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        SHARED_POPULATIONS
            .into_iter()
            .flat_map(move |pop| {
                std::iter::once(Stat::total(pop))
                    .chain(config.races_with_other().map(move |r| Stat::count(r, pop)))
            })
            .collect()
    }

    fn produces(&self, config: &CensusConfig) -> Vec<Stat> {
        SHARED_POPULATIONS
            .into_iter()
            .flat_map(move |pop| config.races_with_other().map(move |r| Stat::share(pop, r)))
            .collect()
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        for pop in SHARED_POPULATIONS {
            let total = Stat::total(pop).columns();
            let races: Vec<(&Race, StatColumns)> = config
                .races_with_other()
                .map(|r| (r, Stat::count(r, pop).columns()))
                .collect();

            for (race, cols) in &races {
                table.add_stat(&Stat::share(pop, race), |record| {
                    let race_sum: f64 = races.iter().map(|(_, c)| record.pair(c).est).sum();
                    let denominator = share_denominator(&record.pair(&total), race_sum);
                    Estimate::proportion(&record.pair(cols), &denominator)
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denominator() {
        let total = Estimate::new(100.0, 4.0);
        assert_eq!(share_denominator(&total, 100.0), total);
        assert_eq!(share_denominator(&total, 105.0), Estimate::new(105.0, 4.0));
        // DVAP floored race by race
        assert_eq!(share_denominator(&total, 90.0), Estimate::new(90.0, 4.0));
        assert!(share_denominator(&Estimate::NAN, f64::NAN).est.is_nan());
    }

    #[test]
    fn test_empty_subgroup_has_no_denominator() {
        let empty = Estimate::new(0.0, 12.0);
        assert!(share_denominator(&empty, 8.0).is_nan());
        assert!(share_denominator(&empty, 0.0).is_nan());
        assert!(share_denominator(&Estimate::new(-3.0, 1.0), 8.0).is_nan());
    }

    #[test]
    fn test_zero_total_with_race_counts_is_nan() {
        let blk = Race::new("blk").unwrap();
        let mut config = CensusConfig::default();
        config.consolidations.clear();
        config.races = vec![blk.clone()];

        let mut record = ddeserts_core::Record::new("A", "Nowhere");
        for pop in SHARED_POPULATIONS {
            record.set(&Stat::total(pop), Estimate::new(0.0, 12.0));
            record.set(&Stat::count(&blk, pop), Estimate::new(8.0, 5.0));
            record.set(&Stat::count(&config.other_race, pop), Estimate::new(0.0, 13.0));
        }
        let mut table = Table::from_records(vec![record]);
        RaceShares.check(&table, &config).unwrap();
        RaceShares.apply(&mut table, &config).unwrap();

        let record = &table.records()[0];
        for pop in SHARED_POPULATIONS {
            assert!(record.estimate(&Stat::share(pop, &blk)).is_nan(), "{pop}");
            assert!(record.estimate(&Stat::share(pop, &config.other_race)).is_nan());
        }
    }
}
