//! Steps 6 and 7: representation disparity
//!
//! A race's disparity is its share of CVAP minus its share of adults; negative
//! values mean the race is under-represented among eligible voters. The score
//! adds up the under-representation of every tracked race except "other".

use crate::stage::{Stage, StageKind};
use ddeserts_core::{
    floor_at_zero, moe_of_sum, CensusConfig, Estimate, Population, Result, Stat, StatColumns,
    Table,
};

/// Adds `disp_{race}` for each tracked race and "other"
#[derive(Debug, Clone, Copy, Default)]
pub struct Disparities;

impl Stage for Disparities {
    fn kind(&self) -> StageKind {
        StageKind::Disparity
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        config
            .races_with_other()
            .flat_map(|r| {
                [
                    Stat::share(Population::Cvap, r),
                    Stat::share(Population::Adu, r),
                ]
            })
            .collect()
    }

    fn produces(&self, config: &CensusConfig) -> Vec<Stat> {
        config.races_with_other().map(Stat::disparity).collect()
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        for race in config.races_with_other() {
            let cvap = Stat::share(Population::Cvap, race).columns();
            let adu = Stat::share(Population::Adu, race).columns();
            table.add_stat(&Stat::disparity(race), |record| {
                record.pair(&cvap).signed_difference(&record.pair(&adu))
            });
        }
        Ok(())
    }
}

/// A race's contribution to the disparity score.
///
/// Under-represented races contribute their gap and its margin. A race
/// estimated as over-represented contributes nothing to the estimate, but if
/// its margin reaches below zero the part that does becomes its margin.
pub fn shortfall(disparity: &Estimate) -> Estimate {
    if disparity.est < 0.0 {
        Estimate::new(-disparity.est, disparity.moe)
    } else {
        Estimate::new(
            floor_at_zero(-disparity.est),
            floor_at_zero(disparity.moe - disparity.est),
        )
    }
}

/// Adds `disp_score`
#[derive(Debug, Clone, Copy, Default)]
pub struct DisparityScore;

impl Stage for DisparityScore {
    fn kind(&self) -> StageKind {
        StageKind::DisparityScore
    }

    fn requires(&self, config: &CensusConfig) -> Vec<Stat> {
        config.races.iter().map(Stat::disparity).collect()
    }

    fn produces(&self, _config: &CensusConfig) -> Vec<Stat> {
        vec![Stat::DisparityScore]
    }

    fn apply(&self, table: &mut Table, config: &CensusConfig) -> Result<()> {
        let races: Vec<StatColumns> = config
            .races
            .iter()
            .map(|r| Stat::disparity(r).columns())
            .collect();
        table.add_stat(&Stat::DisparityScore, |record| {
            let parts: Vec<Estimate> = races.iter().map(|c| shortfall(&record.pair(c))).collect();
            Estimate::new(
                parts.iter().map(|p| p.est).sum(),
                moe_of_sum(parts.iter().map(|p| p.moe)),
            )
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shortfall() {
        assert_eq!(
            shortfall(&Estimate::new(-0.1, 0.02)),
            Estimate::new(0.1, 0.02)
        );
        // over-represented, but the margin reaches 0.01 below zero
        let s = shortfall(&Estimate::new(0.04, 0.05));
        assert_eq!(s.est, 0.0);
        assert_relative_eq!(s.moe, 0.01, epsilon = 1e-12);
        // comfortably over-represented
        assert_eq!(shortfall(&Estimate::new(0.2, 0.05)), Estimate::new(0.0, 0.0));
        assert!(shortfall(&Estimate::NAN).is_nan());
    }
}
